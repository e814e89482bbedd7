//! DocChat - desktop chat client for document question answering
//!
//! Main entry point for the DocChat application.

use anyhow::Result;
use docchat::config::AppConfig;
use docchat::ui::DocChatApp;
use eframe::egui;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    info!("Starting DocChat against {}", config.server_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([480.0, 400.0])
            .with_title("DocChat"),
        ..Default::default()
    };

    eframe::run_native(
        "DocChat",
        options,
        Box::new(|cc| Ok(Box::new(DocChatApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}

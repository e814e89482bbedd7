#[cfg(feature = "audio-io")]
pub mod capture;
pub mod playback;
pub mod wav;

#[cfg(feature = "audio-io")]
pub use capture::MicCapture;
pub use playback::Player;
pub use wav::encode_wav;

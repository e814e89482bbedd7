use super::types::{Message, MessageKind};
use crate::backend::RequestId;

/// Ordered conversation transcript. Entries are appended (or, for replies,
/// inserted next to the question that caused them) and never mutated or
/// removed; the only reset is the wholesale replacement a successful upload
/// performs.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drop every existing entry and start over with `message`.
    pub fn replace_with(&mut self, message: Message) {
        self.messages.clear();
        self.messages.push(message);
    }

    /// Place a reply directly after the user message tagged with `request`.
    /// If that message no longer exists (the log was replaced while the query
    /// was in flight), the reply goes at the end.
    pub fn insert_reply(&mut self, request: RequestId, reply: Message) {
        let anchor = self
            .messages
            .iter()
            .position(|m| m.request == Some(request) && m.kind == MessageKind::User);
        match anchor {
            Some(idx) => self.messages.insert(idx + 1, reply),
            None => self.messages.push(reply),
        }
    }

    pub fn entries(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = ConversationLog::new();
        log.append(Message::user("first"));
        log.append(Message::assistant("second"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].content, "first");
        assert_eq!(log.entries()[1].content, "second");
    }

    #[test]
    fn replace_with_resets_to_a_single_entry() {
        let mut log = ConversationLog::new();
        log.append(Message::user("old question"));
        log.append(Message::assistant("old answer"));
        log.replace_with(Message::system("Document uploaded successfully."));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].kind, MessageKind::System);
    }

    #[test]
    fn reply_lands_after_its_user_message() {
        let mut log = ConversationLog::new();
        let r1 = RequestId::new(1);
        let r2 = RequestId::new(2);
        log.append(Message::user("q1").with_request(r1));
        log.append(Message::user("q2").with_request(r2));

        // Second reply arrives first; pairs must still read in submission order.
        log.insert_reply(r2, Message::assistant("a2").with_request(r2));
        log.insert_reply(r1, Message::assistant("a1").with_request(r1));

        let contents: Vec<&str> = log.entries().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "a1", "q2", "a2"]);
    }

    #[test]
    fn reply_appends_when_its_anchor_is_gone() {
        let mut log = ConversationLog::new();
        let r1 = RequestId::new(1);
        log.append(Message::user("q1").with_request(r1));
        log.replace_with(Message::system("Document uploaded successfully."));

        log.insert_reply(r1, Message::assistant("late answer"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[1].content, "late answer");
    }

    #[test]
    fn completed_queries_alternate_user_and_reply() {
        let mut log = ConversationLog::new();
        for n in 1..=4u64 {
            let request = RequestId::new(n);
            log.append(Message::user(format!("q{n}")).with_request(request));
            log.insert_reply(request, Message::assistant(format!("a{n}")));
        }
        assert_eq!(log.len(), 8);
        for (idx, message) in log.entries().iter().enumerate() {
            let expected = if idx % 2 == 0 {
                MessageKind::User
            } else {
                MessageKind::Assistant
            };
            assert_eq!(message.kind, expected);
        }
    }
}

//! Uploaded-document context of the active session.

use crate::mutations::DocumentMutation;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    content: String,
    display_name: String,
}

impl DocumentContext {
    /// True when there is text to attach to chat turns.
    pub fn is_active(&self) -> bool {
        !self.content.is_empty()
    }

    /// Content to attach to a chat turn, if any.
    pub fn attachment(&self) -> Option<&str> {
        self.is_active().then_some(self.content.as_str())
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn apply(&mut self, mutation: DocumentMutation) {
        match mutation {
            DocumentMutation::Clear => {
                self.content.clear();
                self.display_name.clear();
            }
            DocumentMutation::Set {
                content,
                display_name,
            } => {
                self.content = content;
                self.display_name = display_name;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_is_inactive() {
        let mut doc = DocumentContext::default();
        assert!(!doc.is_active());

        doc.apply(DocumentMutation::Set {
            content: String::new(),
            display_name: "empty.txt".to_string(),
        });
        assert!(!doc.is_active());
        assert_eq!(doc.attachment(), None);
    }

    #[test]
    fn test_set_is_last_write_wins() {
        let mut doc = DocumentContext::default();
        doc.apply(DocumentMutation::Set {
            content: "one".to_string(),
            display_name: "a.txt".to_string(),
        });
        doc.apply(DocumentMutation::Set {
            content: "two".to_string(),
            display_name: "b.txt".to_string(),
        });
        assert_eq!(doc.attachment(), Some("two"));
        assert_eq!(doc.display_name(), "b.txt");

        doc.apply(DocumentMutation::Clear);
        assert!(!doc.is_active());
    }
}

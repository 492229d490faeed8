//! Append-only chat history.

use super::entry::ChatEntry;

/// Ordered chat history of one session.
///
/// The only mutation is [`ChatHistory::append`]; there is no way to edit or
/// remove an entry, so render order always equals creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatHistory {
    entries: Vec<ChatEntry>,
}

impl ChatHistory {
    /// Creates a history holding only the assistant greeting.
    pub fn seeded(greeting: impl Into<String>) -> Self {
        Self {
            entries: vec![ChatEntry::assistant_text(greeting)],
        }
    }

    pub fn append(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a ChatEntry;
    type IntoIter = std::slice::Iter<'a, ChatEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ChatRole, ImageData};

    #[test]
    fn seeded_history_has_greeting() {
        let history = ChatHistory::seeded("안녕!");
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].role(), ChatRole::Assistant);
        assert_eq!(history.entries()[0].as_text(), Some("안녕!"));
    }

    #[test]
    fn append_keeps_prior_entries() {
        let mut history = ChatHistory::seeded("hi");
        let before = history.clone();

        history.append(ChatEntry::user_image(ImageData::new("image/gif", vec![1, 2, 3])));
        history.append(ChatEntry::assistant_text("nice"));

        assert_eq!(history.len(), 3);
        assert_eq!(&history.entries()[..1], before.entries());
        assert_eq!(history.last().and_then(ChatEntry::as_text), Some("nice"));
    }
}

//! Media lists

use emu_dom::DomException;

/// Ordered list of media query strings (`MediaList`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaList {
    queries: Vec<String>,
}

impl MediaList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a comma-separated media text
    pub fn parse(text: &str) -> Self {
        let mut list = Self::new();
        list.set_media_text(text);
        list
    }

    /// `mediaText`: queries joined with ", "
    pub fn media_text(&self) -> String {
        self.queries.join(", ")
    }

    /// Replace all queries from a comma-separated text
    pub fn set_media_text(&mut self, text: &str) {
        self.queries = text
            .split(',')
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(|q| q.to_string())
            .collect();
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// `item(i)`; out of range yields `None`
    pub fn item(&self, index: usize) -> Option<&str> {
        self.queries.get(index).map(|q| q.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|q| q.as_str())
    }

    /// `appendMedium`: an existing query moves to the end
    pub fn append_medium(&mut self, medium: &str) {
        let medium = medium.trim();
        if medium.is_empty() {
            return;
        }
        self.queries.retain(|q| !q.eq_ignore_ascii_case(medium));
        self.queries.push(medium.to_string());
    }

    /// `deleteMedium`: fails with NotFoundError when absent
    pub fn delete_medium(&mut self, medium: &str) -> Result<(), DomException> {
        let medium = medium.trim();
        let before = self.queries.len();
        self.queries.retain(|q| !q.eq_ignore_ascii_case(medium));
        if self.queries.len() == before {
            return Err(DomException::NotFound(format!(
                "Failed to delete '{}' from the media list",
                medium
            )));
        }
        Ok(())
    }
}

impl From<Vec<String>> for MediaList {
    fn from(queries: Vec<String>) -> Self {
        Self { queries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_text() {
        let mut list = MediaList::parse("screen,  print");
        assert_eq!(list.len(), 2);
        assert_eq!(list.media_text(), "screen, print");
        assert_eq!(list.item(1), Some("print"));
        assert_eq!(list.item(2), None);

        list.set_media_text("");
        assert!(list.is_empty());
    }

    #[test]
    fn test_append_and_delete() {
        let mut list = MediaList::parse("screen, print");
        list.append_medium("screen");
        assert_eq!(list.media_text(), "print, screen");

        list.delete_medium("print").unwrap();
        assert_eq!(list.media_text(), "screen");

        let err = list.delete_medium("print").unwrap_err();
        assert_eq!(err.name(), "NotFoundError");
        assert_eq!(err.code(), 8);
    }
}

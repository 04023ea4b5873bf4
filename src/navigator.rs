//! Page navigation interface and the session-backed implementation

use log::{debug, info};

/// Narrow paging interface the controller drives.
///
/// `advance`/`retreat` are fire-and-forget from the controller's point of
/// view: accumulated pressure is dropped before the call lands, so a slow
/// or refusing navigator never stalls sample processing.
pub trait PageNavigator {
    fn can_advance(&self) -> bool;
    fn can_retreat(&self) -> bool;
    fn advance(&mut self);
    fn retreat(&mut self);

    /// Zero-based current page, when a document is loaded.
    fn current_page(&self) -> Option<usize>;
    fn page_count(&self) -> Option<usize>;
}

/// Paging session over a loaded document, or over nothing at all.
///
/// With no document both directions report unavailable, so the controller
/// keeps producing feedback while every page command is suppressed.
#[derive(Clone, Debug)]
pub struct DocumentSession {
    title: Option<String>,
    current_page: usize,
    page_count: Option<usize>,
}

impl DocumentSession {
    #[must_use]
    pub fn open(title: impl Into<String>, page_count: usize) -> Self {
        Self {
            title: Some(title.into()),
            current_page: 0,
            page_count: Some(page_count),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            title: None,
            current_page: 0,
            page_count: None,
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// One-based page label for display, "-/-" when nothing is loaded.
    #[must_use]
    pub fn progress_label(&self) -> String {
        match self.page_count {
            Some(count) => format!("{}/{}", self.current_page + 1, count),
            None => "-/-".to_string(),
        }
    }
}

impl PageNavigator for DocumentSession {
    fn can_advance(&self) -> bool {
        self.page_count
            .is_some_and(|count| self.current_page + 1 < count)
    }

    fn can_retreat(&self) -> bool {
        self.page_count.is_some() && self.current_page > 0
    }

    fn advance(&mut self) {
        if self.can_advance() {
            self.current_page += 1;
            info!("Turned to page {}", self.current_page + 1);
        } else {
            debug!("Advance ignored at document end");
        }
    }

    fn retreat(&mut self) {
        if self.can_retreat() {
            self.current_page -= 1;
            info!("Turned back to page {}", self.current_page + 1);
        } else {
            debug!("Retreat ignored at document start");
        }
    }

    fn current_page(&self) -> Option<usize> {
        self.page_count.map(|_| self.current_page)
    }

    fn page_count(&self) -> Option<usize> {
        self.page_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_can_only_advance() {
        let session = DocumentSession::open("book", 3);
        assert!(session.can_advance());
        assert!(!session.can_retreat());
        assert_eq!(session.progress_label(), "1/3");
    }

    #[test]
    fn advance_stops_at_last_page() {
        let mut session = DocumentSession::open("book", 3);
        for _ in 0..5 {
            session.advance();
        }
        assert_eq!(session.current_page(), Some(2));
        assert!(!session.can_advance());
        assert_eq!(session.progress_label(), "3/3");
    }

    #[test]
    fn retreat_stops_at_first_page() {
        let mut session = DocumentSession::open("book", 3);
        session.advance();
        session.retreat();
        session.retreat();
        assert_eq!(session.current_page(), Some(0));
        assert!(!session.can_retreat());
    }

    #[test]
    fn single_page_document_cannot_move() {
        let session = DocumentSession::open("leaflet", 1);
        assert!(!session.can_advance());
        assert!(!session.can_retreat());
    }

    #[test]
    fn empty_session_suppresses_everything() {
        let mut session = DocumentSession::empty();
        assert!(!session.can_advance());
        assert!(!session.can_retreat());
        assert_eq!(session.current_page(), None);
        assert_eq!(session.progress_label(), "-/-");

        session.advance();
        assert_eq!(session.current_page(), None);
    }
}

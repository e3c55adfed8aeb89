//! Display sink: where formatted frames go.

use std::cell::RefCell;

/// Receives every formatted frame, synchronously, in emission order.
pub trait DisplaySink {
    fn set_text(&self, text: &str);
}

impl<F> DisplaySink for F
where
    F: Fn(&str),
{
    fn set_text(&self, text: &str) {
        self(text)
    }
}

/// In-memory label keeping the current text and every text it was given.
#[derive(Debug, Default)]
pub struct TextLabel {
    text: RefCell<String>,
    history: RefCell<Vec<String>>,
}

impl TextLabel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label with initial text that is not recorded in the history.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: RefCell::new(text.to_string()),
            history: RefCell::new(Vec::new()),
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
    }
}

impl DisplaySink for TextLabel {
    fn set_text(&self, text: &str) {
        text.clone_into(&mut self.text.borrow_mut());
        self.history.borrow_mut().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn label_tracks_text_and_history() {
        let label = TextLabel::with_text("Text");
        assert_eq!(label.text(), "Text");
        assert!(label.history().is_empty());

        label.set_text("1");
        label.set_text("2");
        assert_eq!(label.text(), "2");
        assert_eq!(label.history(), vec!["1".to_string(), "2".to_string()]);

        label.clear_history();
        assert!(label.history().is_empty());
        assert_eq!(label.text(), "2");
    }

    #[test]
    fn closures_are_sinks() {
        let calls = Cell::new(0);
        let sink = |_: &str| calls.set(calls.get() + 1);
        sink.set_text("x");
        DisplaySink::set_text(&sink, "y");
        assert_eq!(calls.get(), 2);
    }
}

//! User-facing notifications (success, failure and progress messages).

use std::cell::RefCell;

/// Fire-and-forget sink for user notifications
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn loading(&self, message: &str);
}

/// Prints notifications to the terminal and mirrors them to the log
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        tracing::debug!(notice = "success", "{message}");
        println!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::debug!(notice = "error", "{message}");
        eprintln!("{message}");
    }

    fn loading(&self, message: &str) {
        tracing::debug!(notice = "loading", "{message}");
        eprintln!("{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Loading(String),
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .borrow_mut()
            .push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices
            .borrow_mut()
            .push(Notice::Error(message.to_string()));
    }

    fn loading(&self, message: &str) {
        self.notices
            .borrow_mut()
            .push(Notice::Loading(message.to_string()));
    }
}

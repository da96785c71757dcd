//! Per-client UI state, passed explicitly instead of living in globals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

#[derive(Debug, Default)]
pub struct UiSession {
    current_chat_id: Option<String>,
    processing: Arc<AtomicBool>,
    dark_mode: bool,
}

/// Held while a send is outstanding; dropping it re-opens the session.
#[derive(Debug)]
pub struct SendGuard {
    processing: Arc<AtomicBool>,
}

impl Drop for SendGuard {
    fn drop(&mut self) {
        self.processing.store(false, Ordering::SeqCst);
    }
}

impl UiSession {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            dark_mode,
            ..Self::default()
        }
    }

    /// `None` while a previous send has not finished.
    pub fn try_begin_send(&self) -> Option<SendGuard> {
        self.processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SendGuard {
                processing: Arc::clone(&self.processing),
            })
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    pub fn current_chat_id(&self) -> Option<&str> {
        self.current_chat_id.as_deref()
    }

    /// Assigns a chat id after the first reply. Returns true when the chat
    /// is new, which is when the client refreshes its history list.
    pub fn mark_chat_started(&mut self) -> bool {
        if self.current_chat_id.is_some() {
            return false;
        }
        self.current_chat_id = Some(Uuid::new_v4().to_string());
        true
    }

    pub fn start_new_chat(&mut self) {
        self.current_chat_id = None;
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_send_is_rejected_while_first_outstanding() {
        let session = UiSession::default();
        let guard = session.try_begin_send().expect("first send allowed");
        assert!(session.is_processing());
        assert!(session.try_begin_send().is_none());

        drop(guard);
        assert!(!session.is_processing());
        assert!(session.try_begin_send().is_some());
    }

    #[test]
    fn chat_id_assigned_once_until_new_chat() {
        let mut session = UiSession::default();
        assert!(session.current_chat_id().is_none());
        assert!(session.mark_chat_started());
        let id = session.current_chat_id().map(str::to_owned);
        assert!(!session.mark_chat_started());
        assert_eq!(session.current_chat_id().map(str::to_owned), id);

        session.start_new_chat();
        assert!(session.current_chat_id().is_none());
    }

    #[test]
    fn theme_toggles() {
        let mut session = UiSession::new(true);
        assert!(!session.toggle_theme());
        assert!(session.toggle_theme());
        assert!(session.dark_mode());
    }
}

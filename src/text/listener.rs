//! Change listener registration and delivery.

use crate::text::edit::EditEvent;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

/// Receives one notification per committed edit.
///
/// Called synchronously on the editing thread after the store has
/// committed. Implementations should return quickly and defer heavy work.
/// A panic inside the listener is caught and logged by the store.
pub trait ChangeListener: Send + Sync {
    fn on_content_change(&self, event: &EditEvent);
}

impl<F> ChangeListener for F
where
    F: Fn(&EditEvent) + Send + Sync,
{
    fn on_content_change(&self, event: &EditEvent) {
        self(event);
    }
}

/// Non-owning handle to at most one listener.
#[derive(Default)]
pub(crate) struct ListenerSlot {
    listener: Option<Weak<dyn ChangeListener>>,
}

impl ListenerSlot {
    pub(crate) fn set<L: ChangeListener + 'static>(&mut self, listener: &Arc<L>) {
        let weak: Weak<L> = Arc::downgrade(listener);
        self.listener = Some(weak);
    }

    pub(crate) fn clear(&mut self) {
        self.listener = None;
    }

    /// Check for a registered listener that is still alive.
    pub(crate) fn is_live(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Deliver `event`. Returns `true` if a live listener returned normally.
    pub(crate) fn notify(&self, event: &EditEvent) -> bool {
        let Some(listener) = self.listener.as_ref().and_then(Weak::upgrade) else {
            return false;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| listener.on_content_change(event))) {
            Ok(()) => true,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::warn!(
                    revision = event.revision,
                    action = ?event.action,
                    %reason,
                    "change listener panicked; edit stays committed"
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for ListenerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSlot")
            .field("registered", &self.listener.is_some())
            .field("live", &self.is_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::edit::{EditAction, EditedMask};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event() -> EditEvent {
        EditEvent {
            text: "x".to_string(),
            removed: String::new(),
            range: 0..0,
            delta: 1,
            action: EditAction::Insert,
            edited: EditedMask::CHARACTERS,
            revision: 1,
        }
    }

    #[test]
    fn test_closure_listener() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let listener = Arc::new(move |_: &EditEvent| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let mut slot = ListenerSlot::default();
        slot.set(&listener);
        assert!(slot.is_live());
        assert!(slot.notify(&event()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_listener_is_skipped() {
        let listener = Arc::new(|_: &EditEvent| {});
        let mut slot = ListenerSlot::default();
        slot.set(&listener);
        drop(listener);

        assert!(!slot.is_live());
        assert!(!slot.notify(&event()));
    }

    #[test]
    fn test_panicking_listener_is_contained() {
        let listener = Arc::new(|_: &EditEvent| panic!("listener failure"));
        let mut slot = ListenerSlot::default();
        slot.set(&listener);
        assert!(!slot.notify(&event()));
    }

    struct Counter(AtomicUsize);

    impl ChangeListener for Counter {
        fn on_content_change(&self, _event: &EditEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_set_replaces_previous_listener() {
        let first = Arc::new(Counter(AtomicUsize::new(0)));
        let second = Arc::new(Counter(AtomicUsize::new(0)));
        let mut slot = ListenerSlot::default();

        slot.set(&first);
        assert!(slot.notify(&event()));
        slot.set(&second);
        assert!(slot.notify(&event()));

        assert_eq!(first.0.load(Ordering::SeqCst), 1);
        assert_eq!(second.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear() {
        let listener = Arc::new(|_: &EditEvent| {});
        let mut slot = ListenerSlot::default();
        slot.set(&listener);
        slot.clear();
        assert!(!slot.is_live());
    }
}

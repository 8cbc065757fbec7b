//! Change notification hook
//!
//! The form does not depend on any reactivity runtime. A UI layer subscribes
//! an observer and re-reads whatever it needs when notified.

/// What changed in a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// A new field was added to the registry
    Registered { key: String },
    /// Values were set and the fields marked touched
    Updated { keys: Vec<String> },
    /// Touched flags were cleared
    Untouched { keys: Vec<String> },
    /// Values restored, touched and errors cleared
    Reset,
    /// Values restored and touched cleared; revalidation follows
    Cleared,
    /// A validation result was written
    Validated { key: String, error: Option<String> },
}

/// Receives form change notifications
#[cfg_attr(test, mockall::automock)]
pub trait FormObserver: Send + Sync {
    fn notify(&self, event: &FormEvent);
}

impl<F> FormObserver for F
where
    F: Fn(&FormEvent) + Send + Sync,
{
    fn notify(&self, event: &FormEvent) {
        self(event)
    }
}

/// Handle returned by [`Form::subscribe`](super::Form::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_is_an_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = move |event: &FormEvent| sink.lock().unwrap().push(event.clone());

        observer.notify(&FormEvent::Reset);
        observer.notify(&FormEvent::Cleared);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![FormEvent::Reset, FormEvent::Cleared]
        );
    }

    #[test]
    fn test_mock_observer_receives_event() {
        let mut mock = MockFormObserver::new();
        mock.expect_notify()
            .withf(|event| matches!(event, FormEvent::Registered { key } if key == "email"))
            .times(1)
            .return_const(());

        mock.notify(&FormEvent::Registered {
            key: "email".to_string(),
        });
    }
}

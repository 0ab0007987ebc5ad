//! Request notification channel.
//!
//! A small in-process event bus that broadcasts "request started" and
//! "request ended" so a loading indicator can toggle. The pending-request
//! counter lives inside the notifier itself and is injected into the HTTP
//! client by its constructor; there is no ambient global state.

use std::sync::{Arc, Mutex};

type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Inner {
    pending: usize,
    on_started: Vec<Handler>,
    on_ended: Vec<Handler>,
}

/// Broadcasts request lifecycle events to registered handlers.
///
/// `request_started` fires on every request. `request_ended` fires only once
/// the count of outstanding requests drops below 1, so overlapping requests
/// coalesce into a single "all requests finished" event. Delivery is
/// synchronous, on the caller's thread, to the handlers registered at publish
/// time. There is no unsubscription; handlers live as long as the notifier.
#[derive(Default)]
pub struct RequestNotifier {
    inner: Mutex<Inner>,
}

impl RequestNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for the Started event.
    pub fn on_request_started(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.lock().on_started.push(Arc::new(handler));
    }

    /// Register a handler for the coalesced Ended event.
    pub fn on_request_ended(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.lock().on_ended.push(Arc::new(handler));
    }

    /// Record a request initiation and publish Started unconditionally.
    pub fn request_started(&self) {
        let handlers = {
            let mut inner = self.lock();
            inner.pending += 1;
            tracing::debug!(pending = inner.pending, "request started");
            inner.on_started.clone()
        };

        for handler in handlers {
            handler();
        }
    }

    /// Record a request completion (success or error) and publish Ended if no
    /// requests remain outstanding.
    pub fn request_ended(&self) {
        let handlers = {
            let mut inner = self.lock();
            inner.pending = inner.pending.saturating_sub(1);
            tracing::debug!(pending = inner.pending, "request ended");
            if inner.pending < 1 { Some(inner.on_ended.clone()) } else { None }
        };

        if let Some(handlers) = handlers {
            for handler in handlers {
                handler();
            }
        }
    }

    /// Count of in-flight requests.
    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    /// Loading-state flag for the presentation layer.
    pub fn is_loading(&self) -> bool {
        self.pending() > 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Handlers are invoked outside the lock, so the only way to poison it
        // is a panicking handler registration; recover the data either way.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn started_fires_per_request_ended_fires_once() {
        let notifier = RequestNotifier::new();
        let started = Arc::new(AtomicUsize::new(0));
        let ended = Arc::new(AtomicUsize::new(0));

        {
            let started = Arc::clone(&started);
            notifier.on_request_started(move || {
                started.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let ended = Arc::clone(&ended);
            notifier.on_request_ended(move || {
                ended.fetch_add(1, Ordering::SeqCst);
            });
        }

        // Three overlapping requests.
        notifier.request_started();
        notifier.request_started();
        notifier.request_started();
        assert_eq!(started.load(Ordering::SeqCst), 3);

        notifier.request_ended();
        notifier.request_ended();
        assert_eq!(ended.load(Ordering::SeqCst), 0, "two requests still pending after the first end");

        notifier.request_ended();
        assert_eq!(ended.load(Ordering::SeqCst), 1, "exactly one Ended after the last completion");
    }

    #[test]
    fn is_loading_tracks_outstanding_requests() {
        let notifier = RequestNotifier::new();
        assert!(!notifier.is_loading());

        notifier.request_started();
        notifier.request_started();
        assert!(notifier.is_loading());
        assert_eq!(notifier.pending(), 2);

        notifier.request_ended();
        assert!(notifier.is_loading());

        notifier.request_ended();
        assert!(!notifier.is_loading());
        assert_eq!(notifier.pending(), 0);
    }

    #[test]
    fn sequential_requests_each_get_an_ended_event() {
        let notifier = RequestNotifier::new();
        let ended = Arc::new(AtomicUsize::new(0));
        {
            let ended = Arc::clone(&ended);
            notifier.on_request_ended(move || {
                ended.fetch_add(1, Ordering::SeqCst);
            });
        }

        for _ in 0..2 {
            notifier.request_started();
            notifier.request_ended();
        }

        assert_eq!(ended.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn handlers_registered_later_do_not_see_earlier_events() {
        let notifier = RequestNotifier::new();
        notifier.request_started();

        let started = Arc::new(AtomicUsize::new(0));
        {
            let started = Arc::clone(&started);
            notifier.on_request_started(move || {
                started.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(started.load(Ordering::SeqCst), 0);
        notifier.request_started();
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }
}

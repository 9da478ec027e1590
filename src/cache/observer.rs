//! Cache observers.
//!
//! Observers are told which operation just completed. Notification is a
//! synchronous fan-out on the calling thread.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

/// Operation reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheEventType {
    Put,
    Get,
    Cleanup,
    Delete,
}

impl fmt::Display for CacheEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheEventType::Put => "PUT",
            CacheEventType::Get => "GET",
            CacheEventType::Cleanup => "CLEANUP",
            CacheEventType::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Receives cache events.
pub trait CacheObserver: Send + Sync {
    fn update(&self, event: CacheEventType);
}

impl<F> CacheObserver for F
where
    F: Fn(CacheEventType) + Send + Sync,
{
    fn update(&self, event: CacheEventType) {
        self(event)
    }
}

// == Observer List ==
/// Registered observers, safe to extend while a notification is in flight.
#[derive(Default)]
pub(crate) struct ObserverList {
    observers: RwLock<Vec<Arc<dyn CacheObserver>>>,
}

impl ObserverList {
    pub(crate) fn add(&self, observer: Arc<dyn CacheObserver>) {
        self.observers.write().push(observer);
    }

    pub(crate) fn notify(&self, event: CacheEventType) {
        // Snapshot first: an observer may register another observer
        let observers = self.observers.read().clone();
        for observer in observers {
            observer.update(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.read().len()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_closure_observer_receives_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let list = ObserverList::default();
        let sink = seen.clone();
        list.add(Arc::new(move |event: CacheEventType| sink.lock().push(event)));

        list.notify(CacheEventType::Put);
        list.notify(CacheEventType::Get);

        assert_eq!(*seen.lock(), vec![CacheEventType::Put, CacheEventType::Get]);
    }

    #[test]
    fn test_fan_out_to_every_observer() {
        let seen = Arc::new(Mutex::new(0));
        let list = ObserverList::default();
        for _ in 0..3 {
            let sink = seen.clone();
            list.add(Arc::new(move |_: CacheEventType| *sink.lock() += 1));
        }

        list.notify(CacheEventType::Delete);

        assert_eq!(*seen.lock(), 3);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_register_during_notification() {
        let list = Arc::new(ObserverList::default());
        let inner = list.clone();
        list.add(Arc::new(move |_: CacheEventType| {
            inner.add(Arc::new(|_: CacheEventType| {}))
        }));

        list.notify(CacheEventType::Cleanup);

        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_event_display_and_serialize() {
        assert_eq!(CacheEventType::Cleanup.to_string(), "CLEANUP");
        assert_eq!(serde_json::to_string(&CacheEventType::Put).unwrap(), "\"PUT\"");
    }
}

// ABOUTME: Inbound message listener trait and the ordered registry the dispatcher reads
// ABOUTME: Copy-on-write snapshots keep dispatch consistent while the host mutates the list

use crate::types::InboundMessage;
use std::sync::{Arc, RwLock};

/// Observer for inbound mobile-originated messages
///
/// Implemented by the host application and registered with the session
/// manager. Calls arrive synchronously on the protocol engine's I/O
/// threads, in registration order, so implementations should hand off any
/// slow work rather than block the engine.
pub trait MessageListener: Send + Sync {
    /// A mobile-originated message arrived
    fn on_message(&self, message: &InboundMessage);
}

/// Ordered collection of inbound message listeners
///
/// Insertion order is the dispatch order. Mutations may race a dispatch in
/// progress; the list is copy-on-write, so a dispatch always sees either
/// the old list or the new one, never a partial update.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Arc<Vec<Arc<dyn MessageListener>>>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener; it will be invoked after all previously registered ones
    pub fn register(&self, listener: Arc<dyn MessageListener>) {
        let mut guard = self.listeners.write().unwrap();
        let mut next = Vec::clone(&guard);
        next.push(listener);
        *guard = Arc::new(next);
    }

    /// Atomically swap the active listener list
    pub fn replace(&self, listeners: Vec<Arc<dyn MessageListener>>) {
        *self.listeners.write().unwrap() = Arc::new(listeners);
    }

    /// Snapshot of the current listener list in dispatch order
    pub fn snapshot(&self) -> Arc<Vec<Arc<dyn MessageListener>>> {
        Arc::clone(&self.listeners.read().unwrap())
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.read().unwrap().len()
    }

    /// True if no listener is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl MessageListener for Recorder {
        fn on_message(&self, _message: &InboundMessage) {
            self.log.lock().unwrap().push(self.tag);
        }
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();

        for tag in ["first", "second", "third"] {
            registry.register(Arc::new(Recorder {
                tag,
                log: Arc::clone(&log),
            }));
        }

        let message = InboundMessage::new("hi", "1000", "2000");
        for listener in registry.snapshot().iter() {
            listener.on_message(&message);
        }

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.register(Arc::new(Recorder {
            tag: "old",
            log: Arc::clone(&log),
        }));

        // A dispatch in progress holds this snapshot.
        let snapshot = registry.snapshot();

        registry.replace(vec![Arc::new(Recorder {
            tag: "new",
            log: Arc::clone(&log),
        })]);

        let message = InboundMessage::new("hi", "1000", "2000");
        for listener in snapshot.iter() {
            listener.on_message(&message);
        }
        for listener in registry.snapshot().iter() {
            listener.on_message(&message);
        }

        assert_eq!(*log.lock().unwrap(), vec!["old", "new"]);
    }

    #[test]
    fn test_len_and_is_empty() {
        let registry = ListenerRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(Recorder {
            tag: "only",
            log: Arc::new(Mutex::new(Vec::new())),
        }));
        assert_eq!(registry.len(), 1);

        registry.replace(Vec::new());
        assert!(registry.is_empty());
    }
}

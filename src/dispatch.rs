// ABOUTME: Inbound dispatcher invoked by the protocol engine on message arrival
// ABOUTME: Fans each message out to every registered listener and always acknowledges the request

use crate::engine::{ExpiredRequest, InboundAck, InboundHandler};
use crate::listener::ListenerRegistry;
use crate::types::InboundMessage;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fans inbound mobile-originated messages out to registered listeners
///
/// Handed to the protocol engine at bind time; the engine's I/O threads
/// call [`InboundHandler::on_inbound`] directly, so listeners run
/// synchronously on the calling thread in registration order. Each
/// listener call is isolated: one panicking listener cannot prevent
/// delivery to the rest or poison the engine thread.
pub struct InboundDispatcher {
    listeners: Arc<ListenerRegistry>,
}

impl InboundDispatcher {
    /// Create a dispatcher reading from the given registry
    pub fn new(listeners: Arc<ListenerRegistry>) -> Self {
        Self { listeners }
    }
}

impl InboundHandler for InboundDispatcher {
    fn on_inbound(&self, message: InboundMessage) -> InboundAck {
        debug!(
            from = %message.from,
            to = %message.to,
            "Received message: {}",
            message.text
        );

        let listeners = self.listeners.snapshot();
        for listener in listeners.iter() {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener.on_message(&message)));
            if outcome.is_err() {
                warn!(from = %message.from, "Listener panicked while handling inbound message");
            }
        }

        // The peer expects an acknowledgment even with no listeners registered.
        InboundAck::OK
    }

    fn on_request_expired(&self, expired: ExpiredRequest) {
        warn!("Request expired without a response: [ {expired} ]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::MessageListener;
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

    struct Panicker;

    impl MessageListener for Panicker {
        fn on_message(&self, _message: &InboundMessage) {
            panic!("listener blew up");
        }
    }

    #[test]
    fn test_fan_out_invokes_all_listeners_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = Arc::new(ListenerRegistry::new());
        for tag in ["a", "b", "c"] {
            registry.register(Arc::new(Recorder {
                tag,
                log: Arc::clone(&log),
            }));
        }

        let dispatcher = InboundDispatcher::new(Arc::clone(&registry));
        let ack = dispatcher.on_inbound(InboundMessage::new("hello", "1000", "2000"));

        assert_eq!(ack, InboundAck::OK);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_delivery() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = Arc::new(ListenerRegistry::new());
        registry.register(Arc::new(Recorder {
            tag: "before",
            log: Arc::clone(&log),
        }));
        registry.register(Arc::new(Panicker));
        registry.register(Arc::new(Recorder {
            tag: "after",
            log: Arc::clone(&log),
        }));

        let dispatcher = InboundDispatcher::new(Arc::clone(&registry));
        let ack = dispatcher.on_inbound(InboundMessage::new("hello", "1000", "2000"));

        assert_eq!(ack, InboundAck::OK);
        assert_eq!(*log.lock().unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn test_acknowledges_with_no_listeners() {
        let dispatcher = InboundDispatcher::new(Arc::new(ListenerRegistry::new()));
        let ack = dispatcher.on_inbound(InboundMessage::new("hello", "1000", "2000"));
        assert_eq!(ack, InboundAck::OK);
    }
}

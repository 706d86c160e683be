use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

/// The four events a live connection publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connect,
    Disconnect,
    Message,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Connect,
    Disconnect,
    /// A frame that parsed as JSON.
    Message(Value),
    Error(String),
}

impl ClientEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connect => EventKind::Connect,
            Self::Disconnect => EventKind::Disconnect,
            Self::Message(_) => EventKind::Message,
            Self::Error(_) => EventKind::Error,
        }
    }
}

pub type Handler = Rc<RefCell<dyn FnMut(&ClientEvent)>>;

/// Per-event handler lists, invoked in registration order.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(EventKind, Handler)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&ClientEvent) + 'static) {
        self.handlers.push((kind, Rc::new(RefCell::new(handler))));
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.iter().filter(|(k, _)| *k == kind).count()
    }

    fn handlers_for(&self, kind: EventKind) -> Vec<Handler> {
        self.handlers
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, h)| Rc::clone(h))
            .collect()
    }

    /// Invoke every handler registered for the event's kind.
    ///
    /// The handler list is copied out before any handler runs, so handlers
    /// may register new handlers (which take effect from the next event).
    pub fn dispatch(bus: &RefCell<Self>, event: &ClientEvent) {
        let handlers = bus.borrow().handlers_for(event.kind());
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut f) => f(event),
                Err(_) => tracing::warn!(kind = ?event.kind(), "skipping re-entrant event handler"),
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

//! Dock event bus
//!
//! Every successful dock mutation publishes one or more events.
//! Granular events fire before `layoutChanged`; subscribers observe a
//! fully consistent state snapshot and must not mutate the manager
//! during dispatch (queue through the host scheduler instead).
//!
//! Emits are reentrancy-safe: an emit issued from inside a handler is
//! queued and dispatched after the current event finishes, preserving
//! overall ordering.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::geometry::DropPosition;

/// An event published by the dock manager.
///
/// The wire names returned by [`name`] are stable at the public edge.
///
/// [`name`]: DockEvent::name
#[derive(Debug, Clone, PartialEq)]
pub enum DockEvent {
    PanelAdded {
        panel_id: String,
    },
    PanelRemoved {
        panel_id: String,
    },
    PanelEdited {
        panel_id: String,
    },
    PanelMoved {
        panel_id: String,
        target_id: String,
        position: DropPosition,
    },
    Resize {
        node_id: String,
        size: f64,
    },
    ActivePanelChanged {
        group_id: String,
        panel_id: String,
    },
    LayoutChanged,
    PanelMaximized {
        panel_id: String,
    },
    PanelRestored {
        panel_id: String,
    },
}

impl DockEvent {
    /// Stable event name
    pub fn name(&self) -> &'static str {
        match self {
            DockEvent::PanelAdded { .. } => "panelAdded",
            DockEvent::PanelRemoved { .. } => "panelRemoved",
            DockEvent::PanelEdited { .. } => "panelEdited",
            DockEvent::PanelMoved { .. } => "panelMoved",
            DockEvent::Resize { .. } => "resize",
            DockEvent::ActivePanelChanged { .. } => "activePanelChanged",
            DockEvent::LayoutChanged => "layoutChanged",
            DockEvent::PanelMaximized { .. } => "panelMaximized",
            DockEvent::PanelRestored { .. } => "panelRestored",
        }
    }
}

/// Token returned by [`EventBus::subscribe`]; pass it back to
/// [`EventBus::unsubscribe`] to detach the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Handler = Rc<RefCell<dyn FnMut(&DockEvent)>>;

/// Small publish/subscribe hub for dock events.
///
/// Single-threaded by design; the whole engine runs cooperatively
/// between input events.
pub struct EventBus {
    handlers: RefCell<Vec<(u64, Handler)>>,
    queue: RefCell<VecDeque<DockEvent>>,
    dispatching: Cell<bool>,
    next_token: Cell<u64>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            queue: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            next_token: Cell::new(1),
        }
    }

    /// Register a handler for all dock events
    pub fn subscribe(&self, handler: impl FnMut(&DockEvent) + 'static) -> Subscription {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        self.handlers
            .borrow_mut()
            .push((token, Rc::new(RefCell::new(handler))));
        Subscription(token)
    }

    /// Detach a handler. Returns false when the token is unknown.
    /// During dispatch the removal takes effect from the next event on.
    pub fn unsubscribe(&self, token: Subscription) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != token.0);
        handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Publish an event to all subscribers.
    ///
    /// Reentrant emits append to the queue and are drained in order by
    /// the outermost call.
    pub fn emit(&self, event: DockEvent) {
        self.queue.borrow_mut().push_back(event);
        if self.dispatching.get() {
            return;
        }

        self.dispatching.set(true);
        while let Some(event) = {
            let mut queue = self.queue.borrow_mut();
            queue.pop_front()
        } {
            // Snapshot so handlers may subscribe/unsubscribe mid-dispatch
            let handlers: Vec<Handler> = self
                .handlers
                .borrow()
                .iter()
                .map(|(_, h)| Rc::clone(h))
                .collect();
            for handler in handlers {
                (handler.borrow_mut())(&event);
            }
        }
        self.dispatching.set(false);
    }
}

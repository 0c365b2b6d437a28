#![forbid(unsafe_code)]

//! Typed publish/subscribe channels.
//!
//! Every notification a control exposes (mouse, focus, draw, geometry
//! changes) is an [`Event`] parameterised by its argument type. Handlers run
//! in registration order and are removed through the [`HandlerId`] returned
//! when they were added.

use std::fmt;

/// Token identifying one handler registration on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Handler<A> = Box<dyn FnMut(&mut A)>;

/// An ordered list of handlers for arguments of type `A`.
pub struct Event<A> {
    handlers: Vec<(HandlerId, Handler<A>)>,
    next_id: u64,
}

impl<A> Event<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a handler and return its removal token.
    pub fn add_handler(&mut self, handler: impl FnMut(&mut A) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if the token was not registered
    /// (already removed, or issued by another channel).
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        match self.handlers.iter().position(|(hid, _)| *hid == id) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invoke every registered handler in registration order.
    pub fn raise(&mut self, args: &mut A) {
        for (_, handler) in &mut self.handlers {
            handler(args);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

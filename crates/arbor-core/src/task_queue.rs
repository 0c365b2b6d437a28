#![forbid(unsafe_code)]

//! Single-threaded FIFO queue of deferred callbacks.
//!
//! A [`TaskQueue`] is a cheap, clonable handle; every clone feeds the same
//! queue. Tasks receive the context `C` they were scheduled against when the
//! owner drains the queue, so a task can mutate the tree that scheduled it.
//!
//! # Invariants
//!
//! 1. Tasks run exactly once, in the order they were scheduled.
//! 2. A task scheduled while the queue is being drained runs in the same
//!    drain, after every task scheduled before it.
//! 3. Draining an empty queue is a no-op.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// A deferred callback.
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

/// Handle to a shared FIFO of deferred callbacks.
pub struct TaskQueue<C> {
    tasks: Rc<RefCell<VecDeque<Task<C>>>>,
}

impl<C> TaskQueue<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Enqueue `task` to run once, later, after every task already queued.
    pub fn schedule_once(&self, task: impl FnOnce(&mut C) + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Remove the oldest task without running it.
    pub fn pop(&self) -> Option<Task<C>> {
        self.tasks.borrow_mut().pop_front()
    }

    /// Run tasks until the queue is empty. Returns how many ran.
    pub fn run_pending(&self, cx: &mut C) -> usize {
        let mut ran = 0;
        // The borrow is released before each task runs so tasks may schedule more.
        while let Some(task) = self.pop() {
            task(cx);
            ran += 1;
        }
        ran
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl<C> Clone for TaskQueue<C> {
    fn clone(&self) -> Self {
        Self {
            tasks: Rc::clone(&self.tasks),
        }
    }
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TaskQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}

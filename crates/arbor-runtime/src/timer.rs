#![forbid(unsafe_code)]

//! One-shot and repeating timers.
//!
//! Timers never run their action directly. When due, the action is queued
//! on the shared [`TaskQueue`] so it runs in FIFO order with every other
//! deferred task (position-cache drains, `invoke_later` callbacks).

use arbor_core::TaskQueue;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Identifier of a timer within its [`TimerManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

type TimerAction<C> = Rc<RefCell<Box<dyn FnMut(&mut C)>>>;

struct Timer<C> {
    deadline: Instant,
    /// `Some` for intervals.
    period: Option<Duration>,
    cancelled: Rc<Cell<bool>>,
    action: TimerAction<C>,
}

/// Handle returned by [`TimerManager::set_timeout`] and
/// [`TimerManager::set_interval`].
#[derive(Debug, Clone)]
pub struct TimerTask {
    id: TimerId,
    cancelled: Rc<Cell<bool>>,
}

impl TimerTask {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Stop the timer. Calling this more than once has no further effect,
    /// and an action already queued but not yet run is skipped.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Owns every live timer of an application.
pub struct TimerManager<C> {
    timers: BTreeMap<TimerId, Timer<C>>,
    next_id: u64,
}

impl<C: 'static> TimerManager<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Run `action` once, `delay` from now.
    pub fn set_timeout(
        &mut self,
        delay: Duration,
        action: impl FnMut(&mut C) + 'static,
    ) -> TimerTask {
        self.insert(delay, None, Box::new(action))
    }

    /// Run `action` every `period`, first after one period.
    pub fn set_interval(
        &mut self,
        period: Duration,
        action: impl FnMut(&mut C) + 'static,
    ) -> TimerTask {
        self.insert(period, Some(period), Box::new(action))
    }

    fn insert(
        &mut self,
        delay: Duration,
        period: Option<Duration>,
        action: Box<dyn FnMut(&mut C)>,
    ) -> TimerTask {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let cancelled = Rc::new(Cell::new(false));
        self.timers.insert(
            id,
            Timer {
                deadline: Instant::now() + delay,
                period,
                cancelled: Rc::clone(&cancelled),
                action: Rc::new(RefCell::new(action)),
            },
        );
        arbor_core::trace!(timer = id.0, ?delay, repeating = period.is_some(), "timer set");
        TimerTask { id, cancelled }
    }

    /// Queue the action of every timer due at `now` and return how many
    /// were queued. One-shot timers are removed; intervals are rearmed one
    /// period after `now`. Cancelled timers are dropped.
    pub fn fire_due(&mut self, now: Instant, queue: &TaskQueue<C>) -> usize {
        self.timers.retain(|_, timer| !timer.cancelled.get());
        let mut fired = 0;
        let mut expired = Vec::new();
        for (&id, timer) in &mut self.timers {
            if timer.deadline > now {
                continue;
            }
            let cancelled = Rc::clone(&timer.cancelled);
            let action = Rc::clone(&timer.action);
            queue.schedule_once(move |cx: &mut C| {
                if cancelled.get() {
                    return;
                }
                // An interval whose previous run is still executing skips
                // this tick.
                if let Ok(mut action) = action.try_borrow_mut() {
                    (*action)(cx);
                }
            });
            fired += 1;
            match timer.period {
                Some(period) => timer.deadline = now + period,
                None => expired.push(id),
            }
        }
        for id in expired {
            self.timers.remove(&id);
        }
        fired
    }

    /// Earliest deadline among live timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers
            .values()
            .filter(|timer| !timer.cancelled.get())
            .map(|timer| timer.deadline)
            .min()
    }

    /// Number of timers not yet cancelled or expired.
    pub fn len(&self) -> usize {
        self.timers
            .values()
            .filter(|timer| !timer.cancelled.get())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: 'static> Default for TimerManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TimerManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerManager")
            .field("timers", &self.timers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn later(ms: u64) -> Instant {
        Instant::now() + Duration::from_millis(ms)
    }

    #[test]
    fn timeout_fires_once() {
        let mut timers = TimerManager::<Vec<u32>>::new();
        let queue = TaskQueue::new();
        timers.set_timeout(Duration::from_millis(5), |log: &mut Vec<u32>| log.push(1));

        assert_eq!(timers.fire_due(Instant::now(), &queue), 0);
        assert_eq!(timers.fire_due(later(50), &queue), 1);
        assert!(timers.is_empty());

        let mut log = Vec::new();
        queue.run_pending(&mut log);
        assert_eq!(log, vec![1]);
        assert_eq!(timers.fire_due(later(100), &queue), 0);
    }

    #[test]
    fn interval_repeats_until_cancelled() {
        let mut timers = TimerManager::<u32>::new();
        let queue = TaskQueue::new();
        let task = timers.set_interval(Duration::from_millis(1), |count: &mut u32| *count += 1);

        let mut count = 0;
        timers.fire_due(later(10), &queue);
        queue.run_pending(&mut count);
        timers.fire_due(later(1_000), &queue);
        queue.run_pending(&mut count);
        assert_eq!(count, 2);
        assert_eq!(timers.len(), 1);

        task.cancel();
        task.cancel();
        assert!(task.is_cancelled());
        assert!(timers.is_empty());
        assert_eq!(timers.fire_due(later(10_000), &queue), 0);
        assert!(timers.next_deadline().is_none());
    }

    #[test]
    fn cancel_skips_already_queued_action() {
        let mut timers = TimerManager::<u32>::new();
        let queue = TaskQueue::new();
        let task = timers.set_timeout(Duration::ZERO, |count: &mut u32| *count += 1);
        assert_eq!(timers.fire_due(later(1), &queue), 1);
        task.cancel();

        let mut count = 0;
        queue.run_pending(&mut count);
        assert_eq!(count, 0);
    }

    #[test]
    fn next_deadline_is_earliest() {
        let mut timers = TimerManager::<()>::new();
        timers.set_timeout(Duration::from_secs(60), |_| {});
        let soon = timers.set_timeout(Duration::from_millis(10), |_| {});
        let first = timers.next_deadline().unwrap();
        assert!(first <= later(10));
        soon.cancel();
        assert!(timers.next_deadline().unwrap() > first);
    }
}

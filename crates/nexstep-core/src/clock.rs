//! Shared ticking time source.
//!
//! A [`GlobalClock`] hands the same "now" to every subscriber so that views
//! derived from time (activity stages, progress bars) agree with each other
//! within one tick. It is constructed explicitly and passed to whoever needs
//! it; tests inject a [`ManualClock`] as its [`TimeSource`].
//!
//! The clock owns a timer task only while it is started *and* has at least
//! one subscriber. The last [`Subscription`] to go away aborts the task; the
//! next subscriber spawns a new one.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use jiff::Timestamp;
use log::{debug, info};
use tokio::{runtime::Handle, task::JoinHandle, time::MissedTickBehavior};

use crate::error::{NexstepError, Result};

/// Default tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Source of the current wall-clock instant.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A settable time source for tests and replays.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type Listener = Arc<dyn Fn(Timestamp) + Send + Sync>;

struct ClockState {
    current: Timestamp,
    listeners: BTreeMap<u64, Listener>,
    next_id: u64,
    runtime: Option<Handle>,
    ticker: Option<JoinHandle<()>>,
}

struct ClockInner {
    source: Arc<dyn TimeSource>,
    interval: Duration,
    state: Mutex<ClockState>,
}

impl ClockInner {
    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self) -> Timestamp {
        let now = self.source.now();
        let listeners: Vec<Listener> = {
            let mut state = self.lock();
            state.current = now;
            state.listeners.values().cloned().collect()
        };
        for listener in listeners {
            listener(now);
        }
        now
    }
}

/// A shared clock with an explicit start/stop lifecycle.
#[derive(Clone)]
pub struct GlobalClock {
    inner: Arc<ClockInner>,
}

impl GlobalClock {
    /// Creates a stopped clock reading from `source`.
    pub fn new(source: Arc<dyn TimeSource>, interval: Duration) -> Self {
        let current = source.now();
        Self {
            inner: Arc::new(ClockInner {
                source,
                interval,
                state: Mutex::new(ClockState {
                    current,
                    listeners: BTreeMap::new(),
                    next_id: 0,
                    runtime: None,
                    ticker: None,
                }),
            }),
        }
    }

    /// A stopped clock over the system time with the default interval.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), DEFAULT_TICK_INTERVAL)
    }

    /// Starts ticking on the current Tokio runtime. The timer task is only
    /// spawned once there is a subscriber.
    ///
    /// # Errors
    ///
    /// Returns `NexstepError::Configuration` when called outside a runtime.
    pub fn start(&self) -> Result<()> {
        let handle = Handle::try_current().map_err(|e| NexstepError::Configuration {
            message: format!("Clock requires a Tokio runtime: {e}"),
        })?;

        let mut state = self.inner.lock();
        if state.runtime.is_some() {
            return Ok(());
        }
        info!("Clock started with a {:?} interval", self.inner.interval);
        state.runtime = Some(handle);
        if !state.listeners.is_empty() {
            self.spawn_ticker(&mut state);
        }
        Ok(())
    }

    /// Stops ticking and releases the timer task. Subscribers are kept and
    /// resume receiving ticks after the next [`start`](Self::start).
    pub fn stop(&self) {
        let mut state = self.inner.lock();
        if state.runtime.take().is_some() {
            info!("Clock stopped");
        }
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
    }

    /// Registers a listener invoked with the new instant on every tick.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Timestamp) + Send + Sync + 'static,
    {
        let mut state = self.inner.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(id, Arc::new(listener));
        debug!("Clock subscriber {id} added ({} total)", state.listeners.len());

        if state.ticker.is_none() && state.runtime.is_some() {
            self.spawn_ticker(&mut state);
        }

        Subscription {
            clock: Arc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Current instant in milliseconds since the Unix epoch.
    pub fn snapshot(&self) -> i64 {
        self.current().as_millisecond()
    }

    /// Current instant as of the last tick.
    pub fn current(&self) -> Timestamp {
        self.inner.lock().current
    }

    /// Reads the time source and notifies every subscriber synchronously.
    pub fn tick(&self) -> Timestamp {
        self.inner.tick()
    }

    /// Whether a timer task currently exists.
    pub fn is_ticking(&self) -> bool {
        self.inner.lock().ticker.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    fn spawn_ticker(&self, state: &mut ClockState) {
        let Some(runtime) = state.runtime.as_ref() else {
            return;
        };
        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.interval;

        state.ticker = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; subscribers already see
            // the value from the last snapshot.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.tick();
            }
        }));
        debug!("Clock timer task spawned");
    }
}

impl Drop for ClockInner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
    }
}

/// Handle returned by [`GlobalClock::subscribe`]. Dropping it unsubscribes.
pub struct Subscription {
    clock: Weak<ClockInner>,
    id: Option<u64>,
}

impl Subscription {
    /// Removes the listener now rather than at drop.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let Some(inner) = self.clock.upgrade() else {
            return;
        };
        let mut state = inner.lock();
        state.listeners.remove(&id);
        debug!("Clock subscriber {id} removed ({} left)", state.listeners.len());
        if state.listeners.is_empty() {
            if let Some(ticker) = state.ticker.take() {
                ticker.abort();
                debug!("Clock timer task released");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn at(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn manual_clock() -> (ManualClock, GlobalClock) {
        let source = ManualClock::new(at("2025-05-12T10:00:00Z"));
        let clock = GlobalClock::new(Arc::new(source.clone()), Duration::from_secs(10));
        (source, clock)
    }

    #[test]
    fn test_tick_notifies_all_subscribers_with_same_instant() {
        let (source, clock) = manual_clock();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = seen.clone();
            clock.subscribe(move |now| seen.lock().unwrap().push(("first", now)))
        };
        let second = {
            let seen = seen.clone();
            clock.subscribe(move |now| seen.lock().unwrap().push(("second", now)))
        };

        source.set(at("2025-05-12T10:00:10Z"));
        let now = clock.tick();

        assert_eq!(now, at("2025-05-12T10:00:10Z"));
        assert_eq!(clock.snapshot(), now.as_millisecond());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", now), ("second", now)]
        );

        drop(first);
        second.unsubscribe();
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribed_listener_is_not_called() {
        let (_source, clock) = manual_clock();
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let calls = calls.clone();
            clock.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        clock.tick();
        subscription.unsubscribe();
        clock.tick();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_can_subscribe_and_unsubscribe_during_tick() {
        let (_source, clock) = manual_clock();
        let added = Arc::new(Mutex::new(Vec::new()));
        let removed = Arc::new(Mutex::new(Some(clock.subscribe(|_| {}))));

        let reentrant = {
            let inner_clock = clock.clone();
            let added = added.clone();
            let removed = removed.clone();
            clock.subscribe(move |_| {
                added.lock().unwrap().push(inner_clock.subscribe(|_| {}));
                drop(removed.lock().unwrap().take());
            })
        };
        assert_eq!(clock.subscriber_count(), 2);

        clock.tick();
        assert_eq!(clock.subscriber_count(), 2);
        assert!(removed.lock().unwrap().is_none());

        clock.tick();
        assert_eq!(clock.subscriber_count(), 3);

        drop(reentrant);
        added.lock().unwrap().clear();
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let (_source, clock) = manual_clock();
        assert!(matches!(
            clock.start(),
            Err(NexstepError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_timer_without_subscribers() {
        let (_source, clock) = manual_clock();
        clock.start().unwrap();
        assert!(!clock.is_ticking());

        let subscription = clock.subscribe(|_| {});
        assert!(clock.is_ticking());

        drop(subscription);
        assert!(!clock.is_ticking());

        let _again = clock.subscribe(|_| {});
        assert!(clock.is_ticking());

        clock.stop();
        assert!(!clock.is_ticking());
    }

    #[tokio::test]
    async fn test_subscribe_before_start_waits_for_start() {
        let (_source, clock) = manual_clock();
        let _subscription = clock.subscribe(|_| {});
        assert!(!clock.is_ticking());

        clock.start().unwrap();
        assert!(clock.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_on_interval() {
        let (_source, clock) = manual_clock();
        clock.start().unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let _subscription = {
            let calls = calls.clone();
            clock.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_released_timer_stops_ticking() {
        let (_source, clock) = manual_clock();
        clock.start().unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let calls = calls.clone();
            clock.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        tokio::time::sleep(Duration::from_secs(15)).await;
        drop(subscription);
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

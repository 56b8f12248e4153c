use std::{
    collections::VecDeque,
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicU64},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, ThreadId},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::{
    sync::broadcast::{self, error::RecvError, Sender},
    time::timeout,
};

use crate::{log_debug, log_error};

use super::{
    error::{LoadStateError, Result},
    traits::atomic::{CounterAtomic, FlagAtomic},
    types::{LoadStatus, LoadStatusReceiver, Observer, SubscriptionId},
};

pub const DEFAULT_NAME: &str = "gif";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 4;

/// Configuration for a [`LoadState`] holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadStateOptions {
    /// Name shown in log lines and error messages.
    pub name: String,
    /// Capacity of the async status channel.
    pub channel_capacity: usize,
}

impl Default for LoadStateOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.into(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl LoadStateOptions {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LoadStateError::Config("name must not be empty".into()));
        }
        if self.channel_capacity == 0 {
            return Err(LoadStateError::Config(
                "channel_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

struct Inner {
    loaded: AtomicBool,
    // Held across store and notification so writes publish one at a time.
    writer: Mutex<()>,
    // Thread currently publishing, and writes its observers made meanwhile.
    publishing: Mutex<Option<ThreadId>>,
    pending: Mutex<VecDeque<bool>>,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
    next_subscription: AtomicU64,
    status_sx: Sender<LoadStatus>,
    options: LoadStateOptions,
}

/// Observable flag recording whether the external GIF encoding library
/// has finished loading.
///
/// Starts as not loaded. Clones share the same flag and observers, so the
/// holder can be created once at the application root and handed to
/// whichever component needs it.
///
/// Every call to [`set_loaded`](LoadState::set_loaded) notifies, in order:
/// 1. each synchronous observer registered with [`subscribe`](LoadState::subscribe),
///    on the calling thread, after the new value is stored;
/// 2. every async receiver from [`get_status_receiver`](LoadState::get_status_receiver).
///
/// Setting the current value again still notifies.
///
/// Writes from different threads are published one at a time, so the last
/// notification every observer receives matches the stored value. An
/// observer that calls `set_loaded` itself has its write queued and
/// published after the current notification round completes. A panicking
/// observer is logged and skipped.
#[derive(Clone)]
pub struct LoadState {
    inner: Arc<Inner>,
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadState")
            .field("name", &self.inner.options.name)
            .field("status", &self.status())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl LoadState {
    /// Creates a holder with default options.
    pub fn new() -> Self {
        Self::build(LoadStateOptions::default())
    }

    /// Creates a holder with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`LoadStateError::Config`] if the name is blank or the
    /// channel capacity is zero.
    pub fn with_options(options: LoadStateOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: LoadStateOptions) -> Self {
        let (status_sx, _) = broadcast::channel(options.channel_capacity);
        Self {
            inner: Arc::new(Inner {
                loaded: AtomicBool::new(false),
                writer: Mutex::new(()),
                publishing: Mutex::new(None),
                pending: Mutex::new(VecDeque::new()),
                observers: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
                status_sx,
                options,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.options.name
    }

    pub fn options(&self) -> &LoadStateOptions {
        &self.inner.options
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.is_true()
    }

    pub fn status(&self) -> LoadStatus {
        LoadStatus::from(self.is_loaded())
    }

    /// Records whether the library is loaded and notifies every observer
    /// exactly once with the new value.
    pub fn set_loaded(&self, value: bool) {
        let current = thread::current().id();
        if *lock(&self.inner.publishing) == Some(current) {
            lock(&self.inner.pending).push_back(value);
            return;
        }

        let _writer = lock(&self.inner.writer);
        *lock(&self.inner.publishing) = Some(current);
        let mut next = Some(value);
        while let Some(value) = next {
            self.publish(value);
            next = lock(&self.inner.pending).pop_front();
        }
        *lock(&self.inner.publishing) = None;
    }

    fn publish(&self, value: bool) {
        self.inner.loaded.set_bool(value);
        let status = LoadStatus::from(value);
        log_debug!("[{}] load status: {:?}", self.inner.options.name, status);

        // Observers run without the list lock held so they may subscribe.
        let observers = self
            .lock_observers()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect::<Vec<Observer>>();
        for observer in observers {
            if catch_unwind(AssertUnwindSafe(|| observer(status))).is_err() {
                log_error!(
                    "[{}] observer panicked on {:?}",
                    self.inner.options.name,
                    status
                );
            }
        }

        let _ = self.inner.status_sx.send(status);
    }

    /// Registers a synchronous observer, called on every `set_loaded`.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(LoadStatus) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.next_id());
        let observer: Observer = Arc::new(observer);
        self.lock_observers().push((id, observer));
        id
    }

    /// Removes an observer. Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.lock_observers();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.lock_observers().len()
    }

    /// Async subscription to status changes. Only changes made after this
    /// call are delivered.
    pub fn get_status_receiver(&self) -> LoadStatusReceiver {
        self.inner.status_sx.subscribe()
    }

    /// Resolves once the library is reported as loaded. Returns
    /// immediately if it already is.
    pub async fn wait_until_loaded(&self) -> Result<()> {
        let mut receiver = self.get_status_receiver();
        if self.is_loaded() {
            return Ok(());
        }
        loop {
            match receiver.recv().await {
                Ok(LoadStatus::Loaded) => return Ok(()),
                Ok(LoadStatus::NotLoaded) => {}
                Err(RecvError::Lagged(skipped)) => {
                    log_debug!(
                        "[{}] status receiver lagged by {}",
                        self.inner.options.name,
                        skipped
                    );
                    if self.is_loaded() {
                        return Ok(());
                    }
                }
                Err(RecvError::Closed) => return Err(LoadStateError::ChannelClosed),
            }
        }
    }

    /// Like [`wait_until_loaded`](LoadState::wait_until_loaded), bounded by
    /// `duration`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadStateError::Timeout`] if the library is still not
    /// loaded when `duration` elapses.
    pub async fn wait_until_loaded_timeout(&self, duration: Duration) -> Result<()> {
        match timeout(duration, self.wait_until_loaded()).await {
            Ok(result) => result,
            Err(elapsed) => {
                log_error!(
                    "[{}] not loaded after {:?}",
                    self.inner.options.name,
                    duration
                );
                Err(elapsed.into())
            }
        }
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Observer)>> {
        lock(&self.inner.observers)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_default_is_not_loaded() {
        let state = LoadState::new();
        assert!(!state.is_loaded());
        assert_eq!(state.status(), LoadStatus::NotLoaded);
    }

    #[test]
    fn test_set_true_then_false() {
        let state = LoadState::new();
        state.set_loaded(true);
        assert!(state.is_loaded());
        state.set_loaded(false);
        assert!(!state.is_loaded());
    }

    #[test]
    fn test_set_true_twice_is_idempotent() {
        let state = LoadState::new();
        state.set_loaded(true);
        state.set_loaded(true);
        assert!(state.is_loaded());
    }

    #[test]
    fn test_last_write_wins() {
        let state = LoadState::new();
        let sequence = [true, false, false, true, true, false, true];
        for value in sequence {
            state.set_loaded(value);
        }
        assert_eq!(state.is_loaded(), *sequence.last().unwrap());
    }

    #[test]
    fn test_clones_share_flag() {
        let state = LoadState::new();
        let handle = state.clone();
        handle.set_loaded(true);
        assert!(state.is_loaded());
    }

    #[test]
    fn test_observer_called_once_per_set() {
        let state = LoadState::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = calls.clone();
        state.subscribe(move |status| calls_clone.lock().unwrap().push(status));

        state.set_loaded(true);
        state.set_loaded(true);
        state.set_loaded(false);

        assert_eq!(
            *calls.lock().unwrap(),
            vec![LoadStatus::Loaded, LoadStatus::Loaded, LoadStatus::NotLoaded]
        );
    }

    #[test]
    fn test_observer_sees_updated_value() {
        let state = LoadState::new();
        let reader = state.clone();
        let matched = Arc::new(AtomicUsize::new(0));
        let matched_clone = matched.clone();
        state.subscribe(move |status| {
            if reader.is_loaded() == status.is_loaded() {
                matched_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        state.set_loaded(true);
        state.set_loaded(false);
        assert_eq!(matched.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let state = LoadState::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let id = state.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(state.observer_count(), 1);

        state.set_loaded(true);
        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.set_loaded(false);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(state.observer_count(), 0);
    }

    #[test]
    fn test_observer_may_reenter() {
        let state = LoadState::new();
        let inner = state.clone();
        state.subscribe(move |_| {
            if inner.observer_count() == 1 {
                inner.subscribe(|_| {});
            }
        });
        state.set_loaded(true);
        assert_eq!(state.observer_count(), 2);
    }

    #[test]
    fn test_observer_set_is_queued_after_round() {
        let state = LoadState::new();
        let inner = state.clone();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = calls.clone();
        state.subscribe(move |status| {
            calls_clone.lock().unwrap().push(status);
            if status.is_loaded() {
                inner.set_loaded(false);
            }
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        state.subscribe(move |status| seen_clone.lock().unwrap().push(status));

        state.set_loaded(true);

        assert!(!state.is_loaded());
        assert_eq!(
            *calls.lock().unwrap(),
            vec![LoadStatus::Loaded, LoadStatus::NotLoaded]
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![LoadStatus::Loaded, LoadStatus::NotLoaded]
        );
    }

    #[test]
    fn test_panicking_observer_is_skipped() {
        let state = LoadState::new();
        let count = Arc::new(AtomicUsize::new(0));
        state.subscribe(|_| panic!("observer failure"));
        let count_clone = count.clone();
        state.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        let mut receiver = state.get_status_receiver();

        state.set_loaded(true);
        state.set_loaded(false);

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(receiver.try_recv().unwrap(), LoadStatus::Loaded);
        assert_eq!(receiver.try_recv().unwrap(), LoadStatus::NotLoaded);
    }

    #[test]
    fn test_with_options_rejects_zero_capacity() {
        let options = LoadStateOptions {
            channel_capacity: 0,
            ..Default::default()
        };
        let err = LoadState::with_options(options).unwrap_err();
        assert!(matches!(err, LoadStateError::Config(_)));
    }

    #[test]
    fn test_with_options_rejects_blank_name() {
        let options = LoadStateOptions {
            name: "  ".into(),
            ..Default::default()
        };
        assert!(LoadState::with_options(options).is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: LoadStateOptions = serde_json::from_str(r#"{"name":"encoder"}"#).unwrap();
        assert_eq!(options.name, "encoder");
        assert_eq!(options.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_debug_output() {
        let state = LoadState::new();
        let debug = format!("{:?}", state);
        assert!(debug.contains("LoadState"));
        assert!(debug.contains("NotLoaded"));
    }

    #[tokio::test]
    async fn test_status_receiver_gets_every_set() {
        let state = LoadState::new();
        let mut receiver = state.get_status_receiver();

        state.set_loaded(true);
        state.set_loaded(true);

        assert_eq!(receiver.recv().await.unwrap(), LoadStatus::Loaded);
        assert_eq!(receiver.recv().await.unwrap(), LoadStatus::Loaded);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_wait_until_loaded_immediate() {
        let state = LoadState::new();
        state.set_loaded(true);
        assert!(state.wait_until_loaded().await.is_ok());
    }

    #[tokio::test]
    async fn test_wait_until_loaded_timeout_elapses() {
        let state = LoadState::new();
        let result = state
            .wait_until_loaded_timeout(Duration::from_millis(20))
            .await;
        assert!(matches!(result, Err(LoadStateError::Timeout(_))));
    }
}

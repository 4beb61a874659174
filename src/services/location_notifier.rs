//! Delivery of location readings from a producer to a single observer.
//!
//! A producer (device location service, replayed track, test fixture) only
//! knows about [`LocationUpdateNotifier`]. Readings reach the observer one at
//! a time, in the order the producer emits them, for as long as the feed is
//! alive. Invalid coordinates are not filtered here; that is up to the
//! observer (see [`LatestLocation`]).

use std::sync::{Arc, Mutex, MutexGuard};

use futures::{Stream, StreamExt};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::location::LocationReading;

pub trait LocationUpdateNotifier: Send {
    fn update(&mut self, reading: LocationReading);
}

impl<F> LocationUpdateNotifier for F
where
    F: FnMut(LocationReading) + Send,
{
    fn update(&mut self, reading: LocationReading) {
        self(reading)
    }
}

/// Dispatches readings to at most one observer.
#[derive(Default)]
pub struct LocationFeed {
    observer: Option<Box<dyn LocationUpdateNotifier>>,
    delivered: u64,
}

impl LocationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(observer: impl LocationUpdateNotifier + 'static) -> Self {
        Self {
            observer: Some(Box::new(observer)),
            delivered: 0,
        }
    }

    /// Attaches `observer`, returning the one it replaces.
    pub fn set_observer(
        &mut self,
        observer: impl LocationUpdateNotifier + 'static,
    ) -> Option<Box<dyn LocationUpdateNotifier>> {
        self.observer.replace(Box::new(observer))
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn LocationUpdateNotifier>> {
        self.observer.take()
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Number of readings handed to an observer so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Delivers `reading` synchronously. Returns false if nobody is listening.
    pub fn publish(&mut self, reading: LocationReading) -> bool {
        match self.observer.as_mut() {
            Some(observer) => {
                observer.update(reading);
                self.delivered += 1;
                true
            }
            None => {
                debug!(
                    "Dropping location reading ({}, {}): no observer attached",
                    reading.location.lat, reading.location.lng
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for LocationFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationFeed")
            .field("has_observer", &self.has_observer())
            .field("delivered", &self.delivered)
            .finish()
    }
}

/// Drains `stream` into `observer` in order and hands the observer back once
/// the stream ends.
pub async fn forward_stream<S, O>(stream: S, mut observer: O) -> O
where
    S: Stream<Item = LocationReading>,
    O: LocationUpdateNotifier,
{
    futures::pin_mut!(stream);
    while let Some(reading) = stream.next().await {
        observer.update(reading);
    }
    observer
}

/// Spawns a task that feeds everything sent on the returned channel to
/// `observer`. The task finishes, yielding the observer, when every sender
/// has been dropped.
pub fn spawn_channel_feed<O>(
    observer: O,
    buffer: usize,
) -> (mpsc::Sender<LocationReading>, JoinHandle<O>)
where
    O: LocationUpdateNotifier + 'static,
{
    let (tx, mut rx) = mpsc::channel(buffer.max(1));
    let handle = tokio::spawn(async move {
        let mut observer = observer;
        let mut received: u64 = 0;
        while let Some(reading) = rx.recv().await {
            observer.update(reading);
            received += 1;
        }
        debug!("Location channel closed after {} readings", received);
        observer
    });
    (tx, handle)
}

#[derive(Debug, Default)]
struct LatestState {
    last: Option<LocationReading>,
    updates: u64,
    rejected: u64,
}

/// Observer keeping the most recent valid reading. Clones share state, so one
/// clone can be given to a feed while another is read elsewhere.
#[derive(Debug, Clone, Default)]
pub struct LatestLocation {
    state: Arc<Mutex<LatestState>>,
}

impl LatestLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<LocationReading> {
        self.lock().last.clone()
    }

    pub fn updates(&self) -> u64 {
        self.lock().updates
    }

    pub fn rejected(&self) -> u64 {
        self.lock().rejected
    }

    fn lock(&self) -> MutexGuard<'_, LatestState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LocationUpdateNotifier for LatestLocation {
    fn update(&mut self, reading: LocationReading) {
        let mut state = self.lock();
        if !reading.location.is_valid() {
            warn!(
                "Ignoring out-of-range location ({}, {})",
                reading.location.lat, reading.location.lng
            );
            state.rejected += 1;
            return;
        }
        state.updates += 1;
        state.last = Some(reading);
    }
}

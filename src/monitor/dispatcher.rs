//! Subscriber dispatch.
//!
//! This module owns observer and stream registrations and fans each reading's
//! notification set out to them. Delivery to trait observers is synchronous
//! and in registration order; delivery to streams uses a bounded channel and
//! never blocks the monitoring timeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crossbeam_channel::{bounded, Sender, TrySendError};

use super::events::{BatteryEvent, KindFilter, Notification, ObserverId, SubscriptionId};
use super::observer::BatteryObserver;
use super::stream::MonitorStream;

#[derive(Clone)]
struct ObserverEntry {
    id: ObserverId,
    observer: Arc<dyn BatteryObserver>,
}

#[derive(Clone)]
struct StreamEntry {
    id: SubscriptionId,
    filter: KindFilter,
    tx: Sender<BatteryEvent>,
}

/// Fan-out registry for trait observers and stream subscriptions.
///
/// The registry is read-then-delivered atomically per reading: the set of
/// recipients is snapshotted before delivery starts, so an observer added
/// mid-dispatch does not receive the events currently being delivered.
/// Dispatch never mutates monitor state.
#[derive(Default)]
pub(crate) struct Dispatch {
    observers: RwLock<Vec<ObserverEntry>>,
    streams: RwLock<Vec<StreamEntry>>,
    dropped_events: AtomicU64,
}

impl Dispatch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register_observer(&self, observer: Arc<dyn BatteryObserver>) -> ObserverId {
        let id = ObserverId::new();
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ObserverEntry { id, observer });
        id
    }

    /// Removes an observer. Returns false if the id was not registered.
    pub(crate) fn unregister_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|entry| entry.id != id);
        observers.len() != before
    }

    pub(crate) fn subscribe(self: &Arc<Self>, filter: KindFilter, capacity: usize) -> MonitorStream {
        let id = SubscriptionId::new();
        let (tx, rx) = bounded::<BatteryEvent>(capacity.max(1));

        self.streams
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StreamEntry { id, filter, tx });

        MonitorStream::new(id, rx, Arc::clone(self))
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) {
        self.streams
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|entry| entry.id != id);
    }

    pub(crate) fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Delivers one reading's notification set to every current recipient.
    pub(crate) fn deliver(&self, notifications: &[Notification]) {
        if notifications.is_empty() {
            return;
        }

        let observers: Vec<ObserverEntry> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for notification in notifications {
            for entry in &observers {
                invoke(entry.observer.as_ref(), notification);
            }
        }

        let streams: Vec<StreamEntry> = self
            .streams
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if streams.is_empty() {
            return;
        }

        // Stamp each notification once; subscribers of the same reading see
        // the same event id and timestamp.
        let events: Vec<BatteryEvent> = notifications
            .iter()
            .map(|n| BatteryEvent::new(*n))
            .collect();

        for event in &events {
            for entry in &streams {
                if !entry.filter.contains(event.notification.kind()) {
                    continue;
                }
                match entry.tx.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                        // Never block the monitoring timeline on a slow subscriber.
                        self.dropped_events.fetch_add(1, Ordering::Relaxed);
                        tracing::debug!(
                            subscription = ?entry.id,
                            kind = ?event.notification.kind(),
                            "dropping event for slow or closed stream"
                        );
                    }
                }
            }
        }
    }
}

fn invoke(observer: &dyn BatteryObserver, notification: &Notification) {
    match *notification {
        Notification::BatteryLevelReached { percentage } => {
            observer.battery_level_reached(percentage);
        }
        Notification::SignificantLevelChange { level } => {
            observer.significant_level_change(level);
        }
        Notification::StateChanged { state } => {
            observer.battery_state_changed(state);
        }
        Notification::LevelChanged { percentage } => {
            observer.battery_level_changed(percentage);
        }
        Notification::LevelAndStateChanged { percentage, state } => {
            observer.battery_level_and_state_changed(percentage, state);
        }
    }
}

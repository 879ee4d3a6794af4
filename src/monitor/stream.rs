//! Subscription stream handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::error::{MonitorError, MonitorResult, StreamError};

use super::dispatcher::Dispatch;
use super::events::{BatteryEvent, SubscriptionId};

/// A subscription stream for battery events.
///
/// Dropping this stream unregisters the subscription; buffered events are
/// discarded with it.
pub struct MonitorStream {
    subscription_id: SubscriptionId,
    rx: Receiver<BatteryEvent>,
    registry: Arc<Dispatch>,
    unregistered: AtomicBool,
}

impl MonitorStream {
    pub(crate) fn new(
        subscription_id: SubscriptionId,
        rx: Receiver<BatteryEvent>,
        registry: Arc<Dispatch>,
    ) -> Self {
        Self {
            subscription_id,
            rx,
            registry,
            unregistered: AtomicBool::new(false),
        }
    }

    /// The subscription id backing this stream.
    #[must_use]
    pub const fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    /// Explicit unregistration. Idempotent.
    ///
    /// Events already buffered remain receivable; once the buffer drains the
    /// stream reports `Disconnected`.
    pub fn unsubscribe(&self) {
        if self.unregistered.swap(true, Ordering::AcqRel) {
            return;
        }
        self.registry.unsubscribe(self.subscription_id);
    }

    /// Receive the next event (blocking).
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Disconnected` once the subscription is removed
    /// and the buffer is drained.
    pub fn recv(&self) -> MonitorResult<BatteryEvent> {
        self.rx
            .recv()
            .map_err(|_| MonitorError::Stream(StreamError::Disconnected))
    }

    /// Receive the next event with a timeout.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Timeout` when no event arrives in time, or
    /// `StreamError::Disconnected` once the subscription is removed and the
    /// buffer is drained.
    pub fn recv_timeout(&self, timeout: Duration) -> MonitorResult<BatteryEvent> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => MonitorError::Stream(StreamError::Timeout {
                duration_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
            }),
            RecvTimeoutError::Disconnected => MonitorError::Stream(StreamError::Disconnected),
        })
    }

    /// Receive an already-buffered event without waiting.
    #[must_use]
    pub fn try_recv(&self) -> Option<BatteryEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for MonitorStream {
    fn drop(&mut self) {
        if !self.unregistered.swap(true, Ordering::AcqRel) {
            self.registry.unsubscribe(self.subscription_id);
        }
    }
}

impl std::fmt::Debug for MonitorStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorStream")
            .field("subscription_id", &self.subscription_id)
            .field("unregistered", &self.unregistered.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

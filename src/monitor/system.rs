//! Battery monitor facade.
//!
//! `BatteryMonitor` owns the change-detection core (detector + watchlist +
//! monitoring gate) behind one mutex, so readings are processed one at a time
//! and `stop_monitoring` is a hard gate: a reading racing with a stop is
//! either fully processed, delivery included, or fully dropped.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};

use crate::level::BatteryLevel;
use crate::reading::{BatteryReading, ChargingState, Percentage};
use crate::source::{ReadingSource, SimulatedSource};

use super::detector::ChangeDetector;
use super::dispatcher::Dispatch;
use super::events::{KindFilter, ObserverId};
use super::observer::BatteryObserver;
use super::stream::MonitorStream;
use super::watchlist::Watchlist;

/// Monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// When false, percentage-only notifications are suppressed while the
    /// device is charging. Level transitions, state changes, watch hits, and
    /// the combined channel always report.
    pub report_while_charging: bool,

    /// Per-subscription stream buffer capacity.
    pub stream_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            report_while_charging: true,
            stream_capacity: 64,
        }
    }
}

#[derive(Debug)]
struct Core {
    detector: ChangeDetector,
    watchlist: Watchlist,
    monitoring: bool,
}

/// The battery monitor.
///
/// Construct one per application with [`BatteryMonitor::new`], or use the
/// process-wide [`BatteryMonitor::shared`] accessor. Platform glue pushes
/// readings via [`BatteryMonitor::observe_reading`]; queries read last-known
/// state and work without any active subscription.
pub struct BatteryMonitor {
    source: Arc<dyn ReadingSource>,
    core: Mutex<Core>,
    dispatch: Arc<Dispatch>,
    stream_capacity: usize,
}

impl BatteryMonitor {
    /// Creates a monitor over the given reading source.
    #[must_use]
    pub fn new(source: Arc<dyn ReadingSource>, config: MonitorConfig) -> Self {
        Self {
            source,
            core: Mutex::new(Core {
                detector: ChangeDetector::new(config.report_while_charging),
                watchlist: Watchlist::new(),
                monitoring: false,
            }),
            dispatch: Arc::new(Dispatch::new()),
            stream_capacity: config.stream_capacity.max(1),
        }
    }

    /// Process-wide monitor instance, constructed on first access.
    ///
    /// The shared instance is backed by a [`SimulatedSource`] that reports
    /// unknown until platform glue pushes readings; applications that own a
    /// real source should prefer explicit construction with
    /// [`BatteryMonitor::new`].
    pub fn shared() -> &'static BatteryMonitor {
        static SHARED: OnceLock<BatteryMonitor> = OnceLock::new();
        SHARED.get_or_init(|| {
            BatteryMonitor::new(Arc::new(SimulatedSource::default()), MonitorConfig::default())
        })
    }

    fn core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts (or restarts) monitoring. Idempotent.
    ///
    /// Every call re-baselines the detector from the source's current reading
    /// and re-arms all watch targets; the baseline itself emits nothing.
    pub fn start_monitoring(&self) {
        let baseline = self.source.current();
        let mut core = self.core();
        core.detector.rebaseline(&baseline);
        core.watchlist.rearm();
        core.monitoring = true;
        tracing::debug!(
            percentage = ?baseline.percentage.map(Percentage::get),
            state = %baseline.state,
            "monitoring started"
        );
    }

    /// Stops monitoring. Idempotent.
    ///
    /// Last-known state is frozen, not destroyed: queries keep answering with
    /// the values observed before the stop, and a later start re-baselines
    /// rather than resuming stale deltas.
    pub fn stop_monitoring(&self) {
        let mut core = self.core();
        if core.monitoring {
            core.monitoring = false;
            tracing::debug!("monitoring stopped");
        }
    }

    /// Whether readings are currently being processed.
    #[must_use]
    pub fn is_monitoring(&self) -> bool {
        self.core().monitoring
    }

    /// Feeds one reading through the engine and delivers the resulting
    /// notifications. No-op while stopped.
    ///
    /// Called by platform glue on each battery change event. Processing and
    /// delivery run under the core lock, one reading at a time.
    pub fn observe_reading(&self, reading: BatteryReading) {
        let mut guard = self.core();
        let core = &mut *guard;
        if !core.monitoring {
            tracing::trace!("reading dropped: monitor stopped");
            return;
        }

        let notifications = core.detector.observe(&reading, &mut core.watchlist);
        if notifications.is_empty() {
            return;
        }

        tracing::trace!(count = notifications.len(), "dispatching notifications");
        self.dispatch.deliver(&notifications);
    }

    /// Pulls the source's current reading and processes it.
    pub fn refresh(&self) {
        let reading = self.source.current();
        self.observe_reading(reading);
    }

    /// Last observed percentage; `None` before any reading or when unreadable.
    #[must_use]
    pub fn current_battery_percentage(&self) -> Option<Percentage> {
        self.core().detector.last_percentage()
    }

    /// Last observed charging state.
    #[must_use]
    pub fn battery_state(&self) -> ChargingState {
        self.core().detector.last_state()
    }

    /// Bucketed level of the last observed percentage.
    #[must_use]
    pub fn battery_level(&self) -> BatteryLevel {
        self.core().detector.last_level()
    }

    /// Whether the device is on external power (charging or full).
    #[must_use]
    pub fn is_plugged(&self) -> bool {
        self.battery_state().is_plugged()
    }

    /// Whether the device reports a full charging state.
    #[must_use]
    pub fn is_fully_charged(&self) -> bool {
        self.battery_state() == ChargingState::Full
    }

    /// Current suppression setting.
    #[must_use]
    pub fn report_while_charging(&self) -> bool {
        self.core().detector.report_while_charging()
    }

    /// Sets the canonical suppression flag: whether percentage-only
    /// notifications fire while charging.
    pub fn set_report_while_charging(&self, report: bool) {
        self.core().detector.set_report_while_charging(report);
    }

    /// Historical inverted-polarity alias for the same flag.
    pub fn set_report_only_on_discharging(&self, only_on_discharging: bool) {
        self.set_report_while_charging(!only_on_discharging);
    }

    /// Registers a watch target. Values outside 1..=100 are silently ignored.
    pub fn notify_for_battery_level(&self, percentage: u8) {
        self.core().watchlist.watch_raw(percentage);
    }

    /// Registers several watch targets at once.
    pub fn notify_for_battery_levels(&self, percentages: &[u8]) {
        let mut guard = self.core();
        for &value in percentages {
            guard.watchlist.watch_raw(value);
        }
    }

    /// Removes every watch target.
    pub fn clear_watch_targets(&self) {
        self.core().watchlist.clear();
    }

    /// Registers a trait observer. Delivery is synchronous, in registration
    /// order, starting with the next processed reading.
    pub fn register_observer(&self, observer: Arc<dyn BatteryObserver>) -> ObserverId {
        self.dispatch.register_observer(observer)
    }

    /// Removes an observer. Returns false if the id was not registered.
    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.dispatch.unregister_observer(id)
    }

    /// Opens a stream subscription for the given notification kinds.
    #[must_use]
    pub fn subscribe(&self, filter: KindFilter) -> MonitorStream {
        self.dispatch.subscribe(filter, self.stream_capacity)
    }

    /// Events dropped because a stream buffer was full or closed.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dispatch.dropped_events()
    }
}

impl std::fmt::Debug for BatteryMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.core();
        f.debug_struct("BatteryMonitor")
            .field("monitoring", &core.monitoring)
            .field("last_percentage", &core.detector.last_percentage())
            .field("last_level", &core.detector.last_level())
            .field("last_state", &core.detector.last_state())
            .field("watch_targets", &core.watchlist.len())
            .finish_non_exhaustive()
    }
}

//! Change detection: the engine that turns raw readings into notifications.
//!
//! The detector owns the last-observed percentage, level, and charging state.
//! Every check for a new reading runs against that stored state as it was
//! before the reading, so multiple notifications can legitimately co-fire for
//! one reading (a percentage change entering a new bucket fires both the
//! percentage and the significant-level channels). Stored state is updated
//! unconditionally before returning.

use crate::level::BatteryLevel;
use crate::reading::{BatteryReading, ChargingState, Percentage};

use super::events::Notification;
use super::watchlist::Watchlist;

/// The change-detection engine.
///
/// Suppression policy: when `report_while_charging` is false and the incoming
/// reading's state is `Charging`, the percentage-only `LevelChanged` channel
/// is skipped. The combined `LevelAndStateChanged` channel, watch hits, level
/// transitions, and state changes are never suppressed.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    last_percentage: Option<Percentage>,
    last_level: BatteryLevel,
    last_state: ChargingState,
    report_while_charging: bool,
}

impl ChangeDetector {
    /// Creates a detector with no observed reading yet.
    #[must_use]
    pub fn new(report_while_charging: bool) -> Self {
        Self {
            last_percentage: None,
            last_level: BatteryLevel::Unknown,
            last_state: ChargingState::Unknown,
            report_while_charging,
        }
    }

    /// Re-baselines stored state from a reading without emitting anything.
    ///
    /// Called on monitor start so the first processed reading reports deltas
    /// against the session baseline rather than stale state.
    pub fn rebaseline(&mut self, reading: &BatteryReading) {
        self.last_percentage = reading.percentage;
        self.last_level = BatteryLevel::classify(reading.percentage);
        self.last_state = reading.state;
    }

    /// Last observed percentage, if any.
    #[must_use]
    pub const fn last_percentage(&self) -> Option<Percentage> {
        self.last_percentage
    }

    /// Last observed level. Invariant: always the classification of
    /// [`Self::last_percentage`].
    #[must_use]
    pub const fn last_level(&self) -> BatteryLevel {
        self.last_level
    }

    /// Last observed charging state.
    #[must_use]
    pub const fn last_state(&self) -> ChargingState {
        self.last_state
    }

    /// Current suppression setting.
    #[must_use]
    pub const fn report_while_charging(&self) -> bool {
        self.report_while_charging
    }

    /// Reconfigures the suppression policy.
    pub fn set_report_while_charging(&mut self, report: bool) {
        self.report_while_charging = report;
    }

    /// Processes one reading and returns the due notifications, in order.
    ///
    /// The watchlist is consulted only when the percentage actually changed,
    /// so a session baseline equal to a watch target does not fire it.
    pub fn observe(&mut self, reading: &BatteryReading, watchlist: &mut Watchlist) -> Vec<Notification> {
        let new_level = BatteryLevel::classify(reading.percentage);
        let suppressed = !self.report_while_charging && reading.state == ChargingState::Charging;

        let mut notifications = Vec::new();

        if reading.percentage != self.last_percentage {
            if !suppressed {
                notifications.push(Notification::LevelChanged {
                    percentage: reading.percentage,
                });
            }

            // The combined channel is a distinct observation surface and is
            // evaluated independently of the suppression policy.
            notifications.push(Notification::LevelAndStateChanged {
                percentage: reading.percentage,
                state: reading.state,
            });

            if let Some(percentage) = reading.percentage {
                if watchlist.check_and_consume(percentage) {
                    notifications.push(Notification::BatteryLevelReached { percentage });
                }
            }
        }

        if new_level != self.last_level {
            notifications.push(Notification::SignificantLevelChange { level: new_level });
        }

        if reading.state != self.last_state {
            notifications.push(Notification::StateChanged { state: reading.state });
        }

        self.last_percentage = reading.percentage;
        self.last_level = new_level;
        self.last_state = reading.state;

        notifications
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(true)
    }
}

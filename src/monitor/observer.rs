//! Capability-style observer interface.
//!
//! Every callback has a default no-op body, so an implementor overrides only
//! the handlers it supports. Dispatch invokes all five entry points; the
//! unimplemented ones cost a no-op call.

use crate::level::BatteryLevel;
use crate::reading::{ChargingState, Percentage};

/// Receiver for monitor notifications.
///
/// Handlers run synchronously on the monitoring timeline, in observer
/// registration order. They must return promptly and must not call back into
/// the monitor's lifecycle or reading-intake methods; registering observers
/// or reading streams from inside a handler is safe.
pub trait BatteryObserver: Send + Sync {
    /// A watched percentage was reached (one-shot per session).
    fn battery_level_reached(&self, _percentage: Percentage) {}

    /// The bucketed level transitioned.
    fn significant_level_change(&self, _level: BatteryLevel) {}

    /// The charging state changed.
    fn battery_state_changed(&self, _state: ChargingState) {}

    /// The raw percentage changed. Subject to the charging suppression policy.
    fn battery_level_changed(&self, _percentage: Option<Percentage>) {}

    /// Combined percentage-and-state observation for the same change.
    fn battery_level_and_state_changed(&self, _percentage: Option<Percentage>, _state: ChargingState) {}
}

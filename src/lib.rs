//! # cellwatch - battery level monitoring
//!
//! cellwatch turns raw battery readings (percentage + charging state) into
//! semantic notifications: bucketed level transitions, deduplicated
//! percentage changes with a charging-aware suppression policy, one-shot
//! watch-target hits, and charging-state changes, fanned out to any number
//! of subscribers.
//!
//! ## Core Concepts
//!
//! - **Reading**: one immutable snapshot of percentage + charging state
//! - **Level**: coarse five-value bucket derived from the percentage
//! - **Watch target**: an exact percentage reported once per session
//! - **Suppression policy**: whether percentage-only notifications fire
//!   while charging
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use cellwatch::{
//!     BatteryMonitor, BatteryReading, ChargingState, KindFilter, MonitorConfig, SimulatedSource,
//! };
//!
//! let source = Arc::new(SimulatedSource::new(
//!     BatteryReading::known(57, ChargingState::Unplugged).unwrap(),
//! ));
//! let monitor = BatteryMonitor::new(source, MonitorConfig::default());
//!
//! monitor.notify_for_battery_level(50);
//! let events = monitor.subscribe(KindFilter::all());
//! monitor.start_monitoring();
//!
//! // Platform glue forwards each battery change event:
//! monitor.observe_reading(BatteryReading::known(50, ChargingState::Unplugged).unwrap());
//!
//! assert!(events.try_recv().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod level;
pub mod monitor;
pub mod reading;
pub mod source;

// Re-export primary types at crate root for convenience
pub use error::{MonitorError, MonitorResult, StreamError, ValidationError};
pub use level::BatteryLevel;
pub use monitor::{
    BatteryEvent, BatteryMonitor, BatteryObserver, ChangeDetector, KindFilter, MonitorConfig,
    MonitorStream, Notification, NotificationKind, ObserverId, SubscriptionId, Watchlist,
};
pub use reading::{BatteryReading, ChargingState, Percentage};
pub use source::{ReadingSource, SimulatedSource};

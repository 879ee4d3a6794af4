//! Monitor subsystem: change detection, watch targets, and subscriber fan-out.
//!
//! Readings flow in from platform glue via [`BatteryMonitor::observe_reading`];
//! the change detector computes the due notification set against its stored
//! state, the watchlist contributes one-shot target hits, and the dispatcher
//! delivers everything synchronously to trait observers and bounded stream
//! subscriptions.

/// Change-detection engine.
pub mod detector;
/// Observer and stream registration plus fan-out.
pub(crate) mod dispatcher;
/// Notification and event type definitions.
pub mod events;
/// Capability-style observer trait.
pub mod observer;
/// Subscriber stream handle.
pub mod stream;
/// Monitor facade and configuration.
pub mod system;
/// One-shot watch targets.
pub mod watchlist;

pub use detector::ChangeDetector;
pub use events::{
    BatteryEvent, KindFilter, Notification, NotificationKind, ObserverId, SubscriptionId,
};
pub use observer::BatteryObserver;
pub use stream::MonitorStream;
pub use system::{BatteryMonitor, MonitorConfig};
pub use watchlist::Watchlist;

//! Notification and event types for the monitor subsystem.
//!
//! These types are intentionally serializable so they can be logged,
//! bridged to an IPC surface, or asserted on in wire-format tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::level::BatteryLevel;
use crate::reading::{ChargingState, Percentage};

/// Unique identifier for a stream subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a registered trait observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverId(Uuid);

impl ObserverId {
    /// Create a new random observer id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

/// The five notification channels the monitor can fire.
///
/// Each channel is independently subscribable; an observer or stream
/// declares interest in any subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A watched percentage was reached (one-shot per session).
    BatteryLevelReached,
    /// The bucketed level changed.
    SignificantLevelChange,
    /// The charging state changed.
    StateChanged,
    /// The raw percentage changed (subject to charging suppression).
    LevelChanged,
    /// Combined percentage-and-state observation (never suppressed).
    LevelAndStateChanged,
}

impl NotificationKind {
    /// All five kinds, in dispatch order.
    pub const ALL: [NotificationKind; 5] = [
        Self::BatteryLevelReached,
        Self::SignificantLevelChange,
        Self::StateChanged,
        Self::LevelChanged,
        Self::LevelAndStateChanged,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::BatteryLevelReached => 1 << 0,
            Self::SignificantLevelChange => 1 << 1,
            Self::StateChanged => 1 << 2,
            Self::LevelChanged => 1 << 3,
            Self::LevelAndStateChanged => 1 << 4,
        }
    }
}

/// A subset of notification kinds, used to filter stream subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindFilter(u8);

impl KindFilter {
    /// Matches nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Matches every notification kind.
    #[must_use]
    pub const fn all() -> Self {
        Self(0b1_1111)
    }

    /// Matches exactly one kind.
    #[must_use]
    pub const fn only(kind: NotificationKind) -> Self {
        Self(kind.bit())
    }

    /// Adds a kind to the filter.
    #[must_use]
    pub const fn with(self, kind: NotificationKind) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Whether the filter matches the given kind.
    #[must_use]
    pub const fn contains(self, kind: NotificationKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

impl Default for KindFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// A notification computed by the change detector for one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A watched percentage was reached.
    BatteryLevelReached {
        /// The watch target that matched.
        percentage: Percentage,
    },

    /// The bucketed level transitioned.
    SignificantLevelChange {
        /// The newly entered level.
        level: BatteryLevel,
    },

    /// The charging state changed.
    StateChanged {
        /// The new charging state.
        state: ChargingState,
    },

    /// The raw percentage changed.
    LevelChanged {
        /// The new percentage, or `None` when unreadable.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        percentage: Option<Percentage>,
    },

    /// Combined percentage-and-state observation for the same change.
    LevelAndStateChanged {
        /// The new percentage, or `None` when unreadable.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        percentage: Option<Percentage>,
        /// The charging state at the time of the change.
        state: ChargingState,
    },
}

impl Notification {
    /// The channel this notification belongs to.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::BatteryLevelReached { .. } => NotificationKind::BatteryLevelReached,
            Self::SignificantLevelChange { .. } => NotificationKind::SignificantLevelChange,
            Self::StateChanged { .. } => NotificationKind::StateChanged,
            Self::LevelChanged { .. } => NotificationKind::LevelChanged,
            Self::LevelAndStateChanged { .. } => NotificationKind::LevelAndStateChanged,
        }
    }
}

/// A fired monitor event as delivered to stream subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryEvent {
    /// Unique id for this delivery.
    pub event_id: Uuid,
    /// When the monitor observed the underlying reading.
    pub observed_at: DateTime<Utc>,
    /// The notification payload.
    pub notification: Notification,
}

impl BatteryEvent {
    /// Stamps a notification with a fresh id and the current time.
    #[must_use]
    pub fn new(notification: Notification) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            observed_at: Utc::now(),
            notification,
        }
    }
}

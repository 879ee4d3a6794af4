//! Reading source seam.
//!
//! The platform battery reader is an external collaborator behind a trait.
//! The monitor pulls one snapshot at `start_monitoring` to establish its
//! baseline; subsequent change events are pushed by the platform glue via
//! [`crate::monitor::BatteryMonitor::observe_reading`].
//!
//! By using a trait, we enable:
//! - Simulated sources for tests and embedded use
//! - Platform-specific readers in the integration layer, out of crate scope

use std::sync::{PoisonError, RwLock};

use crate::reading::BatteryReading;

/// A queryable source of battery readings.
pub trait ReadingSource: Send + Sync {
    /// Snapshot of the current battery reading.
    ///
    /// Must not block for longer than a bounded platform query and must not
    /// call back into the monitor.
    fn current(&self) -> BatteryReading;
}

/// In-memory reading source for tests and host-side simulation.
///
/// Holds a single mutable snapshot. Setting a new reading does not notify
/// anything; callers drive the monitor explicitly with the readings they set.
#[derive(Debug, Default)]
pub struct SimulatedSource {
    reading: RwLock<BatteryReading>,
}

impl SimulatedSource {
    /// Creates a source seeded with the given reading.
    #[must_use]
    pub fn new(reading: BatteryReading) -> Self {
        Self {
            reading: RwLock::new(reading),
        }
    }

    /// Replaces the current snapshot.
    pub fn set(&self, reading: BatteryReading) {
        *self.reading.write().unwrap_or_else(PoisonError::into_inner) = reading;
    }
}

impl ReadingSource for SimulatedSource {
    fn current(&self) -> BatteryReading {
        *self.reading.read().unwrap_or_else(PoisonError::into_inner)
    }
}

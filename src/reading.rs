//! Battery reading model.
//!
//! A [`BatteryReading`] is one immutable snapshot of the device battery:
//! a charge percentage (or the Unknown sentinel) plus a charging state.
//! Readings are produced by a [`crate::source::ReadingSource`] and consumed
//! by the monitor; they are never mutated after capture.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated battery charge percentage in the closed range 1..=100.
///
/// The zero value is not representable: platforms report 1% as the floor
/// and an absent/unreadable charge is modeled as `Option::<Percentage>::None`
/// rather than a magic number.
///
/// # Examples
///
/// ```
/// use cellwatch::Percentage;
///
/// let p = Percentage::new(42).unwrap();
/// assert_eq!(p.get(), 42);
/// assert!(Percentage::new(0).is_err());
/// assert!(Percentage::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Lowest reportable charge.
    pub const MIN: Percentage = Percentage(1);

    /// Fully charged.
    pub const MAX: Percentage = Percentage(100);

    /// Creates a percentage from a raw value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PercentageOutOfRange` for values outside 1..=100.
    pub const fn new(value: u8) -> Result<Self, ValidationError> {
        if matches!(value, 1..=100) {
            Ok(Self(value))
        } else {
            Err(ValidationError::PercentageOutOfRange { value })
        }
    }

    /// The raw percentage value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether this is a full charge.
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.0 == 100
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.get()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Charging state as reported by the platform battery reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargingState {
    /// The platform could not determine the state.
    #[default]
    Unknown,
    /// Discharging on battery power.
    Unplugged,
    /// Plugged in and charging.
    Charging,
    /// Plugged in at 100%.
    Full,
}

impl ChargingState {
    /// Whether the device is connected to external power.
    #[must_use]
    pub const fn is_plugged(self) -> bool {
        matches!(self, Self::Charging | Self::Full)
    }
}

impl fmt::Display for ChargingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Unplugged => "unplugged",
            Self::Charging => "charging",
            Self::Full => "full",
        };
        f.write_str(s)
    }
}

/// One snapshot of battery percentage and charging state.
///
/// `percentage: None` is the Unknown sentinel for an unreadable charge; it is
/// normal data, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatteryReading {
    /// Charge percentage, if readable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Percentage>,

    /// Charging state.
    pub state: ChargingState,
}

impl BatteryReading {
    /// Creates a reading from an already-validated percentage.
    #[must_use]
    pub const fn new(percentage: Option<Percentage>, state: ChargingState) -> Self {
        Self { percentage, state }
    }

    /// Creates a reading from a raw percentage value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PercentageOutOfRange` for values outside 1..=100.
    pub const fn known(percentage: u8, state: ChargingState) -> Result<Self, ValidationError> {
        match Percentage::new(percentage) {
            Ok(p) => Ok(Self {
                percentage: Some(p),
                state,
            }),
            Err(e) => Err(e),
        }
    }

    /// A fully unknown reading: no percentage, unknown state.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            percentage: None,
            state: ChargingState::Unknown,
        }
    }
}

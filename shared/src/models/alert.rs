//! Alert levels and the per-quantity threshold tables

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Threshold tables
// ============================================================================

/// Upper bounds (inclusive) of levels 1-4 for average wind speed, km/h
pub const WIND_AVERAGE_LIMITS: [i32; 4] = [10, 14, 18, 22];

/// Upper bounds (inclusive) of levels 1-4 for maximum wind gust, km/h
pub const WIND_GUST_LIMITS: [i32; 4] = [18, 21, 27, 33];

/// Upper bounds (inclusive) of levels 1-4 for high temperature, °C
pub const HIGH_TEMPERATURE_LIMITS: [i32; 4] = [25, 28, 30, 35];

/// Lower bounds of levels 1-4 for low temperature, °C.
/// Level 1 is strictly above the first bound, the rest are inclusive.
pub const LOW_TEMPERATURE_LIMITS: [i32; 4] = [5, 2, 0, -5];

/// Exclusive upper bounds of levels 2-4 for rain and snow amounts, mm.
/// Level 1 is exactly zero.
fn precipitation_limits() -> [Decimal; 3] {
    [Decimal::new(5, 1), Decimal::ONE, Decimal::from(5)]
}

// ============================================================================
// Alert level
// ============================================================================

/// Weather risk level, ordered from safest to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AlertLevel {
    /// 1 - no risk
    Safe = 1,
    /// 2
    Caution = 2,
    /// 3
    Watch = 3,
    /// 4
    Alert = 4,
    /// 5 - cancelling the event is recommended
    Cancel = 5,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 5] = [
        AlertLevel::Safe,
        AlertLevel::Caution,
        AlertLevel::Watch,
        AlertLevel::Alert,
        AlertLevel::Cancel,
    ];

    /// Numeric level, 1 to 5
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Display label shown for an event status
    pub fn label(self) -> &'static str {
        match self {
            AlertLevel::Safe => "SEGUR",
            AlertLevel::Caution => "PRECAUCIÓ",
            AlertLevel::Watch => "VIGILANT",
            AlertLevel::Alert => "ALERTA",
            AlertLevel::Cancel => "CANCEL·LAT",
        }
    }

    /// Level from an index into a breakpoint table (0 => level 1)
    fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl TryFrom<i64> for AlertLevel {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AlertLevel::Safe),
            2 => Ok(AlertLevel::Caution),
            3 => Ok(AlertLevel::Watch),
            4 => Ok(AlertLevel::Alert),
            5 => Ok(AlertLevel::Cancel),
            other => Err(format!("alert level out of range: {other}")),
        }
    }
}

impl From<AlertLevel> for i64 {
    fn from(level: AlertLevel) -> Self {
        i64::from(level.value())
    }
}

/// Label for a raw aggregated alert value; `None` outside 1-5
pub fn status_label(value: i64) -> Option<&'static str> {
    AlertLevel::try_from(value).ok().map(AlertLevel::label)
}

// ============================================================================
// Classifiers
// ============================================================================

fn classify_ascending(value: i32, limits: &[i32; 4]) -> AlertLevel {
    let index = limits
        .iter()
        .position(|limit| value <= *limit)
        .unwrap_or(limits.len());
    AlertLevel::from_index(index)
}

fn classify_precipitation(amount: Decimal) -> AlertLevel {
    if amount.is_zero() {
        return AlertLevel::Safe;
    }
    let index = precipitation_limits()
        .iter()
        .position(|limit| amount < *limit)
        .map(|i| i + 1)
        .unwrap_or(4);
    AlertLevel::from_index(index)
}

/// Classify average wind speed (km/h)
pub fn classify_wind_average(speed_kmh: i32) -> AlertLevel {
    classify_ascending(speed_kmh, &WIND_AVERAGE_LIMITS)
}

/// Classify maximum wind gust (km/h)
pub fn classify_wind_gust(gust_kmh: i32) -> AlertLevel {
    classify_ascending(gust_kmh, &WIND_GUST_LIMITS)
}

/// Classify rain amount (mm)
pub fn classify_rain(amount_mm: Decimal) -> AlertLevel {
    classify_precipitation(amount_mm)
}

/// Classify snow amount (mm)
pub fn classify_snow(amount_mm: Decimal) -> AlertLevel {
    classify_precipitation(amount_mm)
}

/// Classify temperature against the heat table (°C).
///
/// Temperatures of 5 °C and below are level 1 here: cold is scored by
/// [`classify_low_temperature`].
pub fn classify_high_temperature(celsius: i32) -> AlertLevel {
    classify_ascending(celsius, &HIGH_TEMPERATURE_LIMITS)
}

/// Classify temperature against the cold table (°C)
pub fn classify_low_temperature(celsius: i32) -> AlertLevel {
    let [safe_above, caution_from, watch_from, alert_from] = LOW_TEMPERATURE_LIMITS;
    if celsius > safe_above {
        AlertLevel::Safe
    } else if celsius >= caution_from {
        AlertLevel::Caution
    } else if celsius >= watch_from {
        AlertLevel::Watch
    } else if celsius >= alert_from {
        AlertLevel::Alert
    } else {
        AlertLevel::Cancel
    }
}

//! Diurnal base-load curve
//!
//! Traffic intensity follows the working day: a sinusoid peaking near
//! midday, a very-low band overnight and a low-medium band in the evening.
//! Deterministic given the hour; callers add their own jitter.

use std::f64::consts::PI;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Intensity between midnight and the morning hour
const NIGHT_FACTOR: f64 = 0.2;

/// Intensity between the evening hour and midnight
const EVENING_FACTOR: f64 = 0.3;

// ============================================================================
// SHAPE
// ============================================================================

/// Boundaries of the business-hours band
#[derive(Debug, Clone, Copy)]
pub struct DiurnalShape {
    /// Hour the sinusoid starts rising (traffic before this is flat-low)
    pub morning_hour: u32,
    /// Hour the sinusoid hands over to the evening band
    pub evening_hour: u32,
}

impl Default for DiurnalShape {
    fn default() -> Self {
        Self {
            morning_hour: 6,
            evening_hour: 18,
        }
    }
}

// ============================================================================
// CURVE
// ============================================================================

/// Intensity in [0, 1] for the given hour of day (0-23).
///
/// Peak is midway between the morning and evening hours; the overnight and
/// evening bands are flat.
pub fn diurnal_base(hour_of_day: u32, shape: DiurnalShape) -> f64 {
    let hour = hour_of_day % 24;
    if hour < shape.morning_hour {
        return NIGHT_FACTOR;
    }
    if hour > shape.evening_hour {
        return EVENING_FACTOR;
    }

    let span = (shape.evening_hour - shape.morning_hour) as f64;
    let phase = (hour - shape.morning_hour) as f64 / span;
    (PI * phase).sin() * 0.5 + 0.5
}

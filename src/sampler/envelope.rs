//! Attack envelope
//!
//! Three-phase multiplier curve for a simulated attack window:
//! linear ramp-up, sustained plateau at 1.0, symmetric linear ramp-down.
//! The caller scales by intensity and overlays onto base traffic; steps
//! outside the window simply are not part of the returned sequence.

/// Multiplier sequence of `length` steps, peaking at 1.0.
///
/// `ramp_fraction` is the share of `length` spent ramping on each side,
/// clamped so the two ramps never overlap. The curve is continuous across
/// phase boundaries: the last ramp-up step reaches 1.0 and the first
/// ramp-down step leaves it.
pub fn attack_envelope(length: usize, ramp_fraction: f64) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }

    let ramp_fraction = ramp_fraction.clamp(0.0, 0.5);
    let ramp = ((length as f64 * ramp_fraction).round() as usize).min(length / 2);

    let mut curve = vec![1.0; length];
    for i in 0..ramp {
        let level = (i + 1) as f64 / ramp as f64;
        curve[i] = level;
        curve[length - 1 - i] = level;
    }
    curve
}

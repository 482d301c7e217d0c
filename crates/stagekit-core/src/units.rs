//! World unit formatting
//!
//! Stage coordinates are integers in a sub-micron world unit; axis labels
//! and logs show them divided down to a display unit.

/// World units per display unit (nanometres per millimetre).
pub const DEFAULT_DIVISOR: f64 = 1_000_000.0;

/// Significant decimal places kept when formatting a display value.
const DISPLAY_PRECISION: f64 = 1e9;

/// Format a world value in display units using the shortest representation
///
/// Trailing zeros are dropped and negative zero prints as `0`.
///
/// ```
/// use stagekit_core::units::format_world;
///
/// assert_eq!(format_world(250_000.0, 1e6), "0.25");
/// assert_eq!(format_world(-1_000_000.0, 1e6), "-1");
/// ```
pub fn format_world(value: f64, divisor: f64) -> String {
    let display = (value / divisor * DISPLAY_PRECISION).round() / DISPLAY_PRECISION;
    if display == 0.0 {
        return "0".to_string();
    }
    format!("{}", display)
}

//! Human-readable byte sizes.

/// Units used by [`format_size`], each 1024 times the previous one.
const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PT"];

/// Format a byte count for display.
///
/// Sizes below 1 KB are printed as whole bytes (`"512 B"`); larger sizes are
/// scaled by 1024 until they fit a unit and printed with two decimals
/// (`"1.50 KB"`). Anything past the last unit stays in that unit.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.2} {}", UNITS[unit])
}

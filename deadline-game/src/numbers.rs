//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a stat-sized integer to f32. Values in the stat range are exact.
#[must_use]
pub fn i32_to_f32(value: i32) -> f32 {
    cast::<i32, f32>(value).unwrap_or(0.0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Mean of `total` over `count` samples; zero samples yield 0.0.
#[must_use]
pub fn mean(total: i64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    i64_to_f64(total) / usize_to_f64(count)
}

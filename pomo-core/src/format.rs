/// Format whole seconds as "MM:SS".
///
/// Minutes are not wrapped, so a full hour reads "60:00".
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Percentage of the session still left, in `0.0..=100.0`.
///
/// A zero-length duration reports 0 instead of dividing by zero.
pub fn progress_ratio(remaining_seconds: u32, duration_seconds: u32) -> f64 {
    if duration_seconds == 0 {
        return 0.0;
    }
    (remaining_seconds as f64 / duration_seconds as f64 * 100.0).clamp(0.0, 100.0)
}

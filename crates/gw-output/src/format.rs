/// Human-readable duration: `"45s"`, `"12m"`, `"2h 5m"`.
///
/// Under a minute rounds to whole seconds, under an hour rounds to whole
/// minutes, otherwise whole hours (floored) plus rounded leftover minutes.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        return format!("{}s", secs.round() as i64);
    }
    if secs < 3_600.0 {
        return format!("{}m", (secs / 60.0).round() as i64);
    }
    let hours = (secs / 3_600.0).floor() as i64;
    let minutes = ((secs % 3_600.0) / 60.0).round() as i64;
    format!("{hours}h {minutes}m")
}

/// Renders uptime as `1h 2m 3s`, `2m 5s` or `45s`. Minutes and seconds are
/// never zero-padded. Zero or `None` gives an empty string.
pub fn format_uptime(seconds: impl Into<Option<u64>>) -> String {
    let seconds = match seconds.into() {
        Some(s) if s > 0 => s,
        _ => return String::new(),
    };

    let hours = seconds / 3600;
    let remainder = seconds % 3600;
    let minutes = remainder / 60;
    let secs = remainder % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes == 0 {
        format!("{}s", secs)
    } else {
        format!("{}m {}s", minutes, secs)
    }
}

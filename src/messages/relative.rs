/// Renders the elapsed time between `created_at` and `now` (both unix
/// seconds) the way a chat transcript shows it. Clock skew putting
/// `created_at` in the future reads as "1 second ago".
pub fn relative_time(created_at: i64, now: i64) -> String {
    let secs = (now - created_at).max(0);

    if secs < 60 {
        ago(secs.max(1), "second")
    } else if secs < 60 * 60 {
        ago(secs / 60, "minute")
    } else if secs < 60 * 60 * 24 {
        ago(secs / (60 * 60), "hour")
    } else {
        ago(secs / (60 * 60 * 24), "day")
    }
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

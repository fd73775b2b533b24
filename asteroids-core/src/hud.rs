use core::time::Duration;

pub const TIME_LABEL: &str = "Time";
pub const BEST_TIME_LABEL: &str = "Best Time";
pub const NO_RECORD: &str = "-";

/// `minutes:seconds.millis`, none of them zero-padded.
pub fn format_time(time: Duration) -> String {
    let millis = time.as_millis();
    format!(
        "{}:{}.{}",
        millis / 60_000,
        (millis / 1_000) % 60,
        millis % 1_000
    )
}

pub fn best_time_value(best: Option<Duration>) -> String {
    best.map_or_else(|| NO_RECORD.to_string(), format_time)
}

pub fn best_time_text(best: Option<Duration>) -> String {
    format!("{BEST_TIME_LABEL}: {}", best_time_value(best))
}

pub fn current_time_text(elapsed: Duration) -> String {
    format!("{TIME_LABEL}: {}", format_time(elapsed))
}

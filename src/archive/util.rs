use chrono::Local;

/// Return the current local date as `YYYY-MM-DD`.
///
/// This is the single, canonical implementation — **do not** duplicate
/// this helper in other modules.
pub fn today_iso() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current local timestamp for run-log headers, second resolution.
pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

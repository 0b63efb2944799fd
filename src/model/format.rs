//! Time and duration formatting.
//!
//! Inputs are assumed well-formed (`HH:MM`, 24-hour) by the time they reach
//! these helpers.

/// Split `HH:MM` into minutes since midnight.
///
fn minutes_of(time24: &str) -> Option<u32> {
    let (h, m) = time24.split_once(':')?;
    let h: u32 = h.trim().parse().ok()?;
    let m: u32 = m.trim().parse().ok()?;
    Some(h * 60 + m)
}

/// "14:30" → "2:30p", "09:00" → "9:00a", "00:15" → "12:15a".
///
pub fn fmt12(time24: &str) -> String {
    let total = minutes_of(time24).unwrap_or(0);
    let (h, m) = (total / 60, total % 60);
    let suffix = if h >= 12 { "p" } else { "a" };
    let h12 = if h % 12 == 0 { 12 } else { h % 12 };
    format!("{}:{:02}{}", h12, m, suffix)
}

/// Render a time range. Only a start gives the single time, both give
/// "start–end", no start gives an empty string.
///
pub fn fmt_range(start: Option<&str>, end: Option<&str>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("{}–{}", fmt12(start), fmt12(end)),
        (Some(start), None) => fmt12(start),
        (None, _) => String::new(),
    }
}

/// Minutes from start to end on the same day. None when either side is
/// missing or end is not after start.
///
pub fn dur_mins(start: Option<&str>, end: Option<&str>) -> Option<u32> {
    let start = minutes_of(start?)?;
    let end = minutes_of(end?)?;
    if end > start {
        Some(end - start)
    } else {
        None
    }
}

/// 90 → "1h30m", 60 → "1h", 45 → "45m".
///
pub fn fmt_dur(mins: u32) -> String {
    let (h, m) = (mins / 60, mins % 60);
    match (h, m) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h{}m", h, m),
    }
}

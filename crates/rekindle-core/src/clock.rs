// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timezone-aware clock and quiet-hours window containment.
//!
//! All trigger evaluation is minute-granular and runs against the wall
//! clock of a configured IANA zone. An invalid or missing zone name falls
//! back to local time; a malformed quiet-hours string never suppresses.

use chrono::{DateTime, FixedOffset, Local, NaiveTime, Utc};
use chrono_tz::Tz;

/// Current time in the given IANA zone, falling back to local time when
/// the zone name is missing or invalid.
pub fn now_in_zone(tz_name: Option<&str>) -> DateTime<FixedOffset> {
    match tz_name.and_then(|name| name.parse::<Tz>().ok()) {
        Some(tz) => Utc::now().with_timezone(&tz).fixed_offset(),
        None => Local::now().fixed_offset(),
    }
}

/// Format the current zone-aware time with a strftime pattern.
pub fn format_now(fmt: &str, tz_name: Option<&str>) -> String {
    now_in_zone(tz_name).format(fmt).to_string()
}

/// Parse an `H:MM` or `HH:MM` string into (hour, minute).
///
/// The minute part must be exactly two digits. Hours 0-23, minutes 0-59;
/// anything else yields `None`.
pub fn parse_hhmm(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.chars().chain(m.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Whether `now` falls inside a `"HH:MM-HH:MM"` quiet window.
///
/// A window whose start is at or before its end is same-day inclusive;
/// a start after the end wraps midnight (`now >= start || now <= end`).
/// Malformed input returns `false` so that bad config never suppresses
/// triggers.
pub fn in_quiet_window(now: NaiveTime, window: &str) -> bool {
    let Some((a, b)) = window.split_once('-') else {
        return false;
    };
    let (Some((h1, m1)), Some((h2, m2))) = (parse_hhmm(a), parse_hhmm(b)) else {
        return false;
    };
    // Constructed from validated components; out-of-range is unreachable.
    let Some(start) = NaiveTime::from_hms_opt(h1, m1, 0) else {
        return false;
    };
    let Some(end) = NaiveTime::from_hms_opt(h2, m2, 0) else {
        return false;
    };
    if start <= end {
        now >= start && now <= end
    } else {
        now >= start || now <= end
    }
}

use chrono::{DateTime, Duration, NaiveDate, Utc};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d %b %Y", "%d %B %Y", "%B %d, %Y", "%b %d, %Y"];

/// Parse a posting date as listing sites print it.
///
/// Relative phrases ("3 days ago", "30+ days ago", "yesterday") are resolved
/// against `now`. Returns `None` for anything unrecognised.
pub fn parse_posted_date(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(dt.with_timezone(&Utc));
    }

    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let text = strip_prefixes(&text);
    if text.is_empty() {
        return None;
    }

    match text {
        "today" | "just posted" | "just now" => return Some(now),
        "yesterday" => return now.checked_sub_signed(Duration::days(1)),
        _ => {}
    }

    if let Some(dt) = parse_relative(text, now) {
        return Some(dt);
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(text, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })
}

fn strip_prefixes(text: &str) -> &str {
    let mut text = text.trim();
    for prefix in ["employer", "active", "posted on", "posted"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.trim_start_matches(':').trim();
        }
    }
    text
}

fn parse_relative(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.last() != Some(&"ago") {
        return None;
    }

    tokens.windows(2).find_map(|pair| {
        let amount: i64 = pair[0].trim_end_matches('+').parse().ok()?;
        let unit = pair[1];
        // Out-of-range amounts yield None rather than overflow
        let delta = if unit.starts_with("min") {
            Duration::try_minutes(amount)
        } else if unit.starts_with("hour") || unit == "hr" || unit == "hrs" {
            Duration::try_hours(amount)
        } else if unit.starts_with("day") {
            Duration::try_days(amount)
        } else if unit.starts_with("week") {
            Duration::try_weeks(amount)
        } else if unit.starts_with("month") {
            amount.checked_mul(30).and_then(Duration::try_days)
        } else {
            return None;
        }?;
        now.checked_sub_signed(delta)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-06-15T12:00:00Z".parse().unwrap()
    }

    fn date(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_relative_dates() {
        assert_eq!(parse_posted_date("3 days ago", now()), Some(date("2024-06-12T12:00:00Z")));
        assert_eq!(parse_posted_date("Posted 2 hours ago", now()), Some(date("2024-06-15T10:00:00Z")));
        assert_eq!(parse_posted_date("Active 30+ days ago", now()), Some(date("2024-05-16T12:00:00Z")));
        assert_eq!(parse_posted_date("1 week ago", now()), Some(date("2024-06-08T12:00:00Z")));
        assert_eq!(parse_posted_date("45 minutes ago", now()), Some(date("2024-06-15T11:15:00Z")));
    }

    #[test]
    fn test_named_days() {
        assert_eq!(parse_posted_date("Just posted", now()), Some(now()));
        assert_eq!(parse_posted_date("Today", now()), Some(now()));
        assert_eq!(parse_posted_date("Yesterday", now()), Some(date("2024-06-14T12:00:00Z")));
    }

    #[test]
    fn test_absolute_dates() {
        let expected = Some(date("2024-01-05T00:00:00Z"));
        assert_eq!(parse_posted_date("2024-01-05", now()), expected);
        assert_eq!(parse_posted_date("05/01/2024", now()), expected);
        assert_eq!(parse_posted_date("5 Jan 2024", now()), expected);
        assert_eq!(parse_posted_date("Posted on 5 January 2024", now()), expected);
        assert_eq!(parse_posted_date("January 5, 2024", now()), expected);
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(
            parse_posted_date("2024-02-01T09:30:00+02:00", now()),
            Some(date("2024-02-01T07:30:00Z"))
        );
    }

    #[test]
    fn test_unrecognised_is_none() {
        assert_eq!(parse_posted_date("", now()), None);
        assert_eq!(parse_posted_date("soon", now()), None);
        assert_eq!(parse_posted_date("many days ago", now()), None);
        assert_eq!(parse_posted_date("3 fortnights ago", now()), None);
    }

    #[test]
    fn test_huge_amounts_are_none() {
        assert_eq!(parse_posted_date("1000000000 days ago", now()), None);
        assert_eq!(parse_posted_date("99999999999999 days ago", now()), None);
        assert_eq!(parse_posted_date("999999999999999999 months ago", now()), None);
        assert_eq!(parse_posted_date("9223372036854775807 minutes ago", now()), None);
        assert_eq!(parse_posted_date("99999999999999999 weeks ago", now()), None);
        assert_eq!(parse_posted_date("99999999999999999 hours ago", now()), None);
    }
}

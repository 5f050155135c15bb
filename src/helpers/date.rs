//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::config::SiteConfig;

/// Formats publication dates for display
///
/// Holds a chrono pattern converted from a date-fns style format, the locale
/// used for month and weekday names, and the timezone dates are shown in.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    pattern: String,
    locale: Locale,
    timezone: Tz,
}

impl DateFormatter {
    /// Create a formatter from a date-fns format, a language tag and an IANA timezone
    ///
    /// # Examples
    /// ```ignore
    /// DateFormatter::new("dd MMM yyyy", "pt-BR", "").format("2023-03-10T00:00:00Z")
    /// // -> Some("10 mar 2023")
    /// ```
    pub fn new(format: &str, language: &str, timezone: &str) -> Self {
        Self {
            pattern: to_chrono_pattern(format),
            locale: parse_locale(language),
            timezone: parse_timezone(timezone),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.date_format, &config.language, &config.timezone)
    }

    /// Format a raw publication date, `None` when it cannot be parsed
    pub fn format(&self, raw: &str) -> Option<String> {
        let date = parse_publication_date(raw)?;
        Some(
            date.with_timezone(&self.timezone)
                .format_localized(&self.pattern, self.locale)
                .to_string(),
        )
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

/// Parse a content-service timestamp
///
/// Accepts RFC 3339 (`2023-03-10T00:00:00Z`), the compact offset form the
/// service emits (`2021-03-25T19:25:28+0000`) and bare dates (`2023-03-10`).
pub fn parse_publication_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }
    if let Ok(date) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(date);
    }
    if let Ok(date) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(date);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

fn parse_locale(language: &str) -> Locale {
    let normalized = language.trim().replace('-', "_");
    match Locale::try_from(normalized.as_str()) {
        Ok(locale) => locale,
        Err(_) => {
            tracing::warn!("Unknown locale {:?}, falling back to POSIX", language);
            Locale::POSIX
        }
    }
}

fn parse_timezone(timezone: &str) -> Tz {
    let timezone = timezone.trim();
    if timezone.is_empty() {
        return Tz::UTC;
    }
    timezone.parse::<Tz>().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone {:?}, using UTC", timezone);
        Tz::UTC
    })
}

/// Convert a date-fns format string to a chrono strftime pattern
///
/// Letters are grouped into runs (`dd`, `MMM`, `yyyy`) and mapped as a
/// whole; text inside single quotes is copied literally.
fn to_chrono_pattern(format: &str) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len() * 2);
    let mut i = 0;
    let mut quoted = false;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            quoted = !quoted;
            i += 1;
            continue;
        }

        if quoted || !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&c) {
            run += 1;
        }

        let mapped = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('E', 4) => "%A",
            ('E', _) => "%a",
            ('a', _) => "%p",
            _ => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
                i += run;
                continue;
            }
        };
        out.push_str(mapped);
        i += run;
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

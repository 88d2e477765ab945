//! Helpers shared by the `gemquote` binary.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use gemquote_core::pricing::Ballpark;
use serde_json::Value;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// `YYYY-MM-DD`, defaulting to today in UTC.
pub fn parse_day(day: Option<&str>) -> anyhow::Result<NaiveDate> {
    match day {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw)),
        None => Ok(Utc::now().date_naive()),
    }
}

pub fn render_ballpark(b: &Ballpark) -> String {
    format!(
        "Materials            ${materials:.2}\n\
         Labor ({hours} h @ ${rate}/h) ${labor:.2}\n\
         Overhead (15%)       ${overhead:.2}\n\
         Total cost           ${total:.2}\n\
         Suggested retail ({brand}): ${low} – ${high}",
        materials = b.materials,
        hours = b.hours.normalize(),
        rate = b.labor_rate,
        labor = b.labor,
        overhead = b.overhead,
        total = b.total_cost,
        brand = b.brand,
        low = b.low,
        high = b.high,
    )
}

/// One line per stored record: key, email, channel, hours.
pub fn summarize_record(key: &str, record: &Value) -> String {
    let field = |name: &str| record.get(name).and_then(Value::as_str).unwrap_or("-");
    let hours = record
        .get("hours")
        .and_then(Value::as_f64)
        .map(|h| format!("{}h", h))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {}  {}  {}  {}",
        key,
        field("createdAt"),
        field("email"),
        field("channel"),
        hours
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemquote_core::models::Brand;
    use gemquote_core::pricing::ballpark;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn parse_day_accepts_iso_dates() {
        assert_eq!(
            parse_day(Some("2026-10-18")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
        assert!(parse_day(Some("18/10/2026")).is_err());
        assert!(parse_day(None).is_ok());
    }

    #[test]
    fn ballpark_rendering_shows_range() {
        let b = ballpark(Decimal::new(910, 2), Decimal::new(15, 1), Brand::Mid).unwrap();
        let out = render_ballpark(&b);
        assert!(out.contains("$9.10"));
        assert!(out.contains("1.5 h"));
        assert!(out.contains("$48 – $59"));
    }

    #[test]
    fn summary_tolerates_missing_fields() {
        let record = json!({ "email": "maker@example.com", "hours": 2.0 });
        assert_eq!(
            summarize_record("submissions/2026-10-18-a.json", &record),
            "submissions/2026-10-18-a.json  -  maker@example.com  -  2h"
        );
    }
}

//! Shared key generation for photos and submission records.

use chrono::{DateTime, Utc};
use gemquote_core::constants::{SUBMISSIONS_PREFIX, UPLOADS_PREFIX};
use uuid::Uuid;

/// Replace every run of whitespace in `filename` with a single `-`.
pub fn collapse_whitespace(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    let mut in_run = false;
    for ch in filename.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push('-');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

/// Characters object stores percent-encode inside a path segment.
const ENCODED_IN_KEYS: &[char] = &[
    '/', '\\', '{', '}', '^', '%', '`', '[', ']', '"', '<', '>', '~', '#', '|', '*', '?',
];

/// Filename as it appears in a key: whitespace runs collapse to `-`, and any
/// character a store would escape (non-ASCII, controls, [`ENCODED_IN_KEYS`])
/// becomes `-`, so the key written is byte-for-byte the key returned.
pub fn key_safe_filename(filename: &str) -> String {
    collapse_whitespace(filename)
        .chars()
        .map(|ch| {
            if !ch.is_ascii() || ch.is_ascii_control() || ENCODED_IN_KEYS.contains(&ch) {
                '-'
            } else {
                ch
            }
        })
        .collect()
}

/// `uploads/{uuid}-{filename}` for a freshly uploaded photo.
pub fn photo_key(filename: &str) -> String {
    format!(
        "{}/{}-{}",
        UPLOADS_PREFIX,
        Uuid::new_v4(),
        key_safe_filename(filename)
    )
}

/// `submissions/{YYYY-MM-DD}-{uuid}.json`, dated in UTC.
pub fn submission_key(at: DateTime<Utc>) -> String {
    format!(
        "{}/{}-{}.json",
        SUBMISSIONS_PREFIX,
        at.format("%Y-%m-%d"),
        Uuid::new_v4()
    )
}

/// Listing prefix for every record stored on a UTC day.
pub fn submissions_prefix_for(date: chrono::NaiveDate) -> String {
    format!("{}/{}", SUBMISSIONS_PREFIX, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn whitespace_runs_become_single_hyphens() {
        assert_eq!(collapse_whitespace("silver ring.jpg"), "silver-ring.jpg");
        assert_eq!(collapse_whitespace("a \t\n b.png"), "a-b.png");
        assert_eq!(collapse_whitespace(" lead.png"), "-lead.png");
        assert_eq!(collapse_whitespace("plain.png"), "plain.png");
    }

    #[test]
    fn photo_keys_are_unique_and_namespaced() {
        let a = photo_key("my ring.jpg");
        let b = photo_key("my ring.jpg");
        assert_ne!(a, b);
        assert!(a.starts_with("uploads/"));
        assert!(a.ends_with("-my-ring.jpg"));
        // uploads/ + 36-char uuid + '-'
        assert_eq!(a.len(), "uploads/".len() + 36 + 1 + "my-ring.jpg".len());
    }

    #[test]
    fn characters_stores_would_escape_become_hyphens() {
        assert_eq!(key_safe_filename("IMG [1] #2.jpg"), "IMG--1---2.jpg");
        assert_eq!(key_safe_filename("a/b\\c.png"), "a-b-c.png");
        assert_eq!(key_safe_filename("bague-été.jpg"), "bague--t-.jpg");
        assert_eq!(key_safe_filename("50%_off~{x}.png"), "50-_off--x-.png");
        assert_eq!(key_safe_filename("ring(2)_final.v1.jpg"), "ring(2)_final.v1.jpg");
    }

    #[test]
    fn submission_key_is_dated_in_utc() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 59).unwrap();
        let key = submission_key(at);
        assert!(key.starts_with("submissions/2026-10-18-"));
        assert!(key.ends_with(".json"));
        assert!(key.starts_with(&submissions_prefix_for(at.date_naive())));
    }
}

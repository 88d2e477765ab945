use serde::{Deserialize, Serialize};

/// Simulated queue position shown to the user. Display only; not tied to real volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEstimate {
    /// Position the user would take in today's queue
    pub next: u32,
    /// Display slots remaining today
    pub left: u32,
}

impl QueueEstimate {
    pub fn new(next: u32, daily_limit: u32) -> Self {
        QueueEstimate {
            next,
            left: daily_limit.saturating_sub(next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_saturates_at_zero() {
        assert_eq!(QueueEstimate::new(7, 30).left, 23);
        assert_eq!(QueueEstimate::new(13, 10).left, 0);
    }

    #[test]
    fn serializes_as_next_left_pair() {
        let json = serde_json::to_string(&QueueEstimate::new(4, 30)).unwrap();
        assert_eq!(json, r#"{"next":4,"left":26}"#);
    }
}

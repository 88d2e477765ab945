use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Where the maker plans to sell the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Etsy,
    Shopify,
    #[serde(rename = "Craft fair")]
    CraftFair,
    Instagram,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Etsy,
        Channel::Shopify,
        Channel::CraftFair,
        Channel::Instagram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Etsy => "Etsy",
            Channel::Shopify => "Shopify",
            Channel::CraftFair => "Craft fair",
            Channel::Instagram => "Instagram",
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_lowercase().as_str() {
                "craft-fair" | "craftfair" => Some(Channel::CraftFair),
                _ => None,
            })
            .ok_or_else(|| anyhow::anyhow!("Invalid channel: {}", s))
    }
}

/// Brand positioning chosen by the maker. The intake form defaults to `Mid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    Budget,
    #[default]
    Mid,
    Premium,
}

impl Brand {
    pub fn as_str(self) -> &'static str {
        match self {
            Brand::Budget => "budget",
            Brand::Mid => "mid",
            Brand::Premium => "premium",
        }
    }
}

impl Display for Brand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Brand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(Brand::Budget),
            "mid" => Ok(Brand::Mid),
            "premium" => Ok(Brand::Premium),
            _ => Err(anyhow::anyhow!("Invalid brand positioning: {}", s)),
        }
    }
}

/// Body of `POST /api/submit`.
///
/// Only `email` and `photo_url` are checked by the server. `channel` and `brand`
/// travel as plain strings so the server stays out of enum validation, and any
/// field the server does not know is kept in `extra` and stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubmissionPayload {
    /// Required fields that are absent or empty, by wire name.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.as_deref().map_or(true, str::is_empty) {
            missing.push("email");
        }
        if self.photo_url.as_deref().map_or(true, str::is_empty) {
            missing.push("photoUrl");
        }
        missing
    }
}

/// What lands in `submissions/<date>-<id>.json`: the payload plus server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(flatten)]
    pub payload: SubmissionPayload,
    #[serde(with = "iso8601_millis")]
    pub created_at: DateTime<Utc>,
    pub ip: String,
}

/// Body of a successful `POST /api/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    pub ok: bool,
    /// Storage path of the record, e.g. `submissions/2026-10-18-<id>.json`
    pub id: String,
}

/// `2026-10-18T09:41:07.123Z`, matching what browsers produce for `toISOString`.
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

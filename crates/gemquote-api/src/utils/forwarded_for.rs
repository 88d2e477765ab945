//! Client address as reported by the fronting proxy

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Raw `x-forwarded-for` value, if present and readable.
///
/// The value is stored as-is; no proxy-chain parsing happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedFor(pub Option<String>);

impl<S> FromRequestParts<S> for ForwardedFor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Ok(ForwardedFor(value))
    }
}

//! Request bodies shared across intake tests.

use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

/// A tiny but real JPEG header followed by padding up to `size` bytes.
pub fn jpeg_bytes(size: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.resize(size.max(4), 0x42);
    data
}

pub fn photo_form(filename: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(filename).mime_type("image/jpeg"),
    )
}

pub fn submission(photo_url: &str) -> Value {
    json!({
        "email": "maker@example.com",
        "photoUrl": photo_url,
        "materials": "Silver wire, beads",
        "hours": 1.5,
        "channel": "Etsy",
        "brand": "mid",
        "userAgent": "gemquote-tests/1.0"
    })
}

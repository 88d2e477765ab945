//! Intake form state and client-side checks

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use gemquote_core::models::{Brand, Channel, SubmissionPayload};
use validator::ValidateEmail;

/// A photo picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl PhotoFile {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        PhotoFile {
            filename: filename.into(),
            content_type,
            data,
        }
    }

    /// Read a photo from disk, guessing the content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();
        let content_type = guess_content_type(&filename).map(String::from);
        Ok(PhotoFile {
            filename,
            content_type,
            data,
        })
    }
}

fn guess_content_type(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// Why the submit action is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocker {
    MissingPhoto,
    MissingEmail,
    InvalidEmail,
    MissingChannel,
    InvalidHours,
}

impl Display for SubmitBlocker {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let message = match self {
            SubmitBlocker::MissingPhoto => "choose a photo",
            SubmitBlocker::MissingEmail => "enter your email",
            SubmitBlocker::InvalidEmail => "enter a valid email address",
            SubmitBlocker::MissingChannel => "choose where you plan to sell",
            SubmitBlocker::InvalidHours => "hours must be a non-negative number",
        };
        f.write_str(message)
    }
}

/// What the maker has entered so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeForm {
    pub photo: Option<PhotoFile>,
    pub email: String,
    pub channel: Option<Channel>,
    /// Free text, e.g. "20ga copper wire, 4mm glass beads"
    pub materials: String,
    pub hours: Option<f64>,
    pub brand: Brand,
}

impl IntakeForm {
    /// The first rule the form still breaks, if any.
    pub fn blocker(&self) -> Option<SubmitBlocker> {
        let email = self.email.trim();
        if self.photo.is_none() {
            Some(SubmitBlocker::MissingPhoto)
        } else if email.is_empty() {
            Some(SubmitBlocker::MissingEmail)
        } else if !email.validate_email() {
            Some(SubmitBlocker::InvalidEmail)
        } else if self.channel.is_none() {
            Some(SubmitBlocker::MissingChannel)
        } else if self
            .hours
            .is_some_and(|h| !h.is_finite() || (h.is_sign_negative() && h != 0.0))
        {
            Some(SubmitBlocker::InvalidHours)
        } else {
            None
        }
    }

    /// Phase-2 body for a photo already uploaded to `photo_url`.
    /// Blank optional fields are left out rather than sent empty.
    pub fn to_payload(&self, photo_url: &str, user_agent: Option<&str>) -> SubmissionPayload {
        let materials = self.materials.trim();
        SubmissionPayload {
            email: Some(self.email.trim().to_string()),
            photo_url: Some(photo_url.to_string()),
            materials: (!materials.is_empty()).then(|| materials.to_string()),
            hours: self.hours,
            channel: self.channel.map(|c| c.as_str().to_string()),
            brand: Some(self.brand.as_str().to_string()),
            user_agent: user_agent.map(String::from),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> IntakeForm {
        IntakeForm {
            photo: Some(PhotoFile::new("ring.jpg", None, vec![1, 2, 3])),
            email: "maker@example.com".to_string(),
            channel: Some(Channel::CraftFair),
            ..Default::default()
        }
    }

    #[test]
    fn blockers_in_field_order() {
        assert_eq!(IntakeForm::default().blocker(), Some(SubmitBlocker::MissingPhoto));

        let mut form = complete();
        form.email = "  ".to_string();
        assert_eq!(form.blocker(), Some(SubmitBlocker::MissingEmail));

        form.email = "not-an-email".to_string();
        assert_eq!(form.blocker(), Some(SubmitBlocker::InvalidEmail));

        let mut form = complete();
        form.channel = None;
        assert_eq!(form.blocker(), Some(SubmitBlocker::MissingChannel));

        let mut form = complete();
        form.hours = Some(-0.25);
        assert_eq!(form.blocker(), Some(SubmitBlocker::InvalidHours));
        form.hours = Some(f64::NAN);
        assert_eq!(form.blocker(), Some(SubmitBlocker::InvalidHours));

        form.hours = Some(0.0);
        assert_eq!(form.blocker(), None);
    }

    #[test]
    fn payload_omits_blank_optionals() {
        let payload = complete().to_payload("https://blobs.example/uploads/x-ring.jpg", None);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["channel"], "Craft fair");
        assert_eq!(value["brand"], "mid");
        assert!(value.get("materials").is_none());
        assert!(value.get("hours").is_none());
        assert!(value.get("userAgent").is_none());
    }

    #[test]
    fn content_type_guessed_from_extension() {
        assert_eq!(guess_content_type("ring.JPG"), Some("image/jpeg"));
        assert_eq!(guess_content_type("ring.png"), Some("image/png"));
        assert_eq!(guess_content_type("notes.txt"), None);
        assert_eq!(guess_content_type("no-extension"), None);
    }
}

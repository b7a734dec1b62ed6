use std::path::Path;

use crate::{consts, front::errors::FieldError, models::photo::MediaKind};

/// File picked for upload to a bird's gallery.
#[derive(Debug, Default, Clone)]
pub struct PhotoUpload {
    pub filename: String,
    pub body: Vec<u8>,
}

impl PhotoUpload {
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    pub fn kind(&self) -> Option<MediaKind> {
        let ext = self.extension()?;
        if consts::ACCEPTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Some(MediaKind::Image);
        }
        if consts::ACCEPTED_VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            return Some(MediaKind::Video);
        }
        None
    }

    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("heic") => "image/heic",
            Some("webp") => "image/webp",
            Some("mp4") => "video/mp4",
            Some("mov") => "video/quicktime",
            Some("webm") => "video/webm",
            _ => "application/octet-stream",
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = vec![];

        let max_size = match self.kind() {
            Some(MediaKind::Image) => consts::PHOTO_MAX_SIZE_BYTES,
            Some(MediaKind::Video) => consts::VIDEO_MAX_SIZE_BYTES,
            None => {
                errors.push(FieldError::new("filename", "unsupported file type"));
                return errors;
            }
        };

        if self.body.is_empty() {
            errors.push(FieldError::new("body", "file is empty"));
        } else if self.body.len() > max_size {
            errors.push(FieldError::new(
                "body",
                format!("file is larger than {max_size} bytes"),
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        let upload = PhotoUpload {
            filename: "kiwi.JPG".into(),
            body: vec![1],
        };
        assert_eq!(upload.kind(), Some(MediaKind::Image));
        assert_eq!(upload.mime_type(), "image/jpeg");
        assert!(upload.validate().is_empty());

        let upload = PhotoUpload {
            filename: "dance.mov".into(),
            body: vec![1],
        };
        assert_eq!(upload.kind(), Some(MediaKind::Video));
    }

    #[test]
    fn test_rejects_unknown_and_oversized_files() {
        let upload = PhotoUpload {
            filename: "notes.pdf".into(),
            body: vec![1],
        };
        assert_eq!(upload.validate()[0].field, "filename");

        let upload = PhotoUpload {
            filename: "big.png".into(),
            body: vec![0; consts::PHOTO_MAX_SIZE_BYTES + 1],
        };
        assert_eq!(upload.validate()[0].field, "body");

        let upload = PhotoUpload {
            filename: "empty.png".into(),
            body: vec![],
        };
        assert_eq!(upload.validate()[0].field, "body");
    }
}

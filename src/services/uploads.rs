//! Local-disk storage for résumés and admin images.
//!
//! A file is accepted only when its extension is allowed and the MIME type
//! sniffed from its bytes matches that extension.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;

use crate::error::{AppError, Result};

/// What an upload endpoint accepts.
#[derive(Debug)]
pub struct UploadPolicy {
    /// Subdirectory of the upload root, also the URL segment.
    pub folder: &'static str,
    pub max_bytes: usize,
    /// Allowed extensions and the sniffed MIME type each must carry.
    pub allowed: &'static [(&'static str, &'static str)],
    /// Shown when the type is rejected.
    pub description: &'static str,
}

pub const RESUME: UploadPolicy = UploadPolicy {
    folder: "resumes",
    max_bytes: 10 * 1024 * 1024,
    allowed: &[
        ("pdf", "application/pdf"),
        ("doc", "application/msword"),
        (
            "docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
    ],
    description: "Only PDF and Word documents are allowed",
};

pub const IMAGE: UploadPolicy = UploadPolicy {
    folder: "images",
    max_bytes: 5 * 1024 * 1024,
    allowed: &[
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("png", "image/png"),
        ("webp", "image/webp"),
        ("gif", "image/gif"),
    ],
    description: "Only JPEG, PNG, WebP and GIF images are allowed",
};

/// A stored upload.
#[derive(Debug, Clone, Serialize)]
pub struct StoredUpload {
    /// Public path under `/uploads`.
    pub url: String,
    pub size: usize,
    pub content_type: &'static str,
}

impl UploadPolicy {
    /// Checks size, extension and content. Returns the normalized extension
    /// and the MIME type.
    pub fn check(&self, filename: &str, bytes: &[u8]) -> Result<(String, &'static str)> {
        if bytes.is_empty() {
            return Err(AppError::Validation("No file provided".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::Validation(format!(
                "File size must be less than {}MB",
                self.max_bytes / (1024 * 1024)
            )));
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| AppError::Validation(self.description.to_string()))?;

        let (_, expected) = self
            .allowed
            .iter()
            .find(|(ext, _)| *ext == extension)
            .ok_or_else(|| AppError::Validation(self.description.to_string()))?;

        let sniffed = infer::get(bytes).map(|t| t.mime_type());
        if sniffed != Some(*expected) {
            tracing::warn!(
                "❌ Upload rejected: .{} file sniffed as {:?}",
                extension,
                sniffed
            );
            return Err(AppError::Validation(
                "File content does not match its extension".to_string(),
            ));
        }

        Ok((extension, *expected))
    }

    /// Validates and writes the file under `root/{folder}`.
    pub async fn store(&self, root: &Path, filename: &str, bytes: &[u8]) -> Result<StoredUpload> {
        let (extension, content_type) = self.check(filename, bytes)?;

        let mut suffix = [0u8; 6];
        OsRng
            .try_fill_bytes(&mut suffix)
            .map_err(|e| AppError::Internal(format!("Failed to generate file name: {}", e)))?;
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let name = format!("{}-{}.{}", millis, hex::encode(suffix), extension);

        let dir = root.join(self.folder);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), bytes).await?;

        tracing::info!("📎 Stored {} upload: {} ({} bytes)", self.folder, name, bytes.len());

        Ok(StoredUpload {
            url: format!("/uploads/{}/{}", self.folder, name),
            size: bytes.len(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF";
    const PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    #[test]
    fn accepts_matching_extension_and_content() {
        let (ext, mime) = RESUME.check("Resume.PDF", PDF).unwrap();
        assert_eq!(ext, "pdf");
        assert_eq!(mime, "application/pdf");
        assert!(IMAGE.check("hero.png", PNG).is_ok());
    }

    #[test]
    fn rejects_renamed_files() {
        assert!(RESUME.check("resume.pdf", PNG).is_err());
        assert!(IMAGE.check("photo.jpg", PNG).is_err());
        assert!(RESUME.check("notes.txt", b"plain text").is_err());
    }

    #[test]
    fn rejects_disallowed_and_missing_extensions() {
        assert!(RESUME.check("resume", PDF).is_err());
        assert!(IMAGE.check("resume.pdf", PDF).is_err());
    }

    #[test]
    fn enforces_size_limits() {
        let mut big = PNG.to_vec();
        big.resize(IMAGE.max_bytes + 1, 0);
        assert!(IMAGE.check("big.png", &big).is_err());
        assert!(RESUME.check("empty.pdf", &[]).is_err());
    }

    #[tokio::test]
    async fn stores_under_the_policy_folder() {
        let root = std::env::temp_dir().join(format!("medcode-uploads-{}", uuid::Uuid::new_v4()));
        let stored = RESUME.store(&root, "cv.pdf", PDF).await.unwrap();

        assert!(stored.url.starts_with("/uploads/resumes/"));
        assert!(stored.url.ends_with(".pdf"));
        let name = stored.url.trim_start_matches("/uploads/resumes/");
        let written = tokio::fs::read(root.join("resumes").join(name)).await.unwrap();
        assert_eq!(written, PDF);

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}

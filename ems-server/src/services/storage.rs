//! Local file storage for uploads
//!
//! Profile pictures and employee documents live on disk under
//! `work_dir/uploads/`. Files are content-addressed: the stored name is a
//! prefix of the SHA-256 of the bytes, so re-uploading the same file is a
//! no-op and a record pointing at a file never dangles after a re-upload.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};
use shared::{AppError, AppResult};

/// Maximum profile picture size (5MB)
const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum document size (10MB)
const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// Accepted profile picture formats
const IMAGE_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Accepted document formats
const DOCUMENT_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "pdf", "doc", "docx"];

/// JPEG quality for re-encoded profile pictures
const JPEG_QUALITY: u8 = 85;

/// Length of the hash prefix used as the stored file name
const HASH_NAME_LEN: usize = 16;

pub const PICTURES_DIR: &str = "profile-pictures";
pub const DOCUMENTS_DIR: &str = "documents";

/// A stored upload, ready to be referenced from an employee record
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    /// Serving path, e.g. `/uploads/documents/ab12cd34ef56ab78.pdf`
    pub url: String,
    pub mime: String,
}

#[derive(Clone)]
pub struct FileStorage {
    uploads_dir: PathBuf,
}

impl FileStorage {
    /// Create the uploads directory tree under the work directory
    pub fn new(work_dir: &Path) -> AppResult<Self> {
        let uploads_dir = work_dir.join("uploads");
        for sub in [PICTURES_DIR, DOCUMENTS_DIR] {
            fs::create_dir_all(uploads_dir.join(sub)).map_err(|e| {
                AppError::internal(format!("Failed to create uploads directory: {}", e))
            })?;
        }
        Ok(Self { uploads_dir })
    }

    /// Validate, re-encode and store a profile picture. All pictures are
    /// normalized to JPEG regardless of the uploaded format.
    pub fn store_profile_picture(&self, data: &[u8], original_name: &str) -> AppResult<StoredFile> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }
        if data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {}MB",
                MAX_IMAGE_SIZE / 1024 / 1024
            )));
        }

        let ext = file_extension(original_name)?;
        if !IMAGE_FORMATS.contains(&ext.as_str()) {
            return Err(AppError::validation(format!(
                "Unsupported image format '{}'. Supported: {}",
                ext,
                IMAGE_FORMATS.join(", ")
            )));
        }

        let img = image::load_from_memory(data)
            .map_err(|e| AppError::validation(format!("Invalid image file: {}", e)))?;

        let mut encoded = Vec::new();
        {
            let mut cursor = Cursor::new(&mut encoded);
            let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
            img.to_rgb8()
                .write_with_encoder(encoder)
                .map_err(|e| AppError::internal(format!("Failed to encode image: {}", e)))?;
        }

        let file_name = format!("{}.jpg", content_hash(&encoded));
        self.write_if_absent(PICTURES_DIR, &file_name, &encoded)?;

        Ok(StoredFile {
            url: format!("/uploads/{}/{}", PICTURES_DIR, file_name),
            mime: "image/jpeg".to_string(),
            file_name,
        })
    }

    /// Validate and store an employee document as-is
    pub fn store_document(&self, data: &[u8], original_name: &str) -> AppResult<StoredFile> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }
        if data.len() > MAX_DOCUMENT_SIZE {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {}MB",
                MAX_DOCUMENT_SIZE / 1024 / 1024
            )));
        }

        let ext = file_extension(original_name)?;
        if !DOCUMENT_FORMATS.contains(&ext.as_str()) {
            return Err(AppError::validation(format!(
                "Unsupported document format '{}'. Supported: {}",
                ext,
                DOCUMENT_FORMATS.join(", ")
            )));
        }

        let file_name = format!("{}.{}", content_hash(data), ext);
        self.write_if_absent(DOCUMENTS_DIR, &file_name, data)?;

        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();

        Ok(StoredFile {
            url: format!("/uploads/{}/{}", DOCUMENTS_DIR, file_name),
            mime,
            file_name,
        })
    }

    /// Resolve a serving request to a path inside the uploads tree.
    /// Rejects anything that is not a plain file name in a known category.
    pub fn resolve(&self, category: &str, filename: &str) -> Option<PathBuf> {
        if category != PICTURES_DIR && category != DOCUMENTS_DIR {
            return None;
        }
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return None;
        }
        Some(self.uploads_dir.join(category).join(filename))
    }

    fn write_if_absent(&self, category: &str, file_name: &str, data: &[u8]) -> AppResult<()> {
        let path = self.uploads_dir.join(category).join(file_name);
        if path.exists() {
            tracing::debug!(file = file_name, "Upload already stored, reusing");
            return Ok(());
        }
        fs::write(&path, data)
            .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))
    }
}

fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    digest[..HASH_NAME_LEN].to_string()
}

fn file_extension(name: &str) -> AppResult<String> {
    PathBuf::from(name)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_lowercase()))
        .ok_or_else(|| AppError::validation(format!("Invalid file extension for: {}", name)))
}

use chrono::Utc;
use rand::RngCore;
use rand::rngs::OsRng;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{
    config::Config,
    error::{AppError, Result},
};

/// The number of random bytes in a generated file name.
const NAME_RANDOM_BYTES: usize = 8;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
const DOCUMENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp", "application/pdf"];

/// What an upload is for; decides the directory and the accepted MIME types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// No `type` given: images in the uploads root.
    Legacy,
    Blogs,
    Events,
    Research,
    Resources,
}

impl FromStr for UploadKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(UploadKind::Legacy),
            "blogs" => Ok(UploadKind::Blogs),
            "events" => Ok(UploadKind::Events),
            "research" => Ok(UploadKind::Research),
            "resources" => Ok(UploadKind::Resources),
            other => Err(AppError::Validation(format!("Invalid upload type: {}", other))),
        }
    }
}

impl UploadKind {
    /// The subdirectory under the uploads root, if any.
    pub fn directory(self) -> Option<&'static str> {
        match self {
            UploadKind::Legacy => None,
            UploadKind::Blogs => Some("blogs"),
            UploadKind::Events => Some("events"),
            UploadKind::Research => Some("research"),
            UploadKind::Resources => Some("resources"),
        }
    }

    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            UploadKind::Legacy | UploadKind::Blogs | UploadKind::Events => IMAGE_TYPES,
            UploadKind::Research | UploadKind::Resources => DOCUMENT_TYPES,
        }
    }
}

/// Normalizes the aliases browsers send for the same type.
fn normalize_mime(mime: &str) -> String {
    let mime = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        _ => mime,
    }
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

/// Checks the declared type against the kind and the sniffed content.
///
/// # Returns
///
/// The normalized MIME type.
pub fn check_file(kind: UploadKind, declared: Option<&str>, data: &[u8], max_bytes: usize) -> Result<String> {
    if data.is_empty() {
        return Err(AppError::Validation("No file uploaded".to_string()));
    }

    if data.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size is {} MB",
            max_bytes / (1024 * 1024)
        )));
    }

    let declared = declared
        .map(normalize_mime)
        .ok_or_else(|| AppError::Validation("Missing file content type".to_string()))?;

    if !kind.allowed_types().contains(&declared.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid file type: {}. Allowed types: {}",
            declared,
            kind.allowed_types().join(", ")
        )));
    }

    match infer::get(data) {
        Some(sniffed) if normalize_mime(sniffed.mime_type()) == declared => Ok(declared),
        Some(sniffed) => {
            tracing::warn!(
                "❌ Upload declared {} but content looks like {}",
                declared,
                sniffed.mime_type()
            );
            Err(AppError::Validation(
                "File content does not match its declared type".to_string(),
            ))
        }
        None => Err(AppError::Validation("Unrecognized file content".to_string())),
    }
}

/// A stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Where the file landed on disk.
    pub path: PathBuf,
    /// The site-relative URL it is served from.
    pub url: String,
}

/// Generates `<millis>-<random hex>.<ext>`.
fn generate_file_name(mime: &str) -> String {
    let mut random = [0u8; NAME_RANDOM_BYTES];
    OsRng.fill_bytes(&mut random);

    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        hex::encode(random),
        extension_for(mime)
    )
}

/// Writes an upload below the configured directory.
///
/// # Arguments
///
/// * `config` - The application's configuration.
/// * `kind` - The kind of upload.
/// * `mime` - The checked MIME type.
/// * `data` - The file contents.
///
/// # Returns
///
/// A `Result` containing the `StoredUpload`.
pub async fn store(config: &Config, kind: UploadKind, mime: &str, data: &[u8]) -> Result<StoredUpload> {
    let mut dir = config.upload_dir.clone();
    let mut url = String::from("/uploads");
    if let Some(sub) = kind.directory() {
        dir.push(sub);
        url.push('/');
        url.push_str(sub);
    }

    tokio::fs::create_dir_all(&dir).await?;

    let file_name = generate_file_name(mime);
    let path = dir.join(&file_name);
    tokio::fs::write(&path, data).await?;

    url.push('/');
    url.push_str(&file_name);

    tracing::info!("✅ Upload stored: {} ({} bytes)", path.display(), data.len());
    Ok(StoredUpload { path, url })
}

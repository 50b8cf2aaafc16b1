//! Storage for images submitted inline as base64 data URLs.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Decoded image payload, ready to be written to disk.
#[derive(Debug)]
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Accepts `data:image/<type>;base64,<payload>` or a bare base64 payload (assumed PNG).
pub fn decode_data_url(data: &str) -> AppResult<DecodedImage> {
    let (extension, payload) = match data.split_once(',') {
        Some((header, payload)) => {
            let mime = header
                .strip_prefix("data:")
                .and_then(|rest| rest.strip_suffix(";base64"))
                .ok_or_else(|| AppError::bad_request("image must be a base64 data URL"))?;
            (extension_for(mime)?, payload)
        }
        None => ("png", data),
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::bad_request(format!("image is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(AppError::bad_request("image is empty"));
    }

    Ok(DecodedImage { extension, bytes })
}

fn extension_for(mime: &str) -> AppResult<&'static str> {
    match mime {
        "image/png" => Ok("png"),
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        other => Err(AppError::bad_request(format!(
            "unsupported image type {other}"
        ))),
    }
}

/// Decode and store the image under `<root>/<dir>/`, returning the path relative to `root`.
pub async fn save_image(root: &str, dir: &str, data: &str) -> AppResult<String> {
    let image = decode_data_url(data)?;
    let relative = format!("{dir}/{}.{}", Uuid::new_v4(), image.extension);
    let target = Path::new(root).join(&relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    }
    fs::write(&target, &image.bytes)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(relative)
}

/// Remove a previously stored file. Missing files are not an error.
pub async fn remove_image(root: &str, relative: &str) {
    let target = Path::new(root).join(relative);
    if let Err(err) = fs::remove_file(&target).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(error = %err, path = %target.display(), "failed to remove media file");
        }
    }
}

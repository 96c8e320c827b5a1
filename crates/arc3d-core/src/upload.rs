//! Checks applied to user-supplied 3D models before they reach the canvas.

use thiserror::Error;

/// Largest accepted model file.
pub const MAX_MODEL_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Accepted model container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Binary glTF.
    Glb,
    /// JSON glTF.
    Gltf,
}

impl ModelFormat {
    /// Detect the format from a file name's extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "glb" => Some(ModelFormat::Glb),
            "gltf" => Some(ModelFormat::Gltf),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ModelFormat::Glb => "model/gltf-binary",
            ModelFormat::Gltf => "model/gltf+json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Unsupported model format: {0} (expected .glb or .gltf)")]
    UnsupportedFormat(String),
    #[error("Model file is empty")]
    Empty,
    #[error("Model file is {size} bytes, the limit is {max} bytes")]
    TooLarge { size: u64, max: u64 },
}

/// Validate a model upload by name and size.
pub fn validate_model_upload(file_name: &str, size: u64) -> Result<ModelFormat, UploadError> {
    let format = ModelFormat::from_file_name(file_name)
        .ok_or_else(|| UploadError::UnsupportedFormat(file_name.to_string()))?;
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if size > MAX_MODEL_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size,
            max: MAX_MODEL_UPLOAD_BYTES,
        });
    }
    Ok(format)
}

//! Asset and payload size limits for the editor

use crate::consts::MAX_UPLOAD_BYTES;
use crate::error::ContentError;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Encoded content above this slows the first paint noticeably
pub const PAYLOAD_WARNING_BYTES: u64 = 3 * MIB / 2;
/// Encoded content above this risks the store's document limit
pub const PAYLOAD_DANGER_BYTES: u64 = 3 * MIB;

/// Reject an image before it is encoded
pub fn check_upload(size: u64) -> Result<(), ContentError> {
    if size > MAX_UPLOAD_BYTES {
        log::warn!("Rejected {} byte upload", size);
        return Err(ContentError::AssetTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStatus {
    Ok,
    Warning,
    Danger,
}

impl PayloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadStatus::Ok => "ok",
            PayloadStatus::Warning => "warning",
            PayloadStatus::Danger => "danger",
        }
    }
}

pub fn classify_payload(bytes: u64) -> PayloadStatus {
    if bytes > PAYLOAD_DANGER_BYTES {
        PayloadStatus::Danger
    } else if bytes > PAYLOAD_WARNING_BYTES {
        PayloadStatus::Warning
    } else {
        PayloadStatus::Ok
    }
}

/// "512.0 KB" below one MiB, "1.50 MB" above
pub fn format_size(bytes: u64) -> String {
    if bytes > MIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    }
}

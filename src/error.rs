//! Error types
//!
//! Every failure here is recoverable: callers degrade to defaults or a
//! fallback view, the page never stops scrolling.

use thiserror::Error;

pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Invalid section stack composition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("section stack is empty")]
    Empty,
    #[error("section stack has no terminal section")]
    MissingTerminal,
    #[error("terminal section {label:?} must be last (found at position {position} of {count})")]
    TerminalNotLast {
        label: String,
        position: usize,
        count: usize,
    },
}

/// Intersection gate registry misuse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("gate handle {0} is not mounted")]
    NotMounted(u64),
}

/// Content store and asset failures
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content store unreachable: {0}")]
    Unreachable(String),
    #[error("cached snapshot is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("image is too large ({size} bytes, limit {limit} bytes); compress it before uploading")]
    AssetTooLarge { size: u64, limit: u64 },
    #[error("snapshot cache unavailable: {0}")]
    Storage(String),
}

impl ContentError {
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Admin unlock failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("incorrect admin secret")]
    WrongSecret,
    #[error("no admin secret configured and unprotected mode is not enabled")]
    Locked,
}

/// Crate-wide error
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("gate error: {0}")]
    Gate(#[from] GateError),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("admin error: {0}")]
    Admin(#[from] AdminError),
    #[error("render error: {0}")]
    Render(String),
}

impl PortfolioError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_are_stable() {
        let err: PortfolioError = LayoutError::Empty.into();
        assert!(err.to_string().starts_with("layout error:"));
        let err: PortfolioError = GateError::NotMounted(7).into();
        assert!(err.to_string().contains("7"));
        let err: PortfolioError = AdminError::WrongSecret.into();
        assert!(err.to_string().starts_with("admin error:"));
        assert!(PortfolioError::render("x").to_string().starts_with("render error:"));
    }

    #[test]
    fn test_malformed_preserves_source() {
        let parse = serde_json::from_str::<u32>("{").unwrap_err();
        let err = ContentError::from(parse);
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_asset_too_large_message_mentions_limit() {
        let err = ContentError::AssetTooLarge {
            size: 3_000_000,
            limit: 2_097_152,
        };
        assert!(err.to_string().contains("2097152"));
    }
}

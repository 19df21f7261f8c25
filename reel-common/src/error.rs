//! Request-facing error type shared by the gateway and CLI.

use thiserror::Error;

/// Failures that map onto an HTTP status and a stable `code` string.
#[derive(Error, Debug)]
pub enum Error {
    /// The script or mode in the request is unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The script is longer than the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Every scoring engine failed, including the rule fallback.
    #[error("Scoring failed: {0}")]
    Scoring(String),
}

impl Error {
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::Scoring(_) => 500,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::Scoring(_) => "SCORING_FAILED",
        }
    }

    /// The bare message, without the variant prefix `Display` adds.
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidInput(msg) | Self::PayloadTooLarge(msg) | Self::Scoring(msg) => {
                msg.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(Error::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(Error::PayloadTooLarge("x".into()).status_code(), 413);
        assert_eq!(Error::Scoring("x".into()).status_code(), 500);
        assert_eq!(Error::Scoring("x".into()).code(), "SCORING_FAILED");
    }

    #[test]
    fn detail_has_no_prefix() {
        let err = Error::InvalidInput("文本内容不能为空".into());
        assert_eq!(err.detail(), "文本内容不能为空");
        assert_eq!(err.to_string(), "Invalid input: 文本内容不能为空");
    }
}

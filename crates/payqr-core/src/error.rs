use std::fmt::{self, Display};

use thiserror::Error;

/// Stable codes for request validation failures (1xxx range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    MissingRecipient = 1001,
    EmptyFunctionName = 1002,
    NegativeAmount = 1003,
    ArgsWithoutProgram = 1004,
}

impl ValidationCode {
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::MissingRecipient => "MISSING_RECIPIENT",
            Self::EmptyFunctionName => "EMPTY_FUNCTION_NAME",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ArgsWithoutProgram => "ARGS_WITHOUT_PROGRAM",
        }
    }
}

impl Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Stable codes for QR rendering failures (5xxx range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderCode {
    DataTooLong = 5001,
    QrEncoding = 5002,
    PngEncoding = 5003,
    Worker = 5004,
}

impl RenderCode {
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::DataTooLong => "PAYLOAD_TOO_LARGE",
            Self::QrEncoding => "QR_ENCODING_FAILED",
            Self::PngEncoding => "PNG_ENCODING_FAILED",
            Self::Worker => "RENDER_WORKER_FAILED",
        }
    }
}

impl Display for RenderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Error)]
pub enum PayQrError {
    #[error("validation error [{code}]: {message}")]
    Validation {
        code: ValidationCode,
        message: String,
    },

    #[error("render error [{code}]: {message}")]
    Render { code: RenderCode, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PayQrError {
    pub fn validation(code: ValidationCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn render(code: RenderCode, message: impl Into<String>) -> Self {
        Self::Render {
            code,
            message: message.into(),
        }
    }

    /// Numeric taxonomy code, `None` for pass-through I/O and JSON errors.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Validation { code, .. } => Some(code.code()),
            Self::Render { code, .. } => Some(code.code()),
            Self::Io(_) | Self::Json(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PayQrError>;

#[cfg(test)]
mod tests {
    use super::{PayQrError, RenderCode, ValidationCode};

    #[test]
    fn display_includes_numeric_code() {
        let err = PayQrError::validation(ValidationCode::MissingRecipient, "`to` is empty");
        assert_eq!(err.to_string(), "validation error [1001]: `to` is empty");

        let err = PayQrError::render(RenderCode::DataTooLong, "too long");
        assert_eq!(err.to_string(), "render error [5001]: too long");
    }

    #[test]
    fn code_is_none_for_pass_through_errors() {
        let err = PayQrError::Io(std::io::Error::other("disk"));
        assert_eq!(err.code(), None);
        let err = PayQrError::render(RenderCode::Worker, "join");
        assert_eq!(err.code(), Some(5004));
    }
}

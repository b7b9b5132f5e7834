//! Error types for each stage of the pipeline.

use std::path::PathBuf;

use crate::record::RequiredField;

/// The form could not be turned into a contact record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("missing required field: {field}")]
    MissingRequiredField { field: RequiredField },
}

impl RecordError {
    /// The single message shown to the user, naming every required field.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } => {
                "Please fill in all required fields: Person Name, Company Name, Phone No, and Email"
            }
        }
    }
}

/// The QR code could not be produced (or, when decoding, read back).
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to encode QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("failed to write raster image: {0}")]
    Image(#[from] image::ImageError),

    #[error("raster encoding task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("no QR code found in image")]
    NotFound,

    #[error("failed to decode QR code: {message}")]
    Decode { message: String },
}

/// The uploaded logo could not be read or decoded.
#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("not a base64 image data URI")]
    NotDataUri,

    #[error("invalid base64 in data URI: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to read logo file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The document could not be finished or handed over for delivery.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialize PDF: {message}")]
    Serialize { message: String },

    #[error("failed to deliver {filename}: {source}")]
    Delivery {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn serialize(msg: impl ToString) -> Self {
        Self::Serialize {
            message: msg.to_string(),
        }
    }

    /// Plain-language message for the user.
    pub fn user_message(&self) -> &'static str {
        "There was an error generating the PDF. Please try again."
    }
}

/// An event arrived in a phase that does not accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no QR code has been generated yet")]
    NotGenerated,
}

/// Any failure of a session action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// The configuration file is unreadable or holds invalid values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid {
            message: msg.into(),
        }
    }
}

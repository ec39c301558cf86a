use thiserror::Error;

/// RFC parsing and validation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    ConversionError(#[from] crate::rfc::ical::expand::ConversionError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;

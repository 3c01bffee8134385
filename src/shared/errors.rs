//! Error handling for the application

use thiserror::Error;

/// Intent-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntentError {
    #[error("From and to token must differ: {0}")]
    SameTokenPair(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Invalid slippage: {0}%")]
    InvalidSlippage(f64),
}

/// Registry-related errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Price unavailable for token: {0}")]
    PriceUnavailable(String),

    #[error("Token not listed: {0}")]
    TokenNotListed(String),
}

/// Preference persistence errors
#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Failed to read preferences: {0}")]
    ReadFailed(String),

    #[error("Failed to write preferences: {0}")]
    WriteFailed(String),

    #[error("Corrupt preference data: {0}")]
    CorruptData(String),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Intent error: {0}")]
    IntentError(String),

    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("Preference error: {0}")]
    PreferenceError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<IntentError> for AppError {
    fn from(err: IntentError) -> Self {
        AppError::IntentError(err.to_string())
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        AppError::RegistryError(err.to_string())
    }
}

impl From<PreferenceError> for AppError {
    fn from(err: PreferenceError) -> Self {
        AppError::PreferenceError(err.to_string())
    }
}

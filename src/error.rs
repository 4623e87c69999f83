//! Error types for deck and campaign loading

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Invalid taboo format: {0}")]
    InvalidTabooFormat(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Not an investigator: {0}")]
    NotAnInvestigator(String),

    #[error("Invalid chaos bag: {0}")]
    InvalidChaosBag(String),

    #[error("Campaign not found: {0}")]
    CampaignNotFound(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Logger error: {0}")]
    LoggerError(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, DeckError>;

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid card position")]
    InvalidPosition,
    #[error("No images available to build a board")]
    EmptyImagePool,
    #[error("Player name is blank")]
    BlankName,
    #[error("Player name is longer than {max} characters")]
    NameTooLong { max: usize },
    #[error("Round is not won, nothing to record")]
    NotWon,
    #[error("Image listing is malformed")]
    MalformedListing,
    #[error("Storage is unavailable")]
    StorageUnavailable,
}

pub type Result<T> = core::result::Result<T, GameError>;

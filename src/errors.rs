use thiserror::Error;

/// Main error type for the Pokemon Quest game engine
#[derive(Debug, Error)]
pub enum GameError {
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("battle error: {0}")]
    Battle(#[from] BattleError),
    #[error("save error: {0}")]
    Save(#[from] SaveError),
}

/// Errors raised while parsing the static data tables
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed species table: {0}")]
    MalformedSpeciesTable(String),
    #[error("malformed move table: {0}")]
    MalformedMoveTable(String),
}

/// Errors related to battle state and action resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// The player has no conscious party member; the battle never starts.
    #[error("no usable pokemon to battle with")]
    NoUsablePokemon,
    #[error("battle has already ended")]
    BattleOver,
    #[error("no pokemon in party slot {0}")]
    InvalidPartySlot(usize),
    #[error("inconsistent battle state: {0}")]
    InconsistentState(String),
}

/// Errors related to save-file handling
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save '{0}' not found")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Type alias for Results using GameError
pub type GameResult<T> = Result<T, GameError>;

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;

/// Type alias for Results using SaveError
pub type SaveResult<T> = Result<T, SaveError>;

//! Error types shared across the library.
//!
//! Each enum is a plain `Display + std::error::Error` type so binaries can wrap
//! them with `anyhow` context while tests can match on variants.
use std::fmt;
use std::path::PathBuf;

/// Errors raised while generating a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
    /// The filtered pool holds fewer items than the requested number of pairs.
    InsufficientItems { requested: usize, available: usize },
    /// A board needs at least one pair.
    ZeroPairs,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::InsufficientItems {
                requested,
                available,
            } => write!(
                f,
                "not enough items for {} pairs: only {} match the current filter",
                requested, available
            ),
            GenerateError::ZeroPairs => f.write_str("a board needs at least one pair"),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Errors surfaced by the session controller to the view layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// No item pool has been loaded yet, or no board has been generated.
    NotReady,
    /// The tile index does not exist on the current board.
    InvalidTile { index: usize, tiles: usize },
    Generate(GenerateError),
    Config(ConfigError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotReady => f.write_str("the game is not ready yet"),
            SessionError::InvalidTile { index, tiles } => write!(
                f,
                "tile {} does not exist (board has {} tiles)",
                index, tiles
            ),
            SessionError::Generate(err) => write!(f, "cannot start a game: {}", err),
            SessionError::Config(err) => write!(f, "invalid configuration: {}", err),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Generate(err) => Some(err),
            SessionError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GenerateError> for SessionError {
    fn from(err: GenerateError) -> Self {
        SessionError::Generate(err)
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        SessionError::Config(err)
    }
}

/// Errors raised while loading or validating a [`crate::config::GameConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    EmptyBoard,
    OddTileCount { rows: usize, columns: usize },
    BoardTooLarge { rows: usize, columns: usize },
    EmptyYearRange { start: i32, end: i32 },
    Read { path: PathBuf, message: String },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyBoard => f.write_str("board must have at least one row and column"),
            ConfigError::OddTileCount { rows, columns } => write!(
                f,
                "a {}x{} board has an odd number of tiles",
                rows, columns
            ),
            ConfigError::BoardTooLarge { rows, columns } => {
                write!(f, "a {}x{} board has too many tiles", rows, columns)
            }
            ConfigError::EmptyYearRange { start, end } => {
                write!(f, "year range [{}, {}) is empty", start, end)
            }
            ConfigError::Read { path, message } => {
                write!(f, "failed to read {}: {}", path.display(), message)
            }
            ConfigError::Parse(message) => write!(f, "failed to parse config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while loading the item pool.
#[derive(Debug)]
pub enum ItemError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    DuplicateId(String),
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemError::Io(err) => write!(f, "failed to read item data: {}", err),
            ItemError::Parse(err) => write!(f, "malformed item data: {}", err),
            ItemError::DuplicateId(id) => write!(f, "item id '{}' appears more than once", id),
        }
    }
}

impl std::error::Error for ItemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ItemError::Io(err) => Some(err),
            ItemError::Parse(err) => Some(err),
            ItemError::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for ItemError {
    fn from(err: std::io::Error) -> Self {
        ItemError::Io(err)
    }
}

impl From<serde_json::Error> for ItemError {
    fn from(err: serde_json::Error) -> Self {
        ItemError::Parse(err)
    }
}

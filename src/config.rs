//! Game settings: board size, year range, difficulty and mismatch delay, loaded from TOML.
use crate::error::ConfigError;
use crate::generator::{Difficulty, YearRange};
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct BoardSize {
    pub rows: usize,
    pub columns: usize,
}

impl BoardSize {
    pub fn new(rows: usize, columns: usize) -> Self {
        BoardSize { rows, columns }
    }

    /// Number of tiles on the board, or `None` if it does not fit in a `usize`.
    pub fn tiles(&self) -> Option<usize> {
        self.rows.checked_mul(self.columns)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        BoardSize {
            rows: defaults::rows(),
            columns: defaults::columns(),
        }
    }
}

impl std::str::FromStr for BoardSize {
    type Err = String;

    /// Parses `ROWSxCOLUMNS`, e.g. `4x6`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rows, columns) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected ROWSxCOLUMNS, got '{}'", s))?;
        let rows = rows.trim().parse().map_err(|e| format!("bad row count: {}", e))?;
        let columns = columns
            .trim()
            .parse()
            .map_err(|e| format!("bad column count: {}", e))?;
        Ok(BoardSize { rows, columns })
    }
}

/// User-selectable settings for a round.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub board: BoardSize,
    #[serde(default)]
    pub years: YearRange,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "defaults::mismatch_delay_ms")]
    pub mismatch_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardSize::default(),
            years: YearRange::default(),
            difficulty: Difficulty::default(),
            mismatch_delay_ms: defaults::mismatch_delay_ms(),
        }
    }
}

impl GameConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            toml::from_str(contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let BoardSize { rows, columns } = self.board;
        if rows == 0 || columns == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        let tiles = self
            .board
            .tiles()
            .ok_or(ConfigError::BoardTooLarge { rows, columns })?;
        if tiles % 2 != 0 {
            return Err(ConfigError::OddTileCount { rows, columns });
        }
        if self.years.is_empty() {
            return Err(ConfigError::EmptyYearRange {
                start: self.years.start,
                end: self.years.end,
            });
        }
        Ok(())
    }

    /// Pairs on the board. Zero for a board too large to count, which `validate` rejects.
    pub fn pair_count(&self) -> usize {
        self.board.tiles().map_or(0, |tiles| tiles / 2)
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }
}

mod defaults {
    pub fn rows() -> usize {
        4
    }

    pub fn columns() -> usize {
        4
    }

    pub fn mismatch_delay_ms() -> u64 {
        2000
    }
}

//! # Memory Match Library
//!
//! This library provides the core logic for a memory-matching game: a board of face-down
//! tiles backed by paired images, revealed two at a time. Matches stay face-up, mismatches
//! flip back after a delay, and the round ends when every pair is found.
//!
//! It is used by two binaries:
//! - `human_player`: Allows interactive gameplay in the terminal.
//! - `autoplay_evaluator`: Plays many generated boards with the automated strategies and
//!   reports how many moves each one needs.
//!
//! ## Modules
//! - `item`: Source records (`Item`), JSON loading and the built-in demo pool.
//! - `generator`: Builds shuffled boards of paired tiles from an item pool.
//! - `engine`: Tiles, the per-round `BoardState` and the `MatchEngine` state machine.
//! - `scheduler`: Delayed delivery of mismatch revert tickets (virtual clock or tokio timers).
//! - `session`: The controller front ends talk to; wires generator, engine and scheduler together.
//! - `view`: Projection of a board into a `ViewModel`, plus terminal rendering.
//! - `config`: User-selectable game settings and TOML loading.
//! - `error`: Error types.
//! - `autoplay`: Automated strategies and a driver that plays a board to the end.
//! - `utils`: Compact textual board layouts, mostly for tests.

pub mod autoplay;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod item;
pub mod scheduler;
pub mod session;
pub mod utils;
pub mod view;

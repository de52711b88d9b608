//! Rendering projection from `BoardState` to something a front end can draw.
//!
//! `render` is the only thing a view layer needs from the engine between events. The
//! terminal helpers below are what `human_player` draws with.
use crate::engine::BoardState;
use std::time::Duration;

/// What a single tile currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileFace {
    Hidden,
    Peeked(String),
    /// Face-up as part of a pending mismatch.
    Mismatched(String),
    Found(String),
}

impl TileFace {
    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            TileFace::Hidden => "44",
            TileFace::Peeked(_) => "43",
            TileFace::Mismatched(_) => "41",
            TileFace::Found(_) => "42",
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            TileFace::Hidden => None,
            TileFace::Peeked(image) | TileFace::Mismatched(image) | TileFace::Found(image) => {
                Some(image.as_str())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    pub faces: Vec<TileFace>,
    pub moves: u32,
    pub move_label: String,
    pub pairs_found: usize,
    pub pairs_total: usize,
    pub elapsed_secs: u64,
    pub won: bool,
}

/// Projects the board into a view model.
pub fn render(board: &BoardState) -> ViewModel {
    let faces = board
        .tiles()
        .iter()
        .map(|tile| {
            let index = tile.tile_index;
            let image = tile.image.clone();
            if board.is_found(index) {
                TileFace::Found(image)
            } else if board.is_mismatched(index) {
                TileFace::Mismatched(image)
            } else if board.is_peeked(index) {
                TileFace::Peeked(image)
            } else {
                TileFace::Hidden
            }
        })
        .collect();

    ViewModel {
        faces,
        moves: board.moves(),
        move_label: move_label(board.moves()),
        pairs_found: board.pairs_found(),
        pairs_total: board.pairs_total(),
        elapsed_secs: board.elapsed().as_secs(),
        won: board.is_won(),
    }
}

/// Move counter text: empty before the first click.
///
/// ```
/// use memory_match::view::move_label;
/// assert_eq!(move_label(0), "");
/// assert_eq!(move_label(1), "1 click");
/// assert_eq!(move_label(12), "12 clicks");
/// ```
pub fn move_label(moves: u32) -> String {
    match moves {
        0 => String::new(),
        1 => "1 click".to_string(),
        n => format!("{} clicks", n),
    }
}

/// Text shown when a round is won.
pub fn win_summary(moves: u32, elapsed: Duration) -> String {
    format!("{} clicks in {} seconds", moves, elapsed.as_secs())
}

const MAX_CELL_WIDTH: usize = 12;

/// Lays the view out as a grid with `columns` tiles per row, using ANSI colours.
///
/// Hidden tiles show their index so a player can type it; face-up tiles show their image,
/// truncated to a fixed width.
pub fn to_terminal_string(view: &ViewModel, columns: usize) -> String {
    let columns = columns.max(1);
    let width = view
        .faces
        .iter()
        .enumerate()
        .map(|(index, face)| match face.image() {
            Some(image) => image.chars().count(),
            None => index.to_string().len(),
        })
        .max()
        .unwrap_or(1)
        .min(MAX_CELL_WIDTH);

    let mut output = String::new();
    for (index, face) in view.faces.iter().enumerate() {
        let label = match face.image() {
            Some(image) => image.chars().take(width).collect::<String>(),
            None => index.to_string(),
        };
        output.push_str(&format!(
            "\x1b[1;{}m {:^width$} \x1b[m",
            face.to_ansi_color_code(),
            label,
            width = width
        ));
        if (index + 1) % columns == 0 && index + 1 < view.faces.len() {
            output.push('\n');
        } else {
            output.push(' ');
        }
    }

    output.push_str(&format!(
        "\n{}/{} pairs  {}  {}s",
        view.pairs_found, view.pairs_total, view.move_label, view.elapsed_secs
    ));
    output
}

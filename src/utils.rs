use crate::engine::Tile;
use std::collections::HashMap;

/// Parses an array of string slices into a board layout.
///
/// Each string slice is one row of the board; rows are read top to bottom and
/// concatenated, so `tile_index` is assigned row-major. Every character is a
/// tile whose `pair_id` (and image) is that character. Rows may differ in
/// length; the layout only cares about the resulting sequence.
///
/// Every character must appear exactly twice, and whitespace is rejected so
/// that typos in fixtures surface immediately.
///
/// # Arguments
/// * `s`: A slice of string slices (`&[&str]`) representing the rows of the board.
///
/// # Returns
/// * `Ok(Vec<Tile>)` if every pair id occurs exactly twice.
/// * `Err(String)` if the layout is empty, contains whitespace, or any
///   character does not appear exactly twice.
///
/// # Examples
/// ```
/// use memory_match::utils::board_from_str_array;
///
/// let tiles = board_from_str_array(&["AB", "BA"]).unwrap();
/// assert_eq!(tiles.len(), 4);
/// assert_eq!(tiles[3].pair_id, "A");
/// assert_eq!(tiles[3].tile_index, 3);
///
/// assert!(board_from_str_array(&["AB", "B"]).is_err());
/// assert!(board_from_str_array(&["A A"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Vec<Tile>, String> {
    let mut tiles = Vec::new();
    let mut counts: HashMap<char, usize> = HashMap::new();

    for (r, row_str) in s.iter().enumerate() {
        for (c, char_tile) in row_str.chars().enumerate() {
            if char_tile.is_whitespace() {
                return Err(format!(
                    "Unrecognized character {:?} in row {} col {}",
                    char_tile, r, c
                ));
            }
            *counts.entry(char_tile).or_insert(0) += 1;
            let id = char_tile.to_string();
            tiles.push(Tile::new(id.clone(), tiles.len(), id));
        }
    }

    if tiles.is_empty() {
        return Err("Board layout has no tiles".to_string());
    }

    let mut unpaired: Vec<(char, usize)> = counts.into_iter().filter(|&(_, n)| n != 2).collect();
    if !unpaired.is_empty() {
        unpaired.sort_unstable();
        let (id, n) = unpaired[0];
        return Err(format!(
            "Pair id '{}' appears {} time(s), expected exactly 2",
            id, n
        ));
    }

    Ok(tiles)
}

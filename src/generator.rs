//! Board generation.
//!
//! Turns an item pool into a shuffled list of tiles: filter, sample `pair_count`
//! items without replacement, emit two tiles per item, shuffle, then number the
//! tiles by their final position. The random source is injected so tests can seed it.
use crate::engine::Tile;
use crate::error::GenerateError;
use crate::item::Item;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which face the second tile of each pair shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Both tiles show the front image.
    #[default]
    Easy,
    /// The second tile shows the back image, so pairs look different.
    Hard,
}

impl Difficulty {
    /// Picks the image for the second tile of `item`'s pair.
    ///
    /// Items without a back image fall back to their front in hard mode.
    pub fn second_image<'a>(&self, item: &'a Item) -> &'a str {
        match (self, item.back.as_deref()) {
            (Difficulty::Hard, Some(back)) => back,
            (Difficulty::Hard, None) => {
                warn!("item {} has no back image, using its front", item.id);
                &item.front
            }
            (Difficulty::Easy, _) => &item.front,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Hard => f.write_str("hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}' (expected easy or hard)", other)),
        }
    }
}

/// Half-open year range `[start, end)` used to filter the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub const ALL: YearRange = YearRange {
        start: i32::MIN,
        end: i32::MAX,
    };

    pub fn new(start: i32, end: i32) -> Self {
        YearRange { start, end }
    }

    /// Inclusive lower bound, exclusive upper bound.
    ///
    /// ```
    /// use memory_match::generator::YearRange;
    /// let range = YearRange::new(1500, 1600);
    /// assert!(range.contains(1500));
    /// assert!(!range.contains(1600));
    /// ```
    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The range as an item filter.
    pub fn filter(self) -> impl Fn(&Item) -> bool {
        move |item: &Item| self.contains(item.year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange::ALL
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == YearRange::ALL {
            f.write_str("all years")
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

/// Generates a shuffled board of `2 * pair_count` tiles.
///
/// # Arguments
/// * `pool`: Candidate items.
/// * `pair_count`: Number of pairs on the board.
/// * `filter`: Keeps items eligible for this board, e.g. `YearRange::filter`.
/// * `difficulty`: Chooses the second tile's face.
/// * `rng`: Random source for sampling and shuffling.
///
/// # Returns
/// * `Ok(Vec<Tile>)` where each `pair_id` (the item id) appears exactly twice and
///   `tile_index` equals the position in the vector.
/// * `Err(GenerateError::ZeroPairs)` if `pair_count` is zero.
/// * `Err(GenerateError::InsufficientItems)` if fewer than `pair_count` items pass the filter.
///
/// # Examples
/// ```
/// use memory_match::generator::{generate, Difficulty, YearRange};
/// use memory_match::item::demo_pool;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let tiles = generate(&demo_pool(), 8, YearRange::ALL.filter(), Difficulty::Easy, &mut rng).unwrap();
/// assert_eq!(tiles.len(), 16);
/// ```
pub fn generate<F, R>(
    pool: &[Item],
    pair_count: usize,
    filter: F,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Vec<Tile>, GenerateError>
where
    F: Fn(&Item) -> bool,
    R: Rng + ?Sized,
{
    if pair_count == 0 {
        return Err(GenerateError::ZeroPairs);
    }

    let candidates: Vec<&Item> = pool.iter().filter(|item| filter(*item)).collect();
    if candidates.len() < pair_count {
        return Err(GenerateError::InsufficientItems {
            requested: pair_count,
            available: candidates.len(),
        });
    }

    let mut tiles: Vec<Tile> = candidates
        .choose_multiple(&mut *rng, pair_count)
        .flat_map(|item| {
            [
                Tile::new(item.id.clone(), 0, item.front.clone()),
                Tile::new(item.id.clone(), 0, difficulty.second_image(item)),
            ]
        })
        .collect();

    tiles.shuffle(rng);
    for (position, tile) in tiles.iter_mut().enumerate() {
        tile.tile_index = position;
    }

    debug!(
        "generated {} tiles from {} of {} items ({})",
        tiles.len(),
        candidates.len(),
        pool.len(),
        difficulty
    );
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::demo_pool;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn pair_counts(tiles: &[Tile]) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for tile in tiles {
            *counts.entry(tile.pair_id.as_str()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_generate_pairs_exactly_twice() {
        let mut rng = SmallRng::seed_from_u64(514514);
        let tiles = generate(&demo_pool(), 6, YearRange::ALL.filter(), Difficulty::Easy, &mut rng)
            .unwrap();
        let counts = pair_counts(&tiles);
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&n| n == 2));
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.tile_index, i);
        }
    }

    #[test]
    fn test_generate_respects_year_filter() {
        let pool = demo_pool();
        let range = YearRange::new(1700, 1750);
        let mut rng = SmallRng::seed_from_u64(1);
        let tiles = generate(&pool, 5, range.filter(), Difficulty::Easy, &mut rng).unwrap();
        for tile in &tiles {
            let item = pool.iter().find(|item| item.id == tile.pair_id).unwrap();
            assert!(range.contains(item.year));
        }
    }

    #[test]
    fn test_generate_insufficient_items() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = generate(
            &demo_pool(),
            6,
            YearRange::new(1700, 1750).filter(),
            Difficulty::Easy,
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GenerateError::InsufficientItems {
                requested: 6,
                available: 5
            }
        );
    }

    #[test]
    fn test_generate_zero_pairs() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = generate(&demo_pool(), 0, |_: &Item| true, Difficulty::Easy, &mut rng);
        assert_eq!(err.unwrap_err(), GenerateError::ZeroPairs);
    }

    #[test]
    fn test_generate_empty_pool() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = generate(&[], 1, |_: &Item| true, Difficulty::Easy, &mut rng).unwrap_err();
        assert!(matches!(err, GenerateError::InsufficientItems { available: 0, .. }));
    }

    #[test]
    fn test_generate_easy_uses_front_twice() {
        let pool = vec![Item::new("x", 1, "front").with_back("back")];
        let mut rng = SmallRng::seed_from_u64(3);
        let tiles = generate(&pool, 1, |_: &Item| true, Difficulty::Easy, &mut rng).unwrap();
        assert!(tiles.iter().all(|tile| tile.image == "front"));
    }

    #[test]
    fn test_generate_hard_uses_back_for_second_tile() {
        let pool = vec![Item::new("x", 1, "front").with_back("back")];
        let mut rng = SmallRng::seed_from_u64(3);
        let tiles = generate(&pool, 1, |_: &Item| true, Difficulty::Hard, &mut rng).unwrap();
        let mut images: Vec<&str> = tiles.iter().map(|tile| tile.image.as_str()).collect();
        images.sort_unstable();
        assert_eq!(images, ["back", "front"]);
    }

    #[test]
    fn test_generate_hard_without_back_falls_back() {
        let pool = vec![Item::new("x", 1, "front")];
        let mut rng = SmallRng::seed_from_u64(3);
        let tiles = generate(&pool, 1, |_: &Item| true, Difficulty::Hard, &mut rng).unwrap();
        assert!(tiles.iter().all(|tile| tile.image == "front"));
    }

    #[test]
    fn test_generate_same_seed_same_board() {
        let pool = demo_pool();
        let play = |seed: u64| {
            let mut rng = SmallRng::seed_from_u64(seed);
            generate(&pool, 8, |_: &Item| true, Difficulty::Easy, &mut rng)
        };
        let a = play(9).unwrap();
        let b = play(9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_varies_across_calls() {
        let pool = demo_pool();
        let mut rng = SmallRng::seed_from_u64(11);
        let boards: Vec<Vec<Tile>> = (0..5)
            .map(|_| generate(&pool, 8, |_: &Item| true, Difficulty::Easy, &mut rng).unwrap())
            .collect();
        assert!(boards.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("medium".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_year_range_display() {
        assert_eq!(YearRange::ALL.to_string(), "all years");
        assert_eq!(YearRange::new(1500, 1600).to_string(), "1500..1600");
    }
}

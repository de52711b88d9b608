//! Source records that boards are built from.
//!
//! An `Item` is whatever the data layer hands us: an identifying key, a year used
//! for filtering, and one or two opaque image references. How those references
//! turn into pictures (URLs, emoji, file paths) is the view's business.
use crate::error::ItemError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// A candidate for a pair on the board.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Item {
    /// Identifying key. Becomes the `pair_id` of both tiles generated from this item.
    pub id: String,
    /// Grouping attribute used by the year-range filter.
    pub year: i32,
    /// Front image reference.
    pub front: String,
    /// Back image reference, used by hard mode.
    #[serde(default)]
    pub back: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, year: i32, front: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            year,
            front: front.into(),
            back: None,
        }
    }

    pub fn with_back(mut self, back: impl Into<String>) -> Self {
        self.back = Some(back.into());
        self
    }
}

/// Parses a JSON array of items.
///
/// Item ids must be unique, since two items sharing an id would produce four
/// tiles with the same `pair_id`.
///
/// # Examples
/// ```
/// use memory_match::item::parse_items;
///
/// let items = parse_items(r#"[{"id": "a", "year": 1650, "front": "a_vs.jpg", "back": "a_rs.jpg"}]"#).unwrap();
/// assert_eq!(items[0].back.as_deref(), Some("a_rs.jpg"));
/// assert!(parse_items(r#"[{"id": "a", "year": 1, "front": "x"}, {"id": "a", "year": 2, "front": "y"}]"#).is_err());
/// ```
pub fn parse_items(text: &str) -> Result<Vec<Item>, ItemError> {
    let items: Vec<Item> = serde_json::from_str(text)?;
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.id.as_str()) {
            return Err(ItemError::DuplicateId(item.id.clone()));
        }
    }
    Ok(items)
}

/// Reads and parses an item file.
pub fn load_items<P: AsRef<Path>>(path: P) -> Result<Vec<Item>, ItemError> {
    let content = std::fs::read_to_string(path)?;
    parse_items(&content)
}

/// Asynchronous variant of [`load_items`] for event-loop front ends.
pub async fn load_items_async<P: AsRef<Path>>(path: P) -> Result<Vec<Item>, ItemError> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_items(&content)
}

const DEMO_FACES: [(&str, &str); 32] = [
    ("🍎", "apple"),
    ("🍌", "banana"),
    ("🍇", "grapes"),
    ("🍒", "cherries"),
    ("🍋", "lemon"),
    ("🍉", "melon"),
    ("🍓", "berry"),
    ("🍑", "peach"),
    ("🥥", "coconut"),
    ("🥝", "kiwi"),
    ("🍊", "orange"),
    ("🍍", "pineapple"),
    ("🥕", "carrot"),
    ("🌽", "corn"),
    ("🥦", "broccoli"),
    ("🍆", "eggplant"),
    ("🥔", "potato"),
    ("🧄", "garlic"),
    ("🧅", "onion"),
    ("🍄", "mushroom"),
    ("🧀", "cheese"),
    ("🥨", "pretzel"),
    ("🍿", "popcorn"),
    ("🍩", "donut"),
    ("🍰", "cake"),
    ("🧁", "cupcake"),
    ("🍫", "chocolate"),
    ("🍯", "honey"),
    ("🍕", "pizza"),
    ("🍔", "burger"),
    ("🌮", "taco"),
    ("🥐", "croissant"),
];

/// Built-in pool so the game runs without a data file.
///
/// Fronts are emoji, backs are their names, and years run from 1700 in steps of
/// ten so range filters have something to bite on.
pub fn demo_pool() -> Vec<Item> {
    DEMO_FACES
        .iter()
        .enumerate()
        .map(|(i, (emoji, name))| Item::new(*name, 1700 + 10 * i as i32, *emoji).with_back(*name))
        .collect()
}

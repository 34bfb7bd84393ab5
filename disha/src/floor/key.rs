//! Floor identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset and landing-zone key of a floor.
///
/// Upper floors with an identical layout share one `Basic` key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloorKey {
    /// A floor with its own assets
    Floor(i32),
    /// The shared layout of every floor from the configured threshold up
    Basic,
}

impl FloorKey {
    /// Key of `floor`, collapsing floors at or above `shared_from`.
    pub fn of(floor: i32, shared_from: Option<i32>) -> Self {
        match shared_from {
            Some(threshold) if floor >= threshold => FloorKey::Basic,
            _ => FloorKey::Floor(floor),
        }
    }

    /// Label used in asset names and landing-zone tables.
    ///
    /// ```
    /// use disha::floor::FloorKey;
    ///
    /// assert_eq!(FloorKey::Floor(-1).label(), "B1F");
    /// assert_eq!(FloorKey::Floor(2).label(), "2F");
    /// assert_eq!(FloorKey::Basic.label(), "basic");
    /// ```
    pub fn label(&self) -> String {
        match *self {
            FloorKey::Basic => "basic".to_string(),
            FloorKey::Floor(n) if n < 0 => format!("B{}F", n.unsigned_abs()),
            FloorKey::Floor(n) => format!("{}F", n),
        }
    }
}

impl fmt::Display for FloorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

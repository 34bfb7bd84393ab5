//! Grid-to-global origin offsets.

use std::collections::BTreeMap;

use super::key::FloorKey;
use crate::core::GridCoord;

/// Origin offset of each floor's grid in the building frame.
///
/// `global = grid + origin`. Floors without an entry sit at (0, 0).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OriginTable {
    origins: BTreeMap<FloorKey, GridCoord>,
}

impl OriginTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: FloorKey, origin: GridCoord) -> Self {
        self.insert(key, origin);
        self
    }

    /// Set the origin of `key`.
    pub fn insert(&mut self, key: FloorKey, origin: GridCoord) {
        self.origins.insert(key, origin);
    }

    /// Origin of `key`.
    pub fn origin(&self, key: FloorKey) -> GridCoord {
        self.origins.get(&key).copied().unwrap_or(GridCoord::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_zero() {
        let table = OriginTable::new().with(FloorKey::Floor(1), GridCoord::new(100, 200));
        assert_eq!(table.origin(FloorKey::Floor(1)), GridCoord::new(100, 200));
        assert_eq!(table.origin(FloorKey::Floor(2)), GridCoord::ZERO);
    }
}

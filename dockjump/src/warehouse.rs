use serde::{Deserialize, Serialize};

use crate::tables::WAREHOUSE_CAPACITY;
use crate::{score, Dock, InvalidGameState, PieceKind};

/// The goods stored at one dock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WarehouseRecord")]
pub struct Warehouse {
    dock: Dock,
    /// In loading order.
    goods: Vec<PieceKind>,
    /// Always `score(&goods)` for scoring docks, and 0 otherwise.
    score: u32,
}

impl Warehouse {
    pub fn new(dock: Dock) -> Self {
        Self {
            dock,
            goods: Vec::with_capacity(WAREHOUSE_CAPACITY),
            score: 0,
        }
    }

    pub fn dock(&self) -> Dock {
        self.dock
    }

    pub fn goods(&self) -> &[PieceKind] {
        &self.goods
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_full(&self) -> bool {
        self.goods.len() >= WAREHOUSE_CAPACITY
    }

    /// Stores a good and returns by how much the warehouse's score changed.
    ///
    /// Panics if the warehouse is full; callers check [`Self::is_full()`] first.
    pub(crate) fn load(&mut self, kind: PieceKind) -> u32 {
        assert!(!self.is_full(), "warehouse {} overflowed", self.dock);
        self.goods.push(kind);
        let old_score = self.score;
        if self.dock.is_scoring() {
            self.score = score(&self.goods);
        }
        self.score - old_score
    }
}

/// A [`Warehouse`] as stored, before its score is checked.
#[derive(Deserialize)]
struct WarehouseRecord {
    dock: Dock,
    goods: Vec<PieceKind>,
    score: u32,
}

impl TryFrom<WarehouseRecord> for Warehouse {
    type Error = InvalidGameState;

    fn try_from(record: WarehouseRecord) -> Result<Self, Self::Error> {
        let WarehouseRecord { dock, goods, score } = record;
        if goods.len() > WAREHOUSE_CAPACITY {
            return Err(InvalidGameState::WarehouseOverflow {
                dock,
                goods: goods.len(),
            });
        }
        let expected = if dock.is_scoring() {
            crate::score(&goods)
        } else {
            0
        };
        if score != expected {
            return Err(InvalidGameState::WrongWarehouseScore {
                dock,
                score,
                expected,
            });
        }
        Ok(Self { dock, goods, score })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind::*;

    #[test]
    fn scoring_warehouse() {
        let mut warehouse = Warehouse::new("C9".parse().unwrap());
        assert_eq!(warehouse.load(Cheese), 1);
        assert_eq!(warehouse.load(Egg), 1);
        assert_eq!(warehouse.load(Cheese), 2);
        assert!(!warehouse.is_full());
        assert_eq!(warehouse.load(Egg), 2);
        assert!(warehouse.is_full());
        assert_eq!(warehouse.score(), 6);
        assert_eq!(warehouse.goods(), &[Cheese, Egg, Cheese, Egg]);
    }

    #[test]
    fn garden_dock_never_scores() {
        let mut warehouse = Warehouse::new("A0".parse().unwrap());
        for _ in 0..4 {
            assert_eq!(warehouse.load(Tulip), 0);
        }
        assert_eq!(warehouse.score(), 0);
        assert!(warehouse.is_full());
    }

    #[test]
    fn stored_warehouses_are_checked() {
        let mut warehouse = Warehouse::new("B0".parse().unwrap());
        warehouse.load(Egg);
        warehouse.load(Egg);
        let json = serde_json::to_string(&warehouse).unwrap();
        assert_eq!(serde_json::from_str::<Warehouse>(&json).unwrap(), warehouse);

        let inflated = json.replace("\"score\":3", "\"score\":30");
        assert!(serde_json::from_str::<Warehouse>(&inflated)
            .unwrap_err()
            .to_string()
            .contains("worth 3"));
        let garden = r#"{"dock":"A0","goods":["egg"],"score":1}"#;
        assert!(serde_json::from_str::<Warehouse>(garden).is_err());
        let overfull = r#"{"dock":"C9","goods":["egg","egg","egg","egg","egg"],"score":9}"#;
        assert!(serde_json::from_str::<Warehouse>(overfull)
            .unwrap_err()
            .to_string()
            .contains("holds 5 goods"));
    }

    #[test]
    #[should_panic]
    fn overflow_is_a_bug() {
        let mut warehouse = Warehouse::new("F9".parse().unwrap());
        for _ in 0..5 {
            warehouse.load(Butter);
        }
    }
}

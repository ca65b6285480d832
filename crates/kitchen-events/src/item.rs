//! Item Types
//!
//! Tagged-union model of everything a unit can carry or a tile can hold.

use serde::{Deserialize, Serialize};

/// Ingredient identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodKind {
    Meat,
    Egg,
    Onions,
    Noodles,
    Sauce,
}

impl FoodKind {
    /// Needs a pass on the counter before it can be used
    pub fn can_chop(&self) -> bool {
        matches!(self, FoodKind::Meat | FoodKind::Onions)
    }

    /// Needs time in a pan before it can be plated
    pub fn can_cook(&self) -> bool {
        matches!(self, FoodKind::Meat | FoodKind::Egg)
    }

    /// Name used in order ingredient lists
    pub fn label(&self) -> &'static str {
        match self {
            FoodKind::Meat => "MEAT",
            FoodKind::Egg => "EGG",
            FoodKind::Onions => "ONIONS",
            FoodKind::Noodles => "NOODLES",
            FoodKind::Sauce => "SAUCE",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.label() == label)
    }

    /// Returns all food kinds.
    pub fn all() -> &'static [FoodKind] {
        &[
            FoodKind::Meat,
            FoodKind::Egg,
            FoodKind::Onions,
            FoodKind::Noodles,
            FoodKind::Sauce,
        ]
    }
}

impl std::fmt::Display for FoodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Doneness of a cookable ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookStage {
    #[default]
    Raw,
    Cooked,
    Burnt,
}

/// One ingredient instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub kind: FoodKind,
    #[serde(default)]
    pub chopped: bool,
    #[serde(default)]
    pub cook_stage: CookStage,
}

impl Food {
    /// Freshly bought, untouched
    pub fn raw(kind: FoodKind) -> Self {
        Self {
            kind,
            chopped: false,
            cook_stage: CookStage::Raw,
        }
    }

    /// Fully prepared for plating
    pub fn prepared(kind: FoodKind) -> Self {
        Self {
            kind,
            chopped: kind.can_chop(),
            cook_stage: if kind.can_cook() {
                CookStage::Cooked
            } else {
                CookStage::Raw
            },
        }
    }

    /// Chopped if it needs chopping and cooked (not burnt) if it needs cooking
    pub fn is_ready(&self) -> bool {
        let chop_done = !self.kind.can_chop() || self.chopped;
        let cook_done = !self.kind.can_cook() || self.cook_stage == CookStage::Cooked;
        chop_done && cook_done
    }
}

/// A cooking vessel; sits on a cooker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pan {
    pub food: Option<Food>,
}

/// Assembly vessel for an order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plate {
    #[serde(default)]
    pub foods: Vec<Food>,
    #[serde(default)]
    pub dirty: bool,
}

impl Plate {
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Ingredient kinds currently on the plate
    pub fn kinds(&self) -> Vec<FoodKind> {
        self.foods.iter().map(|f| f.kind).collect()
    }
}

/// Anything that can be held or rest on a tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Item {
    Food(Food),
    Pan(Pan),
    Plate(Plate),
}

impl Item {
    pub fn as_food(&self) -> Option<&Food> {
        match self {
            Item::Food(food) => Some(food),
            _ => None,
        }
    }

    pub fn as_pan(&self) -> Option<&Pan> {
        match self {
            Item::Pan(pan) => Some(pan),
            _ => None,
        }
    }

    pub fn as_plate(&self) -> Option<&Plate> {
        match self {
            Item::Plate(plate) => Some(plate),
            _ => None,
        }
    }

    pub fn is_pan(&self) -> bool {
        matches!(self, Item::Pan(_))
    }

    pub fn is_plate(&self) -> bool {
        matches!(self, Item::Plate(_))
    }
}

/// Something the shop sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItem {
    Food(FoodKind),
    Pan,
    Plate,
}

impl ShopItem {
    /// The item a successful purchase puts in the buyer's hands
    pub fn to_item(self) -> Item {
        match self {
            ShopItem::Food(kind) => Item::Food(Food::raw(kind)),
            ShopItem::Pan => Item::Pan(Pan::default()),
            ShopItem::Plate => Item::Plate(Plate::default()),
        }
    }
}

/// Shop price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub meat: i64,
    pub egg: i64,
    pub onions: i64,
    pub noodles: i64,
    pub sauce: i64,
    pub pan: i64,
    pub plate: i64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            meat: 80,
            egg: 20,
            onions: 30,
            noodles: 40,
            sauce: 10,
            pan: 40,
            plate: 20,
        }
    }
}

impl Catalog {
    pub fn cost(&self, item: ShopItem) -> i64 {
        match item {
            ShopItem::Food(kind) => self.food_cost(kind),
            ShopItem::Pan => self.pan,
            ShopItem::Plate => self.plate,
        }
    }

    pub fn food_cost(&self, kind: FoodKind) -> i64 {
        match kind {
            FoodKind::Meat => self.meat,
            FoodKind::Egg => self.egg,
            FoodKind::Onions => self.onions,
            FoodKind::Noodles => self.noodles,
            FoodKind::Sauce => self.sauce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prep_table() {
        assert!(FoodKind::Meat.can_chop() && FoodKind::Meat.can_cook());
        assert!(!FoodKind::Egg.can_chop() && FoodKind::Egg.can_cook());
        assert!(FoodKind::Onions.can_chop() && !FoodKind::Onions.can_cook());
        assert!(!FoodKind::Noodles.can_chop() && !FoodKind::Noodles.can_cook());
        assert!(!FoodKind::Sauce.can_chop() && !FoodKind::Sauce.can_cook());
    }

    #[test]
    fn test_readiness() {
        let mut meat = Food::raw(FoodKind::Meat);
        assert!(!meat.is_ready());
        meat.chopped = true;
        assert!(!meat.is_ready());
        meat.cook_stage = CookStage::Cooked;
        assert!(meat.is_ready());
        meat.cook_stage = CookStage::Burnt;
        assert!(!meat.is_ready());

        assert!(Food::raw(FoodKind::Sauce).is_ready());
        assert!(Food::prepared(FoodKind::Egg).is_ready());
    }

    #[test]
    fn test_item_serializes_with_type_tag() {
        let item = Item::Food(Food::raw(FoodKind::Egg));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "Food");
        assert_eq!(json["kind"], "EGG");
    }
}

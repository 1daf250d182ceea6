//! Clothing categories and the slots they occupy in an outfit.

use serde::{Deserialize, Serialize};

/// A clothing class recognised by the wardrobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "T-shirt/top")]
    TShirtTop,
    Trouser,
    Pullover,
    Dress,
    Coat,
    Sandal,
    Shirt,
    Sneaker,
    Bag,
    #[serde(rename = "Ankle boot")]
    AnkleBoot,
}

/// Exclusivity group: an outfit holds at most one item per slot position
/// (bag, footwear, lower body, upper body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Bag,
    Footwear,
    LowerBody,
    UpperBody,
}

/// One row of the category registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryEntry {
    /// Stable identifier persisted in `category_tags.category_id`.
    pub id: u32,
    pub category: Category,
    pub name: &'static str,
    pub slot: Slot,
}

const T_SHIRT_TOP: CategoryEntry = CategoryEntry {
    id: 0,
    category: Category::TShirtTop,
    name: "T-shirt/top",
    slot: Slot::UpperBody,
};
const TROUSER: CategoryEntry = CategoryEntry {
    id: 1,
    category: Category::Trouser,
    name: "Trouser",
    slot: Slot::LowerBody,
};
const PULLOVER: CategoryEntry = CategoryEntry {
    id: 2,
    category: Category::Pullover,
    name: "Pullover",
    slot: Slot::UpperBody,
};
const DRESS: CategoryEntry = CategoryEntry {
    id: 3,
    category: Category::Dress,
    name: "Dress",
    slot: Slot::UpperBody,
};
const COAT: CategoryEntry = CategoryEntry {
    id: 4,
    category: Category::Coat,
    name: "Coat",
    slot: Slot::UpperBody,
};
const SANDAL: CategoryEntry = CategoryEntry {
    id: 5,
    category: Category::Sandal,
    name: "Sandal",
    slot: Slot::Footwear,
};
const SHIRT: CategoryEntry = CategoryEntry {
    id: 6,
    category: Category::Shirt,
    name: "Shirt",
    slot: Slot::UpperBody,
};
const SNEAKER: CategoryEntry = CategoryEntry {
    id: 7,
    category: Category::Sneaker,
    name: "Sneaker",
    slot: Slot::Footwear,
};
const BAG: CategoryEntry = CategoryEntry {
    id: 8,
    category: Category::Bag,
    name: "Bag",
    slot: Slot::Bag,
};
const ANKLE_BOOT: CategoryEntry = CategoryEntry {
    id: 9,
    category: Category::AnkleBoot,
    name: "Ankle boot",
    slot: Slot::Footwear,
};

/// Registry order is the bucket order of [`crate::categorizer::categorize`].
/// Ids are explicit and must never be renumbered.
pub const CATEGORY_REGISTRY: &[CategoryEntry] = &[
    T_SHIRT_TOP,
    TROUSER,
    PULLOVER,
    DRESS,
    COAT,
    SANDAL,
    SHIRT,
    SNEAKER,
    BAG,
    ANKLE_BOOT,
];

impl Category {
    /// All categories in registry order.
    pub fn all() -> impl Iterator<Item = Category> {
        CATEGORY_REGISTRY.iter().map(|e| e.category)
    }

    pub fn entry(self) -> &'static CategoryEntry {
        match self {
            Category::TShirtTop => &T_SHIRT_TOP,
            Category::Trouser => &TROUSER,
            Category::Pullover => &PULLOVER,
            Category::Dress => &DRESS,
            Category::Coat => &COAT,
            Category::Sandal => &SANDAL,
            Category::Shirt => &SHIRT,
            Category::Sneaker => &SNEAKER,
            Category::Bag => &BAG,
            Category::AnkleBoot => &ANKLE_BOOT,
        }
    }

    pub fn id(self) -> u32 {
        self.entry().id
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn slot(self) -> Slot {
        self.entry().slot
    }

    /// Exact, case-sensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Category> {
        CATEGORY_REGISTRY
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.category)
    }

    pub fn from_id(id: u32) -> Option<Category> {
        CATEGORY_REGISTRY
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.category)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Bag, Slot::Footwear, Slot::LowerBody, Slot::UpperBody];

    /// Numeric slot stored on `items.slot`.
    pub fn index(self) -> u32 {
        match self {
            Slot::Bag => 0,
            Slot::Footwear => 1,
            Slot::LowerBody => 2,
            Slot::UpperBody => 3,
        }
    }

    pub fn from_index(index: u32) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.index() == index)
    }

    /// Categories belonging to this slot, in registry order.
    pub fn categories(self) -> Vec<Category> {
        CATEGORY_REGISTRY
            .iter()
            .filter(|e| e.slot == self)
            .map(|e| e.category)
            .collect()
    }
}

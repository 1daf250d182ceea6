//! Colour, size and environment tags seeded into the wardrobe database.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Colour {
    pub id: u32,
    pub name: &'static str,
    /// CSS hex value, e.g. `#000080`.
    pub value: &'static str,
}

pub const COLOURS: &[Colour] = &[
    Colour { id: 0, name: "Black", value: "#000000" },
    Colour { id: 1, name: "White", value: "#FFFFFF" },
    Colour { id: 2, name: "Grey", value: "#808080" },
    Colour { id: 3, name: "Navy", value: "#000080" },
    Colour { id: 4, name: "Beige", value: "#F5F5DC" },
    Colour { id: 5, name: "Brown", value: "#8B4513" },
    Colour { id: 6, name: "Red", value: "#FF0000" },
    Colour { id: 7, name: "Pink", value: "#FFC0CB" },
    Colour { id: 8, name: "Orange", value: "#FFA500" },
    Colour { id: 9, name: "Yellow", value: "#FFFF00" },
    Colour { id: 10, name: "Green", value: "#008000" },
    Colour { id: 11, name: "Blue", value: "#0000FF" },
    Colour { id: 12, name: "Purple", value: "#800080" },
    Colour { id: 13, name: "Cream", value: "#FFFDD0" },
    Colour { id: 14, name: "Khaki", value: "#C3B091" },
    Colour { id: 15, name: "Teal", value: "#008080" },
    Colour { id: 16, name: "Mustard", value: "#FFDB58" },
    Colour { id: 17, name: "Lavender", value: "#E6E6FA" },
    Colour { id: 18, name: "Olive", value: "#808000" },
    Colour { id: 19, name: "Maroon", value: "#800000" },
    Colour { id: 20, name: "Coral", value: "#FF7F50" },
    Colour { id: 21, name: "Turquoise", value: "#40E0D0" },
    Colour { id: 22, name: "Magenta", value: "#FF00FF" },
];

impl Colour {
    pub fn by_id(id: u32) -> Option<&'static Colour> {
        COLOURS.iter().find(|c| c.id == id)
    }

    /// Case-insensitive lookup.
    pub fn by_name(name: &str) -> Option<&'static Colour> {
        COLOURS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Xs,
    S,
    M,
    L,
    Xl,
}

impl Size {
    pub const ALL: [Size; 5] = [Size::Xs, Size::S, Size::M, Size::L, Size::Xl];

    /// Stable identifier persisted in `size_tags.size_id`.
    pub fn id(self) -> u32 {
        match self {
            Size::Xs => 0,
            Size::S => 1,
            Size::M => 2,
            Size::L => 3,
            Size::Xl => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Size::Xs => "xs",
            Size::S => "s",
            Size::M => "m",
            Size::L => "l",
            Size::Xl => "xl",
        }
    }

    pub fn from_id(id: u32) -> Option<Size> {
        Size::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn from_name(name: &str) -> Option<Size> {
        Size::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name().to_uppercase())
    }
}

/// Weather an item is suited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    Warm,
    Cold,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Warm, Environment::Cold];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Warm => "Warm",
            Environment::Cold => "Cold",
        }
    }

    pub fn parse(value: &str) -> Option<Environment> {
        Environment::ALL.into_iter().find(|e| e.as_str() == value)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Static tag catalog: clothing categories, slots, colours, sizes and environments.

pub mod category;
pub mod tags;

pub use category::{Category, CategoryEntry, Slot, CATEGORY_REGISTRY};
pub use tags::{Colour, Environment, Size, COLOURS};

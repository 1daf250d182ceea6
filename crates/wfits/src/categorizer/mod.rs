pub mod outfit;

pub use outfit::{
    categorize, sort_by_display_order, BucketKey, Categorized, CategoryBuckets,
    OutfitCategorizer, Uncategorized, DISPLAY_ORDER,
};

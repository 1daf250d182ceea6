use std::hash::Hash;

use indexmap::IndexMap;

use crate::catalog::Category;

/// Priority order used when rendering an outfit, outerwear first and bags last.
/// Dress is not listed, so a dress bucket renders after the listed categories.
pub const DISPLAY_ORDER: &[Category] = &[
    Category::Coat,
    Category::Pullover,
    Category::Shirt,
    Category::TShirtTop,
    Category::Trouser,
    Category::Sandal,
    Category::Sneaker,
    Category::AnkleBoot,
    Category::Bag,
];

/// One bucket per registry category, in registry order.
pub type CategoryBuckets<T> = IndexMap<Category, Vec<T>>;

/// Anything carrying a category tag name.
pub trait Categorized {
    fn category_name(&self) -> &str;
}

/// Key of a display mapping that may or may not name a known category.
pub trait BucketKey {
    fn category(&self) -> Option<Category>;
}

impl BucketKey for Category {
    fn category(&self) -> Option<Category> {
        Some(*self)
    }
}

impl BucketKey for String {
    fn category(&self) -> Option<Category> {
        Category::from_name(self)
    }
}

impl BucketKey for &str {
    fn category(&self) -> Option<Category> {
        Category::from_name(self)
    }
}

/// Items whose category name is not in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Uncategorized<T> {
    pub items: Vec<T>,
}

pub struct OutfitCategorizer {
    display_order: Vec<Category>,
}

impl Default for OutfitCategorizer {
    fn default() -> Self {
        Self::new(DISPLAY_ORDER.to_vec())
    }
}

impl OutfitCategorizer {
    pub fn new(display_order: Vec<Category>) -> Self {
        Self { display_order }
    }

    pub fn display_order(&self) -> &[Category] {
        &self.display_order
    }

    /// Groups items by category. Every registry category is present in the
    /// result; items with unknown category names are dropped.
    pub fn categorize<T: Categorized>(&self, items: impl IntoIterator<Item = T>) -> CategoryBuckets<T> {
        let (buckets, unknown) = self.categorize_with_unknown(items);
        if !unknown.items.is_empty() {
            tracing::debug!(
                dropped = unknown.items.len(),
                "Dropped items with unknown category names"
            );
        }
        buckets
    }

    /// Same as [`Self::categorize`] but hands back the dropped items.
    pub fn categorize_with_unknown<T: Categorized>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> (CategoryBuckets<T>, Uncategorized<T>) {
        let mut buckets: CategoryBuckets<T> = Category::all().map(|c| (c, Vec::new())).collect();
        let mut unknown = Vec::new();

        for item in items {
            match Category::from_name(item.category_name()) {
                Some(category) => {
                    if let Some(bucket) = buckets.get_mut(&category) {
                        bucket.push(item);
                    }
                }
                None => unknown.push(item),
            }
        }

        (buckets, Uncategorized { items: unknown })
    }

    /// Re-emits the mapping's keys in display order, then any other keys in
    /// their original order. Keys absent from the mapping are not added.
    pub fn sort_by_display_order<K, V>(&self, mut mapping: IndexMap<K, V>) -> IndexMap<K, V>
    where
        K: BucketKey + Hash + Eq,
    {
        let mut sorted = IndexMap::with_capacity(mapping.len());

        for category in &self.display_order {
            let position = mapping
                .keys()
                .position(|key| key.category() == Some(*category));
            if let Some((key, value)) = position.and_then(|idx| mapping.shift_remove_index(idx)) {
                sorted.insert(key, value);
            }
        }

        // shift_remove keeps the leftovers in encounter order
        sorted.extend(mapping);
        sorted
    }

    /// Display-ordered categories with no entry or an empty bucket.
    pub fn missing_categories<K, T>(&self, mapping: &IndexMap<K, Vec<T>>) -> Vec<Category>
    where
        K: BucketKey + Hash + Eq,
    {
        self.display_order
            .iter()
            .copied()
            .filter(|category| {
                !mapping
                    .iter()
                    .any(|(key, items)| key.category() == Some(*category) && !items.is_empty())
            })
            .collect()
    }
}

/// [`OutfitCategorizer::categorize`] with the default display order.
pub fn categorize<T: Categorized>(items: impl IntoIterator<Item = T>) -> CategoryBuckets<T> {
    OutfitCategorizer::default().categorize(items)
}

/// [`OutfitCategorizer::sort_by_display_order`] with the default display order.
pub fn sort_by_display_order<K, V>(mapping: IndexMap<K, V>) -> IndexMap<K, V>
where
    K: BucketKey + Hash + Eq,
{
    OutfitCategorizer::default().sort_by_display_order(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestItem {
        name: &'static str,
        category: &'static str,
    }

    impl Categorized for TestItem {
        fn category_name(&self) -> &str {
            self.category
        }
    }

    fn item(name: &'static str, category: &'static str) -> TestItem {
        TestItem { name, category }
    }

    #[test]
    fn test_categorize_keeps_every_registry_key() {
        let result = categorize(vec![item("shoes", "Sneaker")]);

        assert_eq!(result.len(), 10);
        assert_eq!(result[&Category::Sneaker].len(), 1);
        assert!(result[&Category::Coat].is_empty());
        assert!(result[&Category::Bag].is_empty());
        assert!(result[&Category::AnkleBoot].is_empty());
    }

    #[test]
    fn test_categorize_preserves_input_order_within_bucket() {
        let items = vec![
            item("white", "Sneaker"),
            item("parka", "Coat"),
            item("black", "Sneaker"),
        ];
        let result = categorize(items.clone());

        assert_eq!(result[&Category::Sneaker], vec![items[0].clone(), items[2].clone()]);
        assert_eq!(result[&Category::Coat], vec![items[1].clone()]);
        let non_empty = result.values().filter(|b| !b.is_empty()).count();
        assert_eq!(non_empty, 2);
    }

    #[test]
    fn test_categorize_uses_registry_key_order() {
        let result = categorize(Vec::<TestItem>::new());
        let keys: Vec<Category> = result.keys().copied().collect();
        let registry: Vec<Category> = Category::all().collect();
        assert_eq!(keys, registry);
    }

    #[test]
    fn test_unknown_categories_are_dropped() {
        let categorizer = OutfitCategorizer::default();
        let (buckets, unknown) =
            categorizer.categorize_with_unknown(vec![item("cap", "Hat"), item("tee", "T-shirt/top")]);

        assert_eq!(buckets[&Category::TShirtTop].len(), 1);
        assert_eq!(buckets.values().map(Vec::len).sum::<usize>(), 1);
        assert_eq!(unknown.items, vec![item("cap", "Hat")]);
    }

    #[test]
    fn test_sort_puts_priority_keys_first() {
        let mut mapping: IndexMap<String, u32> = IndexMap::new();
        mapping.insert("Bag".to_string(), 1);
        mapping.insert("Scarf".to_string(), 2);
        mapping.insert("Trouser".to_string(), 3);
        mapping.insert("Dress".to_string(), 4);
        mapping.insert("Coat".to_string(), 5);

        let sorted = sort_by_display_order(mapping);
        let keys: Vec<&str> = sorted.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Coat", "Trouser", "Bag", "Scarf", "Dress"]);
        assert_eq!(sorted["Coat"], 5);
    }

    #[test]
    fn test_sort_does_not_invent_keys() {
        let mut mapping: IndexMap<Category, Vec<u32>> = IndexMap::new();
        mapping.insert(Category::Sneaker, vec![1]);

        let sorted = sort_by_display_order(mapping);
        assert_eq!(sorted.len(), 1);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let buckets = categorize(vec![item("a", "Sneaker"), item("b", "Dress")]);
        let once = sort_by_display_order(buckets);
        let first: Vec<Category> = once.keys().copied().collect();
        let twice = sort_by_display_order(once);
        let second: Vec<Category> = twice.keys().copied().collect();

        assert_eq!(first, second);
        assert_eq!(first.first(), Some(&Category::Coat));
        assert_eq!(first.last(), Some(&Category::Dress));
    }

    #[test]
    fn test_missing_categories() {
        let buckets = categorize(vec![item("a", "Coat"), item("b", "Sneaker")]);
        let missing = OutfitCategorizer::default().missing_categories(&buckets);

        assert!(!missing.contains(&Category::Coat));
        assert!(!missing.contains(&Category::Sneaker));
        assert_eq!(missing.first(), Some(&Category::Pullover));
        assert_eq!(missing.len(), DISPLAY_ORDER.len() - 2);
    }

    #[test]
    fn test_custom_display_order() {
        let categorizer = OutfitCategorizer::new(vec![Category::Bag, Category::Coat]);
        let buckets = categorizer.categorize(vec![item("x", "Coat")]);
        let sorted = categorizer.sort_by_display_order(buckets);
        let keys: Vec<Category> = sorted.keys().copied().take(3).collect();
        assert_eq!(keys, vec![Category::Bag, Category::Coat, Category::TShirtTop]);
    }
}

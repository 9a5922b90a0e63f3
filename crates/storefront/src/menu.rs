//! Menu assembly for browsing by category.

use dine_core::{
    Category, CategoryFilter, CategoryRef, FoodTypeFilter, ItemId, MenuItem, Restaurant,
};

/// Outcome of loading a restaurant's menu.
#[derive(Debug, Clone)]
pub enum MenuPage {
    /// The organization service does not know the restaurant.
    NotFound,
    Ready(Menu),
}

/// A restaurant with its categories and items.
#[derive(Debug, Clone)]
pub struct Menu {
    restaurant: Restaurant,
    categories: Vec<Category>,
    items: Vec<MenuItem>,
}

/// Items of one category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection<'a> {
    /// Section heading.
    pub title: &'a str,
    /// The listed category, or `None` for items whose category is not in the
    /// restaurant's category list.
    pub category: Option<&'a Category>,
    pub items: Vec<&'a MenuItem>,
}

impl Menu {
    #[must_use]
    pub const fn new(restaurant: Restaurant, categories: Vec<Category>, items: Vec<MenuItem>) -> Self {
        Self {
            restaurant,
            categories,
            items,
        }
    }

    #[must_use]
    pub const fn restaurant(&self) -> &Restaurant {
        &self.restaurant
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Every item, including disabled ones.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Look up an item by id. Feeds cart line creation.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Resolve a category selection against this menu's categories.
    #[must_use]
    pub fn category_filter(&self, selection: Option<&str>) -> Option<CategoryFilter> {
        CategoryFilter::resolve(&self.categories, selection)
    }

    /// Enabled items grouped into sections.
    ///
    /// Sections follow the category list order and empty sections are
    /// dropped. Items whose category is not listed get sections of their own
    /// after the listed ones, in the order they first appear.
    #[must_use]
    pub fn sections(&self, category: &CategoryFilter, food: FoodTypeFilter) -> Vec<MenuSection<'_>> {
        let visible = self
            .items
            .iter()
            .filter(|item| item.enabled && category.matches(item) && food.matches(item));

        let mut sections: Vec<MenuSection<'_>> = self
            .categories
            .iter()
            .map(|c| MenuSection {
                title: &c.name,
                category: Some(c),
                items: Vec::new(),
            })
            .collect();
        let mut unlisted: Vec<(&CategoryRef, Vec<&MenuItem>)> = Vec::new();

        for item in visible {
            if let Some(section) = sections
                .iter_mut()
                .find(|s| s.category.is_some_and(|c| c.contains(&item.category)))
            {
                section.items.push(item);
            } else if let Some((_, items)) = unlisted
                .iter_mut()
                .find(|(c, _)| c.name.trim() == item.category.name.trim())
            {
                items.push(item);
            } else {
                unlisted.push((&item.category, vec![item]));
            }
        }

        sections.extend(unlisted.into_iter().map(|(c, items)| MenuSection {
            title: &c.name,
            category: None,
            items,
        }));
        sections.retain(|s| !s.items.is_empty());
        sections
    }

    /// Enabled items whose name or description contains `query`
    /// (case-insensitive).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.items
            .iter()
            .filter(|item| item.enabled)
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

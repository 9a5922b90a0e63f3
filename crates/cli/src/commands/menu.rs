//! Public menu commands.

use std::str::FromStr;

use dine_core::{
    CartKeyStore, CurrencyCode, FoodTypeFilter, ItemId, MenuItem, Price, RestaurantId,
    VariantSelector,
};
use dine_storefront::{BasketView, CatalogClient, CatalogError, Menu, MenuPage, StorefrontConfig};
use thiserror::Error;

/// Errors from menu commands.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error(transparent)]
    Config(#[from] dine_storefront::ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),
}

/// One `--add` argument: `ITEM[@TYPE[:VALUE]][*COUNT]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    pub item_id: ItemId,
    pub variant: Option<VariantSelector>,
    pub delta: i32,
}

impl FromStr for LineSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, delta) = match s.rsplit_once('*') {
            Some((rest, count)) => (
                rest,
                count
                    .trim()
                    .parse::<i32>()
                    .map_err(|e| format!("invalid count '{count}': {e}"))?,
            ),
            None => (s, 1),
        };

        let (item, variant) = match rest.split_once('@') {
            Some((item, variant)) => {
                let (quantity_type, quantity_value) =
                    variant.split_once(':').unwrap_or((variant, ""));
                if quantity_type.trim().is_empty() {
                    return Err(format!("missing quantity type in '{s}'"));
                }
                (
                    item,
                    Some(VariantSelector::new(quantity_type.trim(), quantity_value.trim())),
                )
            }
            None => (rest, None),
        };

        let item = item.trim();
        if item.is_empty() {
            return Err(format!("missing item id in '{s}'"));
        }

        Ok(Self {
            item_id: ItemId::new(item),
            variant,
            delta,
        })
    }
}

async fn load(restaurant_id: &str) -> Result<(Menu, CurrencyCode), MenuError> {
    let config = StorefrontConfig::from_env()?;
    let client = CatalogClient::new(&config)?;

    match client.load_menu(&RestaurantId::new(restaurant_id)).await? {
        MenuPage::Ready(menu) => Ok((menu, config.currency)),
        MenuPage::NotFound => Err(MenuError::RestaurantNotFound(restaurant_id.to_string())),
    }
}

/// Print a restaurant's menu by section, or the results of a search.
pub async fn show(
    restaurant_id: &str,
    category: Option<&str>,
    food: FoodTypeFilter,
    search: Option<&str>,
) -> Result<(), MenuError> {
    let (menu, currency) = load(restaurant_id).await?;

    let restaurant = menu.restaurant();
    println!("{}", restaurant.name);
    if let Some(description) = &restaurant.description {
        println!("{description}");
    }

    if let Some(query) = search {
        let results = menu.search(query);
        if results.is_empty() {
            println!("\nNo items match '{query}'");
        }
        for item in results {
            print_item(item, currency);
        }
        return Ok(());
    }

    let filter = menu
        .category_filter(category)
        .ok_or_else(|| MenuError::UnknownCategory(category.unwrap_or_default().to_string()))?;

    let sections = menu.sections(&filter, food);
    if sections.is_empty() {
        println!("\nNothing on the menu for this selection");
    }
    for section in sections {
        println!("\n== {} ==", section.title);
        for item in section.items {
            print_item(item, currency);
        }
    }
    Ok(())
}

fn print_item(item: &MenuItem, currency: CurrencyCode) {
    let from = item
        .starting_price()
        .map_or_else(|| "-".to_string(), |p| Price::new(p, currency).to_string());
    println!("  {} [{}] {}  from {from}", item.name, item.id, item.food_type);

    for variant in &item.variants {
        let label = if variant.quantity_type.is_unit() {
            variant.quantity_type.to_string()
        } else {
            format!("{} {}", variant.quantity_value, variant.quantity_type)
        };
        let price = Price::new(variant.effective_price(), currency);
        if variant.on_sale() {
            println!(
                "      {label}: {price} (was {})",
                Price::new(variant.list_price, currency)
            );
        } else {
            println!("      {label}: {price}");
        }
    }
}

/// Build a basket from `lines` (applied in order) and print it.
pub async fn basket(
    restaurant_id: &str,
    lines: &[LineSpec],
    remove_at: Option<usize>,
) -> Result<(), MenuError> {
    let (menu, currency) = load(restaurant_id).await?;
    let cart = build_cart(&menu, lines, remove_at)?;
    let view = BasketView::new(&cart, currency);

    if view.lines.is_empty() {
        println!("Basket is empty");
        return Ok(());
    }

    for line in &view.lines {
        let title = line.variant_title.as_ref().map_or_else(
            || line.title.clone(),
            |variant| format!("{} ({variant})", line.title),
        );
        println!(
            "{:>3}. {title}  {} x {} = {}",
            line.index, line.quantity, line.price, line.line_price
        );
    }
    println!("{} item(s), subtotal {}", view.item_count, view.subtotal);
    Ok(())
}

fn build_cart(
    menu: &Menu,
    lines: &[LineSpec],
    remove_at: Option<usize>,
) -> Result<CartKeyStore, MenuError> {
    let mut cart = CartKeyStore::new();
    for line in lines {
        if menu.item(&line.item_id).is_none() {
            return Err(MenuError::UnknownItem(line.item_id.to_string()));
        }
        cart.adjust(&line.item_id, line.variant.as_ref(), line.delta, |id| {
            menu.item(id)
        });
    }
    if let Some(index) = remove_at {
        cart.remove_at(index);
    }
    Ok(cart)
}

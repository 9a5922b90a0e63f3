//! Menu item commands.

use dine_core::{CategoryFilter, ItemId, ItemStatus, RestaurantId, StatusFilter};
use dine_admin::ItemTable;

use super::{Staff, StaffError};

async fn load_table(staff: &mut Staff, restaurant_id: &str) -> Result<ItemTable, StaffError> {
    let bearer = staff.bearer().await?;
    let loaded = ItemTable::load(&staff.client, &bearer, &RestaurantId::new(restaurant_id)).await;
    staff.checked(loaded)
}

/// Print one page of a restaurant's items.
pub async fn list(
    restaurant_id: &str,
    status: StatusFilter,
    category: Option<&str>,
    page: usize,
    per_page: usize,
) -> Result<(), StaffError> {
    let mut staff = Staff::connect().await?;
    let mut table = load_table(&mut staff, restaurant_id).await?;

    let category_filter = CategoryFilter::resolve(table.categories(), category)
        .ok_or_else(|| StaffError::UnknownCategory(category.unwrap_or_default().to_string()))?;
    table.set_category_filter(category_filter);
    table.set_status_filter(status);
    table.set_per_page(per_page);

    let page = table.page(page);
    for item in &page.rows {
        let price = item
            .starting_price()
            .map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
        println!(
            "{:<12} {:<32} {:<16} {:<8} {:>10}  {}",
            item.id,
            item.name,
            item.category.name,
            item.food_type,
            price,
            status_label(item.status())
        );
    }
    println!(
        "Page {}/{} ({} matching items)",
        page.number, page.total_pages, page.total_rows
    );
    Ok(())
}

/// Flip an item's availability.
pub async fn toggle(restaurant_id: &str, item_id: &str) -> Result<(), StaffError> {
    let mut staff = Staff::connect().await?;
    let mut table = load_table(&mut staff, restaurant_id).await?;

    let Staff { client, session } = &mut staff;
    let status = table.toggle(client, session, &ItemId::new(item_id)).await?;
    println!("{item_id} is now {}", status_label(status));
    Ok(())
}

/// Delete an item.
pub async fn delete(restaurant_id: &str, item_id: &str) -> Result<(), StaffError> {
    let mut staff = Staff::connect().await?;
    let mut table = load_table(&mut staff, restaurant_id).await?;

    let Staff { client, session } = &mut staff;
    table.delete(client, session, &ItemId::new(item_id)).await?;
    println!("Deleted {item_id}");
    Ok(())
}

const fn status_label(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Enabled => "enabled",
        ItemStatus::Disabled => "disabled",
    }
}

//! Menu category commands.

use dine_core::{CategoryDraft, CategoryId, RestaurantId};

use super::{Staff, StaffError};

/// Print a restaurant's categories.
pub async fn list(restaurant_id: &str) -> Result<(), StaffError> {
    let mut staff = Staff::connect().await?;
    let bearer = staff.bearer().await?;
    let categories = staff
        .client
        .categories(&bearer, &RestaurantId::new(restaurant_id))
        .await;

    for category in staff.checked(categories)? {
        println!("{:<12} {}", category.id, category.name);
    }
    Ok(())
}

/// Create a category.
pub async fn add(restaurant_id: &str, name: &str) -> Result<(), StaffError> {
    let mut staff = Staff::connect().await?;
    let bearer = staff.bearer().await?;
    let draft = CategoryDraft {
        restaurant_id: RestaurantId::new(restaurant_id),
        name: name.trim().to_string(),
    };
    let created = staff.client.create_category(&bearer, &draft).await;

    let category = staff.checked(created)?;
    println!("Created {} ({})", category.name, category.id);
    Ok(())
}

/// Rename a category.
pub async fn rename(restaurant_id: &str, category_id: &str, name: &str) -> Result<(), StaffError> {
    let mut staff = Staff::connect().await?;
    let bearer = staff.bearer().await?;
    let draft = CategoryDraft {
        restaurant_id: RestaurantId::new(restaurant_id),
        name: name.trim().to_string(),
    };
    let renamed = staff
        .client
        .rename_category(&bearer, &CategoryId::new(category_id), &draft)
        .await;

    let category = staff.checked(renamed)?;
    println!("Renamed {} to {}", category.id, category.name);
    Ok(())
}

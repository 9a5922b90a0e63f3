//! Restaurant commands (super admin).

use dine_core::{Restaurant, RestaurantId};

use super::{Staff, StaffError};

/// Print every restaurant.
pub async fn list() -> Result<(), StaffError> {
    let mut staff = Staff::connect().await?;
    let bearer = staff.bearer().await?;
    let restaurants = staff.client.restaurants(&bearer).await;

    for restaurant in staff.checked(restaurants)? {
        println!("{:<12} {}", restaurant.id, restaurant.name);
    }
    Ok(())
}

/// Print one restaurant's details.
pub async fn show(id: &str) -> Result<(), StaffError> {
    let mut staff = Staff::connect().await?;
    let bearer = staff.bearer().await?;
    let restaurant = staff.client.restaurant(&bearer, &RestaurantId::new(id)).await;

    let restaurant = staff
        .checked(restaurant)?
        .ok_or_else(|| StaffError::NotFound(format!("restaurant {id}")))?;
    print_restaurant(&restaurant);
    Ok(())
}

fn print_restaurant(restaurant: &Restaurant) {
    println!("{} ({})", restaurant.name, restaurant.id);
    for (label, value) in [
        ("Description", &restaurant.description),
        ("Address", &restaurant.address),
        ("Phone", &restaurant.phone),
    ] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
}

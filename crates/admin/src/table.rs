//! Admin item table: filtering, pagination and inline actions.

use dine_core::{
    Category, CategoryFilter, ItemId, ItemStatus, MenuItem, RestaurantId, StatusFilter, paginate,
};
use tracing::{info, instrument, warn};

use crate::auth::{AuthApi, Bearer, Clock, SessionManager, SessionStore};
use crate::client::AdminClient;
use crate::error::AdminError;
use crate::optimistic::with_optimistic_update;

/// Rows per page unless configured otherwise.
pub const DEFAULT_PER_PAGE: usize = 10;

/// One page of table rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a MenuItem>,
    /// 1-based page number actually served.
    pub number: usize,
    pub total_pages: usize,
    /// Rows matching the filters, across all pages.
    pub total_rows: usize,
}

/// A restaurant's items as shown in the admin dashboard.
#[derive(Debug, Clone)]
pub struct ItemTable {
    restaurant_id: RestaurantId,
    items: Vec<MenuItem>,
    categories: Vec<Category>,
    status_filter: StatusFilter,
    category_filter: CategoryFilter,
    per_page: usize,
}

impl ItemTable {
    #[must_use]
    pub const fn new(
        restaurant_id: RestaurantId,
        items: Vec<MenuItem>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            restaurant_id,
            items,
            categories,
            status_filter: StatusFilter::All,
            category_filter: CategoryFilter::All,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Fetch a restaurant's items and categories concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip(client, bearer), fields(restaurant_id = %restaurant_id))]
    pub async fn load(
        client: &AdminClient,
        bearer: &Bearer,
        restaurant_id: &RestaurantId,
    ) -> Result<Self, AdminError> {
        let (items, categories) = tokio::try_join!(
            client.items(bearer, restaurant_id),
            client.categories(bearer, restaurant_id)
        )?;
        Ok(Self::new(restaurant_id.clone(), items, categories))
    }

    #[must_use]
    pub const fn restaurant_id(&self) -> &RestaurantId {
        &self.restaurant_id
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.category_filter = filter;
    }

    /// Rows per page; 0 is treated as 1.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
    }

    /// Items passing both filters, in fetched order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| self.status_filter.matches(item) && self.category_filter.matches(item))
            .collect()
    }

    /// Page `number` (1-based, clamped) of the filtered rows.
    #[must_use]
    pub fn page(&self, number: usize) -> TablePage<'_> {
        let filtered = self.filtered();
        let page = paginate(&filtered, number, self.per_page);
        TablePage {
            rows: page.items.to_vec(),
            number: page.number,
            total_pages: page.total_pages,
            total_rows: page.total_items,
        }
    }

    /// Flip an item's availability.
    ///
    /// The row changes at once and is restored if the request fails. An
    /// HTTP 401 signs the session out.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an item not in the table, or the
    /// credential/request error.
    #[instrument(skip(self, client, session), fields(item_id = %id))]
    pub async fn toggle<A, S, C>(
        &mut self,
        client: &AdminClient,
        session: &mut SessionManager<A, S, C>,
        id: &ItemId,
    ) -> Result<ItemStatus, AdminError>
    where
        A: AuthApi,
        S: SessionStore,
        C: Clock,
    {
        let next = self
            .item(id)
            .map(|item| item.status().toggled())
            .ok_or_else(|| AdminError::NotFound(format!("item {id}")))?;
        let bearer = session.bearer().await?;

        let enabled = next.is_enabled();
        let bearer = &bearer;
        let result = with_optimistic_update(
            &mut self.items,
            |items| {
                if let Some(item) = items.iter_mut().find(|item| &item.id == id) {
                    item.enabled = enabled;
                }
            },
            move || client.set_item_enabled(bearer, id, enabled),
        )
        .await;

        match result {
            Ok(()) => {
                info!(status = ?next, "Item availability changed");
                Ok(next)
            }
            Err(e) => Err(sign_out_if_unauthorized(session, e)),
        }
    }

    /// Delete an item, removing its row at once and restoring it if the
    /// request fails.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an item not in the table or
    /// already gone on the server, or the credential/request error.
    #[instrument(skip(self, client, session), fields(item_id = %id))]
    pub async fn delete<A, S, C>(
        &mut self,
        client: &AdminClient,
        session: &mut SessionManager<A, S, C>,
        id: &ItemId,
    ) -> Result<(), AdminError>
    where
        A: AuthApi,
        S: SessionStore,
        C: Clock,
    {
        if self.item(id).is_none() {
            return Err(AdminError::NotFound(format!("item {id}")));
        }
        let bearer = session.bearer().await?;

        let bearer = &bearer;
        let result = with_optimistic_update(
            &mut self.items,
            |items| items.retain(|item| &item.id != id),
            move || async move {
                if client.delete_item(bearer, id).await? {
                    Ok(())
                } else {
                    Err(AdminError::NotFound(format!("item {id}")))
                }
            },
        )
        .await;

        result.map_err(|e| sign_out_if_unauthorized(session, e))
    }
}

fn sign_out_if_unauthorized<A, S, C>(
    session: &mut SessionManager<A, S, C>,
    error: AdminError,
) -> AdminError
where
    A: AuthApi,
    S: SessionStore,
    C: Clock,
{
    if error.is_unauthorized() {
        warn!("Access token rejected, signing out");
        session.logout();
    }
    error
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dine_core::{CategoryId, CategoryRef, FoodType};

    use super::*;

    fn item(id: &str, category: &str, enabled: bool) -> MenuItem {
        MenuItem {
            id: ItemId::new(id),
            name: format!("Item {id}"),
            description: None,
            image_urls: vec![],
            category: CategoryRef {
                id: Some(CategoryId::new(category)),
                name: category.to_uppercase(),
            },
            food_type: FoodType::Veg,
            variants: vec![],
            enabled,
        }
    }

    fn table() -> ItemTable {
        let items = (1..=25)
            .map(|n| item(&n.to_string(), if n % 2 == 0 { "mains" } else { "drinks" }, n % 5 != 0))
            .collect();
        let categories = vec![
            Category {
                id: CategoryId::new("mains"),
                name: "MAINS".to_string(),
            },
            Category {
                id: CategoryId::new("drinks"),
                name: "DRINKS".to_string(),
            },
        ];
        ItemTable::new(RestaurantId::new("r-1"), items, categories)
    }

    #[test]
    fn test_pages_unfiltered() {
        let table = table();
        let first = table.page(1);
        assert_eq!(first.rows.len(), DEFAULT_PER_PAGE);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_rows, 25);

        let last = table.page(99);
        assert_eq!(last.number, 3);
        assert_eq!(last.rows.len(), 5);
        assert_eq!(last.rows[0].id.as_str(), "21");
    }

    #[test]
    fn test_status_filter() {
        let mut table = table();
        table.set_status_filter(StatusFilter::Only(ItemStatus::Disabled));
        let ids: Vec<&str> = table.filtered().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "10", "15", "20", "25"]);
    }

    #[test]
    fn test_category_and_status_filters_combine() {
        let mut table = table();
        let mains = CategoryFilter::resolve(table.categories(), Some("mains")).unwrap();
        table.set_category_filter(mains);
        table.set_status_filter(StatusFilter::Only(ItemStatus::Enabled));
        table.set_per_page(4);

        let page = table.page(1);
        assert_eq!(page.total_rows, 10);
        assert_eq!(page.total_pages, 3);
        let ids: Vec<&str> = page.rows.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "6", "8"]);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let table = ItemTable::new(RestaurantId::new("r-1"), vec![], vec![]);
        let page = table.page(0);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.rows.is_empty());
    }
}

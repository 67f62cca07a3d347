//! Cart Service
//!
//! Carts are stored without prices (`cart:{userId}`); every read prices the
//! items from the catalog and recomputes the total.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use shared::{Validate, ValidationError, checked_total};
use shared::models::{Cart, CartItem, CartItemRequest, CartQuantityRequest, CartUpdateRequest};
use sidecar_client::{Deadline, SidecarClient};

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};

/// Persisted form of a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCart {
    user_id: String,
    items: Vec<CartItemRequest>,
    updated_at: DateTime<Utc>,
}

impl StoredCart {
    fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn state_key(user_id: &str) -> String {
    format!("cart:{user_id}")
}

#[derive(Debug, Clone)]
pub struct CartService {
    client: SidecarClient,
    store_name: String,
    catalog: CatalogClient,
}

impl CartService {
    pub fn new(client: SidecarClient, catalog: CatalogClient, config: &Config) -> Self {
        Self {
            client,
            store_name: config.cart_state_store.clone(),
            catalog,
        }
    }

    async fn load(&self, user_id: &str) -> ServiceResult<StoredCart> {
        let key = state_key(user_id);
        if let Some(cart) = self
            .client
            .get_state::<StoredCart>(&self.store_name, &key, Deadline::Default)
            .await?
        {
            return Ok(cart);
        }

        let cart = StoredCart::empty(user_id);
        self.persist(&cart).await?;
        Ok(cart)
    }

    async fn persist(&self, cart: &StoredCart) -> ServiceResult<()> {
        self.client
            .save_state(
                &self.store_name,
                &state_key(&cart.user_id),
                cart,
                Deadline::Default,
            )
            .await?;
        Ok(())
    }

    async fn price_item(&self, item: &CartItemRequest) -> ServiceResult<CartItem> {
        let book = self
            .catalog
            .fetch_book(&item.book_id)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(&item.book_id))?;
        Ok(CartItem {
            book_id: item.book_id.clone(),
            quantity: item.quantity,
            unit_price: Some(book.price),
        })
    }

    async fn enrich(&self, cart: StoredCart) -> ServiceResult<Cart> {
        let items = try_join_all(cart.items.iter().map(|item| self.price_item(item))).await?;
        let total_amount = checked_total(
            items
                .iter()
                .map(|item| (item.unit_price.unwrap_or_default(), item.quantity)),
            "totalAmount",
        )?;

        Ok(Cart {
            user_id: cart.user_id,
            items,
            total_amount,
            updated_at: cart.updated_at,
        })
    }

    /// Current cart, created empty on first access
    pub async fn get_cart(&self, user_id: &str) -> ServiceResult<Cart> {
        let cart = self.load(user_id).await?;
        self.enrich(cart).await
    }

    /// Replace every item
    pub async fn replace_cart(
        &self,
        user_id: &str,
        request: CartUpdateRequest,
    ) -> ServiceResult<Cart> {
        request.validate()?;
        let mut cart = self.load(user_id).await?;
        cart.items = request.items;
        cart.touch();
        self.persist(&cart).await?;
        self.enrich(cart).await
    }

    /// Add an item, merging quantities with an existing line for the same book
    pub async fn add_item(&self, user_id: &str, request: CartItemRequest) -> ServiceResult<Cart> {
        request.validate()?;
        let mut cart = self.load(user_id).await?;
        match cart
            .items
            .iter_mut()
            .find(|item| item.book_id == request.book_id)
        {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(request.quantity)
                    .ok_or_else(|| ValidationError::new("quantity", "is too large"))?;
            }
            None => cart.items.push(request),
        }
        cart.touch();
        self.persist(&cart).await?;
        self.enrich(cart).await
    }

    pub async fn update_item_quantity(
        &self,
        user_id: &str,
        book_id: &str,
        request: CartQuantityRequest,
    ) -> ServiceResult<Cart> {
        request.validate()?;
        let mut cart = self.load(user_id).await?;
        let item = cart
            .items
            .iter_mut()
            .find(|item| item.book_id == book_id)
            .ok_or_else(|| ServiceError::not_found(format!("Cart item {book_id} not found")))?;
        item.quantity = request.quantity;
        cart.touch();
        self.persist(&cart).await?;
        self.enrich(cart).await
    }

    pub async fn remove_item(&self, user_id: &str, book_id: &str) -> ServiceResult<()> {
        let mut cart = self.load(user_id).await?;
        let before = cart.items.len();
        cart.items.retain(|item| item.book_id != book_id);
        if cart.items.len() == before {
            return Err(ServiceError::not_found(format!(
                "Cart item {book_id} not found"
            )));
        }
        cart.touch();
        self.persist(&cart).await
    }

    /// Delete the cart entry; the next read starts empty
    pub async fn clear_cart(&self, user_id: &str) -> ServiceResult<()> {
        self.client
            .delete_state(&self.store_name, &state_key(user_id), Deadline::Default)
            .await?;
        Ok(())
    }
}

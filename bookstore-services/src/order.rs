//! Order Service
//!
//! Orders live under `order:{id}`. Creation and status changes publish
//! `orders.created` and `orders.status-changed` on the order pub/sub.

use chrono::Utc;
use futures::future::try_join_all;
use shared::{Validate, checked_total};
use shared::models::{
    CreateOrderItem, CreateOrderRequest, Order, OrderCreatedEvent, OrderItem, OrderStatus,
    OrderStatusChangeRequest, OrderStatusChangedEvent, Payment,
};
use sidecar_client::{Deadline, SidecarClient};

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};

pub const TOPIC_ORDER_CREATED: &str = "orders.created";
pub const TOPIC_ORDER_STATUS_CHANGED: &str = "orders.status-changed";

fn state_key(order_id: &str) -> String {
    format!("order:{order_id}")
}

#[derive(Debug, Clone)]
pub struct OrderService {
    client: SidecarClient,
    store_name: String,
    pubsub_name: String,
    catalog: CatalogClient,
}

impl OrderService {
    pub fn new(client: SidecarClient, catalog: CatalogClient, config: &Config) -> Self {
        Self {
            client,
            store_name: config.order_state_store.clone(),
            pubsub_name: config.order_pubsub_name.clone(),
            catalog,
        }
    }

    async fn price_item(&self, item: &CreateOrderItem) -> ServiceResult<OrderItem> {
        let book = self
            .catalog
            .fetch_book(&item.book_id)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(&item.book_id))?;
        Ok(OrderItem {
            book_id: book.id,
            quantity: item.quantity,
            unit_price: book.price,
        })
    }

    async fn save(&self, order: &Order) -> ServiceResult<()> {
        self.client
            .save_state(
                &self.store_name,
                &state_key(&order.id),
                order,
                Deadline::Default,
            )
            .await?;
        Ok(())
    }

    /// Price the items, store a pending order and announce it
    pub async fn create_order(&self, request: CreateOrderRequest) -> ServiceResult<Order> {
        request.validate()?;

        let items = try_join_all(request.items.iter().map(|item| self.price_item(item))).await?;
        let total_amount = checked_total(
            items.iter().map(|item| (item.unit_price, item.quantity)),
            "totalAmount",
        )?;

        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: request.user_id,
            items,
            total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            payment: Payment::authorize_card(&request.payment_token),
            shipping_address: request.shipping_address,
            memo: request.memo,
        };

        self.save(&order).await?;
        self.client
            .publish_event(
                &self.pubsub_name,
                TOPIC_ORDER_CREATED,
                &OrderCreatedEvent::from(&order),
                Deadline::Default,
            )
            .await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = %order.total_amount,
            "Order created"
        );
        Ok(order)
    }

    pub async fn get_order(&self, order_id: &str) -> ServiceResult<Option<Order>> {
        let order = self
            .client
            .get_state(&self.store_name, &state_key(order_id), Deadline::Default)
            .await?;
        Ok(order)
    }

    /// Change the status and announce the transition
    pub async fn update_order_status(
        &self,
        order_id: &str,
        request: OrderStatusChangeRequest,
    ) -> ServiceResult<Order> {
        let existing = self
            .get_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Order {order_id} not found")))?;

        let previous_status = existing.status;
        let updated = Order {
            status: request.status,
            ..existing
        };

        self.save(&updated).await?;
        self.client
            .publish_event(
                &self.pubsub_name,
                TOPIC_ORDER_STATUS_CHANGED,
                &OrderStatusChangedEvent {
                    order_id: updated.id.clone(),
                    previous_status,
                    status: updated.status,
                    updated_at: Utc::now(),
                },
                Deadline::Default,
            )
            .await?;

        tracing::info!(
            order_id,
            from = ?previous_status,
            to = ?updated.status,
            "Order status changed"
        );
        Ok(updated)
    }

    pub async fn delete_order(&self, order_id: &str) -> ServiceResult<()> {
        self.client
            .delete_state(&self.store_name, &state_key(order_id), Deadline::Default)
            .await?;
        Ok(())
    }
}

//! Order Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate, OrderStatus};
use crate::orders::lifecycle::Transition;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new order
    ///
    /// Status always starts at Pending and `placed_at` is stamped here; a
    /// duplicate `order_id` surfaces as `Duplicate` either from the pre-check
    /// or from the unique index when creations race.
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        if self.find_by_order_id(&data.order_id, None).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Order '{}' already exists",
                data.order_id
            )));
        }

        let order_id = data.order_id.clone();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE order SET
                    order_id = $order_id,
                    customer_id = $customer_id,
                    customer_email = $customer_email,
                    customer_name = $customer_name,
                    vendor_id = $vendor_id,
                    shop_name = $shop_name,
                    items = $items,
                    total_amount = $total_amount,
                    delivery_address = $delivery_address,
                    payment_method = $payment_method,
                    payment_status = 'Pending',
                    customer_notes = $customer_notes,
                    status = 'Pending',
                    placed_at = $placed_at
                RETURN AFTER"#,
            )
            .bind(("order_id", data.order_id))
            .bind(("customer_id", data.customer_id))
            .bind(("customer_email", data.customer_email))
            .bind(("customer_name", data.customer_name))
            .bind(("vendor_id", data.vendor_id))
            .bind(("shop_name", data.shop_name))
            .bind(("items", data.items))
            .bind(("total_amount", data.total_amount))
            .bind(("delivery_address", data.delivery_address))
            .bind(("payment_method", data.payment_method))
            .bind(("customer_notes", data.customer_notes))
            .bind(("placed_at", shared::util::now_millis()))
            .await?;

        let created: Option<Order> = result.take(0).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("already contains") {
                RepoError::Duplicate(format!("Order '{}' already exists", order_id))
            } else {
                RepoError::Database(msg)
            }
        })?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find order by its external order_id, optionally scoped to a customer
    pub async fn find_by_order_id(
        &self,
        order_id: &str,
        customer_id: Option<RecordId>,
    ) -> RepoResult<Option<Order>> {
        let mut result = match customer_id {
            Some(customer) => {
                self.base
                    .db()
                    .query("SELECT * FROM order WHERE order_id = $order_id AND customer_id = $customer_id LIMIT 1")
                    .bind(("order_id", order_id.to_string()))
                    .bind(("customer_id", customer))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM order WHERE order_id = $order_id LIMIT 1")
                    .bind(("order_id", order_id.to_string()))
                    .await?
            }
        };
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Orders belonging to a vendor, newest first
    pub async fn find_by_vendor(&self, vendor_id: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE vendor_id = $vendor_id ORDER BY placed_at DESC LIMIT 100")
            .bind(("vendor_id", vendor_id.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders assigned to a delivery partner, newest first
    pub async fn find_by_partner(&self, partner_id: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE delivery_partner_id = $partner_id ORDER BY placed_at DESC LIMIT 50",
            )
            .bind(("partner_id", partner_id.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Apply a lifecycle transition as a compare-and-set on status
    ///
    /// The write only lands while the order still sits in `transition.from`;
    /// `None` means the precondition no longer held (or the record vanished),
    /// and the caller decides which of the two it was. Stamp columns come
    /// from the transition table, never from request input.
    pub async fn transition(
        &self,
        id: &RecordId,
        transition: &Transition,
        now: i64,
    ) -> RepoResult<Option<Order>> {
        let query = match transition.stamps {
            Some(stamp) => format!(
                "UPDATE $thing SET status = $to, {} = $now WHERE status = $from RETURN AFTER",
                stamp.column()
            ),
            None => {
                "UPDATE $thing SET status = $to WHERE status = $from RETURN AFTER".to_string()
            }
        };

        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("thing", id.clone()))
            .bind(("to", transition.to))
            .bind(("from", transition.from))
            .bind(("now", now))
            .await?;
        let updated: Option<Order> = result.take(0)?;
        Ok(updated)
    }

    /// Assign a delivery partner, atomically with the Ready → Assigned move
    ///
    /// Partner reference and status land in one statement so no reader can
    /// observe an Assigned order without its partner.
    pub async fn assign(
        &self,
        id: &RecordId,
        partner_id: RecordId,
        partner_name: String,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = $to,
                    delivery_partner_id = $partner_id,
                    delivery_partner_name = $partner_name
                WHERE status = $from RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("to", OrderStatus::Assigned))
            .bind(("from", OrderStatus::Ready))
            .bind(("partner_id", partner_id))
            .bind(("partner_name", partner_name))
            .await?;
        let updated: Option<Order> = result.take(0)?;
        Ok(updated)
    }
}

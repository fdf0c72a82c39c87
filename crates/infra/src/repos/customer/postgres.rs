use super::ICustomerRepo;
use serde_json::Value;
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use storefront_domain::{
    CartCandidate, CartItem, CartReminder, CartSnapshot, Customer, ReminderFlags, ID,
};
use tracing::error;

pub struct PostgresCustomerRepo {
    pool: PgPool,
}

impl PostgresCustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CustomerRaw {
    customer_uid: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    cart_items: Value,
    cart_snapshot_at: Option<i64>,
    cart_last_activity: Option<i64>,
    cart_reminder_1_sent: bool,
    cart_reminder_2_sent: bool,
    cart_reminder_3_sent: bool,
}

impl TryFrom<CustomerRaw> for Customer {
    type Error = anyhow::Error;

    fn try_from(e: CustomerRaw) -> anyhow::Result<Self> {
        let items: Vec<CartItem> = serde_json::from_value(e.cart_items)?;
        Ok(Self {
            id: e.customer_uid.into(),
            email: e.email,
            first_name: e.first_name,
            last_name: e.last_name,
            cart: CartSnapshot {
                items,
                snapshot_at: e.cart_snapshot_at,
                last_activity: e.cart_last_activity,
                sent: ReminderFlags {
                    reminder1: e.cart_reminder_1_sent,
                    reminder2: e.cart_reminder_2_sent,
                    reminder3: e.cart_reminder_3_sent,
                },
            },
        })
    }
}

const RESET_CART_COLUMNS: &str = r#"
    cart_items = '[]'::jsonb,
    cart_snapshot_at = NULL,
    cart_last_activity = NULL,
    cart_reminder_1_sent = FALSE,
    cart_reminder_2_sent = FALSE,
    cart_reminder_3_sent = FALSE
"#;

// Each reminder flag can only be set for the snapshot it was decided for and
// after the previous reminder in the sequence
fn set_reminder_sent_query(reminder: CartReminder) -> &'static str {
    match reminder {
        CartReminder::First => {
            r#"
            UPDATE customers
            SET cart_reminder_1_sent = TRUE
            WHERE customer_uid = $1 AND cart_snapshot_at = $2
            "#
        }
        CartReminder::Second => {
            r#"
            UPDATE customers
            SET cart_reminder_2_sent = TRUE
            WHERE customer_uid = $1 AND cart_snapshot_at = $2 AND cart_reminder_1_sent
            "#
        }
        CartReminder::Third => {
            r#"
            UPDATE customers
            SET cart_reminder_3_sent = TRUE
            WHERE customer_uid = $1 AND cart_snapshot_at = $2 AND cart_reminder_2_sent
            "#
        }
    }
}

fn into_customer(raw: CustomerRaw) -> Option<Customer> {
    let customer_uid = raw.customer_uid;
    Customer::try_from(raw)
        .map_err(|e| {
            error!(
                "Unable to read customer with id: {:?}. Stored cart is malformed: {:?}",
                customer_uid, e
            );
            e
        })
        .ok()
}

#[async_trait::async_trait]
impl ICustomerRepo for PostgresCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers(
                customer_uid, email, first_name, last_name,
                cart_items, cart_snapshot_at, cart_last_activity,
                cart_reminder_1_sent, cart_reminder_2_sent, cart_reminder_3_sent
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(customer.id.inner_ref())
        .bind(&customer.email)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(Json(&customer.cart.items))
        .bind(customer.cart.snapshot_at)
        .bind(customer.cart.last_activity)
        .bind(customer.cart.sent.reminder1)
        .bind(customer.cart.sent.reminder2)
        .bind(customer.cart.sent.reminder3)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert customer: {:?}. DB returned error: {:?}",
                customer, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        let res: Option<CustomerRaw> = sqlx::query_as(
            r#"
            SELECT * FROM customers
            WHERE customer_uid = $1
            "#,
        )
        .bind(customer_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find customer with id: {:?} failed. DB returned error: {:?}",
                customer_id, e
            );
            e
        })
        .ok()?;
        res.and_then(into_customer)
    }

    async fn find_by_email(&self, email: &str) -> Option<Customer> {
        let email = Customer::normalize_email(email);
        let res: Option<CustomerRaw> = sqlx::query_as(
            r#"
            SELECT * FROM customers
            WHERE email = $1
            "#,
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find customer with email: {:?} failed. DB returned error: {:?}",
                email, e
            );
            e
        })
        .ok()?;
        res.and_then(into_customer)
    }

    async fn find_cart_candidates(&self) -> anyhow::Result<Vec<CartCandidate>> {
        let customers_raw: Vec<CustomerRaw> = sqlx::query_as(
            r#"
            SELECT * FROM customers
            WHERE cart_snapshot_at IS NOT NULL
            AND jsonb_array_length(cart_items) > 0
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Find cart candidates failed. DB returned error: {:?}", e);
            e
        })?;

        Ok(customers_raw
            .into_iter()
            .filter_map(into_customer)
            .map(CartCandidate::from)
            .collect())
    }

    async fn sync_cart(
        &self,
        customer_id: &ID,
        items: &[CartItem],
        now: i64,
    ) -> anyhow::Result<Option<CartSnapshot>> {
        if items.is_empty() {
            if !self.reset_cart(customer_id).await? {
                return Ok(None);
            }
            return Ok(Some(CartSnapshot::default()));
        }

        let res: Option<CustomerRaw> = sqlx::query_as(
            r#"
            UPDATE customers
            SET cart_items = $2,
            cart_last_activity = $3,
            cart_snapshot_at = COALESCE(cart_snapshot_at, $3)
            WHERE customer_uid = $1
            RETURNING *
            "#,
        )
        .bind(customer_id.inner_ref())
        .bind(Json(items))
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Sync cart for customer with id: {:?} failed. DB returned error: {:?}",
                customer_id, e
            );
            e
        })?;

        match res {
            Some(raw) => Ok(Some(Customer::try_from(raw)?.cart)),
            None => Ok(None),
        }
    }

    async fn set_reminder_sent(
        &self,
        customer_id: &ID,
        snapshot_at: i64,
        reminder: CartReminder,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(set_reminder_sent_query(reminder))
            .bind(customer_id.inner_ref())
            .bind(snapshot_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Set cart reminder {} sent for customer with id: {:?} failed. DB returned error: {:?}",
                    reminder.number(),
                    customer_id,
                    e
                );
                e
            })?;
        Ok(res.rows_affected() > 0)
    }

    async fn reset_cart(&self, customer_id: &ID) -> anyhow::Result<bool> {
        let query = format!(
            "UPDATE customers SET {} WHERE customer_uid = $1",
            RESET_CART_COLUMNS
        );
        let res = sqlx::query(&query)
            .bind(customer_id.inner_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Reset cart for customer with id: {:?} failed. DB returned error: {:?}",
                    customer_id, e
                );
                e
            })?;
        Ok(res.rows_affected() > 0)
    }

    async fn reset_cart_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let email = Customer::normalize_email(email);
        let query = format!("UPDATE customers SET {} WHERE email = $1", RESET_CART_COLUMNS);
        let res = sqlx::query(&query)
            .bind(&email)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Reset cart for customer with email: {:?} failed. DB returned error: {:?}",
                    email, e
                );
                e
            })?;
        Ok(res.rows_affected() > 0)
    }
}

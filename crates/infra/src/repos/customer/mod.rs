mod inmemory;
mod postgres;

pub use inmemory::InMemoryCustomerRepo;
pub use postgres::PostgresCustomerRepo;
use storefront_domain::{CartCandidate, CartItem, CartReminder, CartSnapshot, Customer, ID};

/// Stores `Customer`s together with the snapshot of their cart.
///
/// The cart writes are narrow on purpose: the nurture scheduler only ever
/// flips a single reminder flag, while cart syncs and checkouts rewrite the
/// items and timestamps, so concurrent writers do not clobber each other.
#[async_trait::async_trait]
pub trait ICustomerRepo: Send + Sync {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()>;
    async fn find(&self, customer_id: &ID) -> Option<Customer>;
    async fn find_by_email(&self, email: &str) -> Option<Customer>;
    /// Customers with a non-empty cart and an active snapshot
    async fn find_cart_candidates(&self) -> anyhow::Result<Vec<CartCandidate>>;
    /// Applies a cart report from the client, see `CartSnapshot::sync`.
    /// Returns the resulting snapshot or `None` if the customer does not exist.
    async fn sync_cart(
        &self,
        customer_id: &ID,
        items: &[CartItem],
        now: i64,
    ) -> anyhow::Result<Option<CartSnapshot>>;
    /// Marks the reminder as sent, but only if the customer still has the
    /// snapshot identified by `snapshot_at` and the previous reminder in the
    /// sequence is sent. Returns whether the flag was set.
    async fn set_reminder_sent(
        &self,
        customer_id: &ID,
        snapshot_at: i64,
        reminder: CartReminder,
    ) -> anyhow::Result<bool>;
    /// Clears the cart snapshot. Returns whether the customer exists.
    async fn reset_cart(&self, customer_id: &ID) -> anyhow::Result<bool>;
    /// Clears the cart snapshot of the customer with the given email.
    /// Returns whether such a customer exists.
    async fn reset_cart_by_email(&self, email: &str) -> anyhow::Result<bool>;
}

#[cfg(test)]
mod tests {
    use crate::{run_migration, setup_context, StorefrontContext};
    use storefront_domain::{CartItem, CartReminder, CartSnapshot, Customer, ID};

    /// The inmemory context, plus the postgres one when `DATABASE_URL` is set
    async fn create_contexts() -> Vec<StorefrontContext> {
        let mut contexts = vec![StorefrontContext::create_inmemory()];
        if std::env::var("DATABASE_URL").is_ok() {
            run_migration().await.unwrap();
            contexts.push(setup_context().await);
        }
        contexts
    }

    // Tests share the database, so every customer gets its own email
    fn unique_email(name: &str) -> String {
        format!("{}-{}@example.com", name, ID::default())
    }

    fn items() -> Vec<CartItem> {
        vec![CartItem {
            id: "p-1".into(),
            name: "Peace lily".into(),
            price: 10.5,
            quantity: 2,
            sku: "LILY".into(),
            image: "lily.png".into(),
        }]
    }

    #[tokio::test]
    async fn insert_and_find() {
        for ctx in create_contexts().await {
            let email = unique_email("jane");
            let mut customer = Customer::new(&email);
            customer.first_name = "Jane".into();
            assert!(ctx.repos.customers.insert(&customer).await.is_ok());

            let res = ctx.repos.customers.find(&customer.id).await.unwrap();
            assert_eq!(res, customer);
            let res = ctx
                .repos
                .customers
                .find_by_email(&email.to_uppercase())
                .await
                .unwrap();
            assert_eq!(res, customer);

            assert!(ctx.repos.customers.find(&ID::default()).await.is_none());
            assert!(ctx
                .repos
                .customers
                .find_by_email(&unique_email("nobody"))
                .await
                .is_none());
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        for ctx in create_contexts().await {
            let email = unique_email("jane");
            let first = Customer::new(&email);
            let second = Customer::new(&email);
            ctx.repos.customers.insert(&first).await.unwrap();
            assert!(ctx.repos.customers.insert(&second).await.is_err());

            assert!(ctx.repos.customers.find(&second.id).await.is_none());
            let res = ctx.repos.customers.find_by_email(&email).await.unwrap();
            assert_eq!(res.id, first.id);
        }
    }

    #[tokio::test]
    async fn sync_cart_sets_snapshot_once() {
        for ctx in create_contexts().await {
            let customer = Customer::new(&unique_email("jane"));
            ctx.repos.customers.insert(&customer).await.unwrap();

            let cart = ctx
                .repos
                .customers
                .sync_cart(&customer.id, &items(), 1000)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(cart.snapshot_at, Some(1000));
            assert_eq!(cart.last_activity, Some(1000));
            assert_eq!(cart.items, items());

            let mut more_items = items();
            more_items[0].quantity = 3;
            let cart = ctx
                .repos
                .customers
                .sync_cart(&customer.id, &more_items, 2000)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(cart.snapshot_at, Some(1000));
            assert_eq!(cart.last_activity, Some(2000));

            let stored = ctx.repos.customers.find(&customer.id).await.unwrap().cart;
            assert_eq!(stored, cart);
            assert_eq!(stored.items, more_items);

            let cart = ctx
                .repos
                .customers
                .sync_cart(&customer.id, &[], 3000)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(cart, CartSnapshot::default());
            let stored = ctx.repos.customers.find(&customer.id).await.unwrap().cart;
            assert_eq!(stored, CartSnapshot::default());

            let missing = ctx
                .repos
                .customers
                .sync_cart(&ID::default(), &items(), 1000)
                .await
                .unwrap();
            assert!(missing.is_none());
        }
    }

    #[tokio::test]
    async fn finds_only_active_carts_as_candidates() {
        for ctx in create_contexts().await {
            let with_cart = Customer::new(&unique_email("with-cart"));
            let without_cart = Customer::new(&unique_email("without-cart"));
            ctx.repos.customers.insert(&with_cart).await.unwrap();
            ctx.repos.customers.insert(&without_cart).await.unwrap();
            ctx.repos
                .customers
                .sync_cart(&with_cart.id, &items(), 1000)
                .await
                .unwrap();

            let candidates = ctx.repos.customers.find_cart_candidates().await.unwrap();
            assert!(candidates
                .iter()
                .all(|c| c.customer_id != without_cart.id));
            let candidate = candidates
                .iter()
                .find(|c| c.customer_id == with_cart.id)
                .unwrap();
            assert_eq!(candidate.email, with_cart.email);
            assert_eq!(candidate.cart.snapshot_at, Some(1000));
            assert_eq!(candidate.cart.items, items());
        }
    }

    #[tokio::test]
    async fn set_reminder_sent_is_conditional() {
        for ctx in create_contexts().await {
            let customer = Customer::new(&unique_email("jane"));
            ctx.repos.customers.insert(&customer).await.unwrap();
            ctx.repos
                .customers
                .sync_cart(&customer.id, &items(), 1000)
                .await
                .unwrap();
            let repo = &ctx.repos.customers;

            // Out of order
            assert!(!repo
                .set_reminder_sent(&customer.id, 1000, CartReminder::Second)
                .await
                .unwrap());
            assert!(!repo
                .set_reminder_sent(&customer.id, 1000, CartReminder::Third)
                .await
                .unwrap());
            // Stale snapshot
            assert!(!repo
                .set_reminder_sent(&customer.id, 999, CartReminder::First)
                .await
                .unwrap());

            assert!(repo
                .set_reminder_sent(&customer.id, 1000, CartReminder::First)
                .await
                .unwrap());
            assert!(repo
                .set_reminder_sent(&customer.id, 1000, CartReminder::Second)
                .await
                .unwrap());

            let cart = repo.find(&customer.id).await.unwrap().cart;
            assert!(cart.sent.reminder1);
            assert!(cart.sent.reminder2);
            assert!(!cart.sent.reminder3);
            assert_eq!(cart.items, items());

            assert!(repo
                .set_reminder_sent(&customer.id, 1000, CartReminder::Third)
                .await
                .unwrap());
            assert!(repo.find(&customer.id).await.unwrap().cart.sent.reminder3);
        }
    }

    #[tokio::test]
    async fn reset_cart_is_idempotent() {
        for ctx in create_contexts().await {
            let customer = Customer::new(&unique_email("jane"));
            ctx.repos.customers.insert(&customer).await.unwrap();
            ctx.repos
                .customers
                .sync_cart(&customer.id, &items(), 1000)
                .await
                .unwrap();
            ctx.repos
                .customers
                .set_reminder_sent(&customer.id, 1000, CartReminder::First)
                .await
                .unwrap();

            assert!(ctx.repos.customers.reset_cart(&customer.id).await.unwrap());
            let once = ctx.repos.customers.find(&customer.id).await.unwrap();
            assert!(ctx.repos.customers.reset_cart(&customer.id).await.unwrap());
            let twice = ctx.repos.customers.find(&customer.id).await.unwrap();

            assert_eq!(once, twice);
            assert_eq!(twice.cart, CartSnapshot::default());
            assert!(!ctx.repos.customers.reset_cart(&ID::default()).await.unwrap());

            // A flag decided for the old snapshot is not recorded after a reset
            assert!(!ctx
                .repos
                .customers
                .set_reminder_sent(&customer.id, 1000, CartReminder::First)
                .await
                .unwrap());
        }
    }

    #[tokio::test]
    async fn reset_cart_by_email() {
        for ctx in create_contexts().await {
            let email = unique_email("jane");
            let customer = Customer::new(&email);
            ctx.repos.customers.insert(&customer).await.unwrap();
            ctx.repos
                .customers
                .sync_cart(&customer.id, &items(), 1000)
                .await
                .unwrap();

            assert!(ctx
                .repos
                .customers
                .reset_cart_by_email(&format!(" {} ", email.to_uppercase()))
                .await
                .unwrap());
            let cart = ctx.repos.customers.find(&customer.id).await.unwrap().cart;
            assert_eq!(cart, CartSnapshot::default());

            assert!(!ctx
                .repos
                .customers
                .reset_cart_by_email(&unique_email("nobody"))
                .await
                .unwrap());
        }
    }
}

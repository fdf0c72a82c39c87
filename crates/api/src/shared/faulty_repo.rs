use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use storefront_domain::{CartCandidate, CartItem, CartReminder, CartSnapshot, Customer, ID};
use storefront_infra::ICustomerRepo;

/// Customer repository that wraps another one and fails on demand
pub struct FaultyCustomerRepo {
    inner: Arc<dyn ICustomerRepo>,
    failing_writes: Mutex<Vec<ID>>,
    failing_scans: AtomicBool,
    panic_next_scan: AtomicBool,
}

impl FaultyCustomerRepo {
    pub fn new(inner: Arc<dyn ICustomerRepo>) -> Self {
        Self {
            inner,
            failing_writes: Mutex::new(Vec::new()),
            failing_scans: AtomicBool::new(false),
            panic_next_scan: AtomicBool::new(false),
        }
    }

    /// Makes recording reminders for the customer fail
    pub fn fail_writes_for(&self, customer_id: &ID) {
        self.failing_writes.lock().unwrap().push(customer_id.clone());
    }

    pub fn fail_scans(&self) {
        self.failing_scans.store(true, Ordering::SeqCst);
    }

    /// Makes only the next candidate scan panic
    pub fn panic_next_scan(&self) {
        self.panic_next_scan.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for FaultyCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        self.inner.insert(customer).await
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        self.inner.find(customer_id).await
    }

    async fn find_by_email(&self, email: &str) -> Option<Customer> {
        self.inner.find_by_email(email).await
    }

    async fn find_cart_candidates(&self) -> anyhow::Result<Vec<CartCandidate>> {
        if self.panic_next_scan.swap(false, Ordering::SeqCst) {
            panic!("Connection pool poisoned");
        }
        if self.failing_scans.load(Ordering::SeqCst) {
            anyhow::bail!("Connection refused");
        }
        self.inner.find_cart_candidates().await
    }

    async fn sync_cart(
        &self,
        customer_id: &ID,
        items: &[CartItem],
        now: i64,
    ) -> anyhow::Result<Option<CartSnapshot>> {
        self.inner.sync_cart(customer_id, items, now).await
    }

    async fn set_reminder_sent(
        &self,
        customer_id: &ID,
        snapshot_at: i64,
        reminder: CartReminder,
    ) -> anyhow::Result<bool> {
        let fails = self.failing_writes.lock().unwrap().contains(customer_id);
        if fails {
            anyhow::bail!("Connection reset while updating customer: {}", customer_id);
        }
        self.inner
            .set_reminder_sent(customer_id, snapshot_at, reminder)
            .await
    }

    async fn reset_cart(&self, customer_id: &ID) -> anyhow::Result<bool> {
        self.inner.reset_cart(customer_id).await
    }

    async fn reset_cart_by_email(&self, email: &str) -> anyhow::Result<bool> {
        self.inner.reset_cart_by_email(email).await
    }
}

use super::ICustomerRepo;
use crate::repos::shared::inmemory_repo::*;
use storefront_domain::{CartCandidate, CartItem, CartReminder, CartSnapshot, Customer, ID};

pub struct InMemoryCustomerRepo {
    customers: std::sync::Mutex<Vec<Customer>>,
}

impl InMemoryCustomerRepo {
    pub fn new() -> Self {
        Self {
            customers: std::sync::Mutex::new(Vec::new()),
        }
    }
}

fn previous_sent(cart: &CartSnapshot, reminder: CartReminder) -> bool {
    match reminder {
        CartReminder::First => true,
        CartReminder::Second => cart.sent.reminder1,
        CartReminder::Third => cart.sent.reminder2,
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for InMemoryCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        let mut customers = self.customers.lock().unwrap();
        if customers.iter().any(|c| c.email == customer.email) {
            anyhow::bail!("A customer with email: {} already exists", customer.email);
        }
        customers.push(customer.clone());
        Ok(())
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        find(customer_id, &self.customers)
    }

    async fn find_by_email(&self, email: &str) -> Option<Customer> {
        let email = Customer::normalize_email(email);
        find_by(&self.customers, |c| c.email == email).pop()
    }

    async fn find_cart_candidates(&self) -> anyhow::Result<Vec<CartCandidate>> {
        let candidates = find_by(&self.customers, |c| c.cart.is_active())
            .into_iter()
            .map(CartCandidate::from)
            .collect();
        Ok(candidates)
    }

    async fn sync_cart(
        &self,
        customer_id: &ID,
        items: &[CartItem],
        now: i64,
    ) -> anyhow::Result<Option<CartSnapshot>> {
        let updated = update_by(
            &self.customers,
            |c| c.id == *customer_id,
            |c| c.cart.sync(items.to_vec(), now),
        );
        Ok(updated.into_iter().next().map(|c| c.cart))
    }

    async fn set_reminder_sent(
        &self,
        customer_id: &ID,
        snapshot_at: i64,
        reminder: CartReminder,
    ) -> anyhow::Result<bool> {
        let updated = update_by(
            &self.customers,
            |c| {
                c.id == *customer_id
                    && c.cart.snapshot_at == Some(snapshot_at)
                    && previous_sent(&c.cart, reminder)
            },
            |c| c.cart.sent.mark_sent(reminder),
        );
        Ok(!updated.is_empty())
    }

    async fn reset_cart(&self, customer_id: &ID) -> anyhow::Result<bool> {
        let updated = update_by(
            &self.customers,
            |c| c.id == *customer_id,
            |c| c.cart.reset(),
        );
        Ok(!updated.is_empty())
    }

    async fn reset_cart_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let email = Customer::normalize_email(email);
        let updated = update_by(&self.customers, |c| c.email == email, |c| c.cart.reset());
        Ok(!updated.is_empty())
    }
}

use crate::{
    cart::CartSnapshot,
    shared::entity::{Entity, ID},
};

/// A registered storefront customer together with the snapshot of their cart
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: ID,
    /// Always stored trimmed and lowercased
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub cart: CartSnapshot,
}

impl Customer {
    pub fn new(email: &str) -> Self {
        Self {
            id: Default::default(),
            email: Self::normalize_email(email),
            first_name: String::new(),
            last_name: String::new(),
            cart: Default::default(),
        }
    }

    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

impl Entity<ID> for Customer {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

/// A `Customer` with an active `CartSnapshot` that the nurture scheduler
/// should evaluate
#[derive(Debug, Clone, PartialEq)]
pub struct CartCandidate {
    pub customer_id: ID,
    pub email: String,
    pub first_name: String,
    pub cart: CartSnapshot,
}

impl From<Customer> for CartCandidate {
    fn from(customer: Customer) -> Self {
        Self {
            customer_id: customer.id,
            email: customer.email,
            first_name: customer.first_name,
            cart: customer.cart,
        }
    }
}

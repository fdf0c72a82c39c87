use crate::dtos::{CartItemDTO, CartSnapshotDTO};
use serde::{Deserialize, Serialize};
use storefront_domain::{CartSnapshot, ID};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart: CartSnapshotDTO,
}

impl CartResponse {
    pub fn new(cart: CartSnapshot) -> Self {
        Self {
            cart: CartSnapshotDTO::new(cart),
        }
    }
}

pub mod get_cart {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub customer_id: ID,
    }

    pub type APIResponse = CartResponse;
}

pub mod sync_cart {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub customer_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub items: Vec<CartItemDTO>,
    }

    pub type APIResponse = CartResponse;
}

pub mod complete_checkout {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub customer_email: String,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Whether a customer with the given email was found and its cart cleared
        pub cleared: bool,
    }
}

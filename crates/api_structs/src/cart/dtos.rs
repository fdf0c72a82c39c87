use serde::{Deserialize, Serialize};
use storefront_domain::{CartItem, CartSnapshot};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDTO {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub image: String,
}

impl CartItemDTO {
    pub fn new(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            sku: item.sku,
            image: item.image,
        }
    }

    pub fn into_cart_item(self) -> CartItem {
        CartItem {
            id: self.id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            sku: self.sku,
            image: self.image,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderFlagsDTO {
    pub reminder1: bool,
    pub reminder2: bool,
    pub reminder3: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshotDTO {
    pub items: Vec<CartItemDTO>,
    pub snapshot_at: Option<i64>,
    pub last_activity: Option<i64>,
    pub emails_sent: ReminderFlagsDTO,
}

impl CartSnapshotDTO {
    pub fn new(cart: CartSnapshot) -> Self {
        Self {
            items: cart.items.into_iter().map(CartItemDTO::new).collect(),
            snapshot_at: cart.snapshot_at,
            last_activity: cart.last_activity,
            emails_sent: ReminderFlagsDTO {
                reminder1: cart.sent.reminder1,
                reminder2: cart.sent.reminder2,
                reminder3: cart.sent.reminder3,
            },
        }
    }
}

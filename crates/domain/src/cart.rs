use crate::reminder::CartReminder;
use serde::{Deserialize, Serialize};

/// A single line in a customer's cart as reported by the storefront client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub image: String,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Which of the cart reminders have been sent for the current `CartSnapshot`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderFlags {
    pub reminder1: bool,
    pub reminder2: bool,
    pub reminder3: bool,
}

impl ReminderFlags {
    pub fn is_sent(&self, reminder: CartReminder) -> bool {
        match reminder {
            CartReminder::First => self.reminder1,
            CartReminder::Second => self.reminder2,
            CartReminder::Third => self.reminder3,
        }
    }

    pub fn mark_sent(&mut self, reminder: CartReminder) {
        match reminder {
            CartReminder::First => self.reminder1 = true,
            CartReminder::Second => self.reminder2 = true,
            CartReminder::Third => self.reminder3 = true,
        }
    }

    pub fn any(&self) -> bool {
        self.reminder1 || self.reminder2 || self.reminder3
    }
}

/// The persisted state of a customer's cart that drives the reminder emails.
///
/// A snapshot becomes active the first time a non-empty cart is reported
/// after the last reset, which is when `snapshot_at` is set. It stays active
/// until the cart is emptied or a checkout completes, both of which reset
/// every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    /// Millis timestamp of the first non-empty cart report since the last reset
    pub snapshot_at: Option<i64>,
    /// Millis timestamp of the latest cart report
    pub last_activity: Option<i64>,
    pub sent: ReminderFlags,
}

impl CartSnapshot {
    /// Whether the snapshot should be looked at by the nurture scheduler
    pub fn is_active(&self) -> bool {
        self.snapshot_at.is_some() && !self.items.is_empty()
    }

    /// Applies a cart report from the client.
    ///
    /// An empty report resets the snapshot. A non-empty report replaces the
    /// items and activity timestamp, and only sets `snapshot_at` when there is
    /// no active snapshot yet.
    pub fn sync(&mut self, items: Vec<CartItem>, now: i64) {
        if items.is_empty() {
            self.reset();
            return;
        }
        self.items = items;
        self.last_activity = Some(now);
        self.snapshot_at.get_or_insert(now);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.line_total()).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn item(price: f64, quantity: u32) -> CartItem {
        CartItem {
            id: "p-1".into(),
            name: "Fern".into(),
            price,
            quantity,
            sku: "FERN-1".into(),
            image: String::new(),
        }
    }

    #[test]
    fn first_non_empty_sync_sets_snapshot_at() {
        let mut cart = CartSnapshot::default();
        assert!(!cart.is_active());

        cart.sync(vec![item(10.0, 2)], 1000);
        assert_eq!(cart.snapshot_at, Some(1000));
        assert_eq!(cart.last_activity, Some(1000));
        assert!(cart.is_active());
    }

    #[test]
    fn later_non_empty_sync_keeps_snapshot_at_and_updates_activity() {
        let mut cart = CartSnapshot::default();
        cart.sync(vec![item(10.0, 2)], 1000);
        cart.sent.mark_sent(CartReminder::First);

        cart.sync(vec![item(10.0, 3), item(4.5, 1)], 5000);
        assert_eq!(cart.snapshot_at, Some(1000));
        assert_eq!(cart.last_activity, Some(5000));
        assert_eq!(cart.items.len(), 2);
        assert!(cart.sent.reminder1);
    }

    #[test]
    fn empty_sync_resets_everything() {
        let mut cart = CartSnapshot::default();
        cart.sync(vec![item(10.0, 2)], 1000);
        cart.sent.mark_sent(CartReminder::First);
        cart.sent.mark_sent(CartReminder::Second);

        cart.sync(Vec::new(), 2000);
        assert_eq!(cart, CartSnapshot::default());
        assert!(!cart.sent.any());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut cart = CartSnapshot::default();
        cart.sync(vec![item(10.0, 2)], 1000);
        cart.sent.mark_sent(CartReminder::First);

        cart.reset();
        let once = cart.clone();
        cart.reset();
        assert_eq!(cart, once);
        assert_eq!(cart.snapshot_at, None);
        assert_eq!(cart.last_activity, None);
    }

    #[test]
    fn totals_line_items() {
        let mut cart = CartSnapshot::default();
        cart.sync(vec![item(10.0, 2), item(2.5, 4)], 1000);
        assert_eq!(cart.items[0].line_total(), 20.0);
        assert_eq!(cart.total(), 30.0);
    }
}

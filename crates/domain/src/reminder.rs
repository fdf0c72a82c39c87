use crate::cart::CartSnapshot;
use serde::{Deserialize, Serialize};

const HOUR_MILLIS: i64 = 1000 * 60 * 60;

/// One of the three scripted emails sent to a customer who left
/// items in their cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartReminder {
    First,
    Second,
    Third,
}

impl CartReminder {
    pub fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }
}

/// Decides which `CartReminder` is due for a `CartSnapshot`.
///
/// Every threshold is the elapsed time in millis since `snapshot_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    pub first_after: i64,
    pub second_after: i64,
    pub third_after: i64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            first_after: HOUR_MILLIS,
            second_after: 24 * HOUR_MILLIS,
            third_after: 72 * HOUR_MILLIS,
        }
    }
}

impl ReminderPolicy {
    /// Returns the next reminder to send, if any.
    ///
    /// Rules are checked in order and the first match wins, so a single call
    /// never yields more than one reminder. A reminder is only returned once
    /// the previous one has been sent, which means a customer who missed a
    /// window still walks through the sequence one step per call.
    pub fn decide(&self, now: i64, cart: &CartSnapshot) -> Option<CartReminder> {
        let snapshot_at = cart.snapshot_at?;
        let elapsed = now - snapshot_at;
        let sent = &cart.sent;

        if elapsed >= self.first_after && !sent.reminder1 {
            Some(CartReminder::First)
        } else if elapsed >= self.second_after && sent.reminder1 && !sent.reminder2 {
            Some(CartReminder::Second)
        } else if elapsed >= self.third_after && sent.reminder2 && !sent.reminder3 {
            Some(CartReminder::Third)
        } else {
            None
        }
    }
}

mod cart;
mod customer;
mod notification;
mod reminder;
mod shared;

pub use cart::{CartItem, CartSnapshot, ReminderFlags};
pub use customer::{CartCandidate, Customer};
pub use notification::{escape_html, render_cart_reminder, CartReminderEmail, EmailBranding};
pub use reminder::{CartReminder, ReminderPolicy};
pub use shared::entity::{Entity, ID};

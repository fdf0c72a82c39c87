use crate::{cart::CartItem, reminder::CartReminder};

const ACCENT_COLOR: &str = "#748a53";

/// Store details that are embedded in every reminder email
#[derive(Debug, Clone)]
pub struct EmailBranding {
    pub store_name: String,
    /// Storefront base url without a trailing slash, used for the cart and account links
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartReminderEmail {
    pub subject: String,
    pub html: String,
}

struct ReminderCopy {
    subject: &'static str,
    intro: &'static str,
    call_to_action: &'static str,
}

fn reminder_copy(reminder: CartReminder) -> ReminderCopy {
    match reminder {
        CartReminder::First => ReminderCopy {
            subject: "You left something in your cart",
            intro: "You left a few things in your cart. There is no rush, they will be \
                    here whenever you are ready to come back.",
            call_to_action: "Return to my cart",
        },
        CartReminder::Second => ReminderCopy {
            subject: "Your cart is still waiting for you",
            intro: "Your cart is still saved and everything in it is ready to ship. \
                    Complete your order now before these items sell out.",
            call_to_action: "Complete my order",
        },
        CartReminder::Third => ReminderCopy {
            subject: "Last reminder about your cart",
            intro: "This is the last reminder we will send about your cart. \
                    Your items are still saved if you want them.",
            call_to_action: "Check out now",
        },
    }
}

/// Escapes text so it can be embedded in html content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn render_item_row(item: &CartItem) -> String {
    format!(
        r#"<tr>
<td style="padding:8px 12px;border-bottom:1px solid #f0f0f0;">{name}</td>
<td style="padding:8px 12px;border-bottom:1px solid #f0f0f0;text-align:center;">&times;{quantity}</td>
<td style="padding:8px 12px;border-bottom:1px solid #f0f0f0;text-align:right;color:{accent};">${total:.2}</td>
</tr>"#,
        name = escape_html(&item.name),
        quantity = item.quantity,
        accent = ACCENT_COLOR,
        total = item.line_total(),
    )
}

/// Builds the subject and html body of a cart reminder email
pub fn render_cart_reminder(
    reminder: CartReminder,
    first_name: &str,
    items: &[CartItem],
    branding: &EmailBranding,
) -> CartReminderEmail {
    let copy = reminder_copy(reminder);
    let first_name = match first_name.trim() {
        "" => "there",
        name => name,
    };
    let base_url = branding.base_url.trim_end_matches('/');
    let store_name = escape_html(&branding.store_name);
    let item_rows = items.iter().map(render_item_row).collect::<String>();

    let html = format!(
        r#"<div style="font-family:Helvetica,Arial,sans-serif;max-width:560px;margin:0 auto;color:#333;">
<div style="background:{accent};padding:24px 32px;">
<h1 style="color:#fff;font-size:22px;margin:0;font-weight:400;">{store_name}</h1>
</div>
<div style="padding:32px;background:#fff;">
<p>Hi {first_name},</p>
<p>{intro}</p>
<table style="width:100%;border-collapse:collapse;margin:20px 0;border:1px solid #eee;">
<thead>
<tr style="background:#f9f9f9;">
<th style="padding:10px 12px;text-align:left;">Item</th>
<th style="padding:10px 12px;text-align:center;">Qty</th>
<th style="padding:10px 12px;text-align:right;">Price</th>
</tr>
</thead>
<tbody>{item_rows}</tbody>
</table>
<p style="text-align:center;margin:28px 0;">
<a href="{cart_url}" style="background:{accent};color:#fff;padding:13px 32px;border-radius:6px;text-decoration:none;font-weight:600;">{call_to_action}</a>
</p>
<p style="font-size:12px;color:#aaa;text-align:center;margin-top:28px;">
You are receiving this because you have items in your cart at {store_name}.<br>
<a href="{account_url}" style="color:#aaa;">Manage your account</a>
</p>
</div>
</div>"#,
        accent = ACCENT_COLOR,
        store_name = store_name,
        first_name = escape_html(first_name),
        intro = copy.intro,
        item_rows = item_rows,
        cart_url = escape_html(&format!("{}/Cart.html", base_url)),
        call_to_action = copy.call_to_action,
        account_url = escape_html(&format!("{}/Account.html", base_url)),
    );

    CartReminderEmail {
        subject: copy.subject.to_string(),
        html,
    }
}

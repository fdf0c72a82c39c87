use std::{fmt::Display, str::FromStr, time::Duration};
use storefront_domain::ReminderPolicy;
use storefront_utils::create_random_secret;
use tracing::{info, warn};

const MINUTE_MILLIS: i64 = 1000 * 60;
// One week
const MAX_PERIOD_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret key that callers of the cart and checkout routes must provide
    pub api_key: String,
    /// Port for the application to run on
    pub port: usize,
    /// Base url of the storefront, used for links embedded in emails
    pub frontend_url: String,
    pub cart_nurture: CartNurtureConfig,
    /// Outgoing mail settings. Cart reminders are not sent when this is missing.
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct CartNurtureConfig {
    /// How often the abandoned cart scan runs
    pub interval: Duration,
    pub policy: ReminderPolicy,
    /// Upper bound for delivering a single reminder email
    pub send_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Display name of the sender, also used as the store name in emails
    pub from_name: String,
}

impl Default for CartNurtureConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15 * 60),
            policy: Default::default(),
            send_timeout: Duration::from_secs(30),
        }
    }
}

/// Reads and parses an environment variable, falling back to the default
/// when it is missing or malformed
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads a reminder threshold given in minutes. Anything that is not a
/// positive number of minutes that fits in millis falls back to the default.
fn threshold_millis(key: &str, default_millis: i64) -> i64 {
    let value = match non_empty_env(key) {
        Some(value) => value,
        None => return default_millis,
    };
    let millis = value
        .parse::<i64>()
        .ok()
        .filter(|mins| *mins > 0)
        .and_then(|mins| mins.checked_mul(MINUTE_MILLIS));
    match millis {
        Some(millis) => millis,
        None => {
            warn!(
                "The given {}: {} is not a valid number of minutes, falling back to the default: {}.",
                key,
                value,
                default_millis / MINUTE_MILLIS
            );
            default_millis
        }
    }
}

impl CartNurtureConfig {
    fn from_env() -> Self {
        let default_policy = ReminderPolicy::default();
        let policy = ReminderPolicy {
            first_after: threshold_millis("CART_REMINDER_1_AFTER_MINS", default_policy.first_after),
            second_after: threshold_millis(
                "CART_REMINDER_2_AFTER_MINS",
                default_policy.second_after,
            ),
            third_after: threshold_millis("CART_REMINDER_3_AFTER_MINS", default_policy.third_after),
        };
        if !(policy.first_after <= policy.second_after && policy.second_after <= policy.third_after)
        {
            warn!(
                "Cart reminder thresholds are not increasing: {:?}. Reminders are still sent in order.",
                policy
            );
        }

        let interval_secs =
            env_or("CART_NURTURE_INTERVAL_SECS", 15 * 60_u64).clamp(1, MAX_PERIOD_SECS);
        let send_timeout_secs =
            env_or("MAIL_SEND_TIMEOUT_SECS", 30_u64).clamp(1, MAX_PERIOD_SECS);

        Self {
            interval: Duration::from_secs(interval_secs),
            policy,
            send_timeout: Duration::from_secs(send_timeout_secs),
        }
    }
}

impl SmtpConfig {
    fn from_env() -> Option<Self> {
        let host = non_empty_env("SMTP_HOST");
        let user = non_empty_env("SMTP_USER");
        let password = non_empty_env("SMTP_PASS");
        match (host, user, password) {
            (Some(host), Some(user), Some(password)) => Some(Self {
                host,
                port: env_or("SMTP_PORT", 587),
                user,
                password,
                from_name: non_empty_env("SMTP_FROM_NAME").unwrap_or_else(|| "Storefront".into()),
            }),
            _ => {
                info!("SMTP_HOST, SMTP_USER and SMTP_PASS are not all set. Cart reminder emails are disabled.");
                None
            }
        }
    }
}

fn frontend_url_from_env() -> String {
    let default_url = "http://localhost:5500";
    let frontend_url = match non_empty_env("FRONTEND_URL") {
        Some(url) => url,
        None => return default_url.into(),
    };
    match url::Url::parse(&frontend_url) {
        Ok(parsed) if ["http", "https"].contains(&parsed.scheme()) => {
            frontend_url.trim_end_matches('/').to_string()
        }
        _ => {
            warn!(
                "The given FRONTEND_URL: {} is not a valid http(s) url, falling back to: {}.",
                frontend_url, default_url
            );
            default_url.into()
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let api_key = match non_empty_env("STOREFRONT_API_KEY") {
            Some(key) => key,
            None => {
                info!("Did not find STOREFRONT_API_KEY environment variable. Going to create one.");
                let key = create_random_secret(30);
                info!("Api key for the cart and checkout routes was generated and set to: {}", key);
                key
            }
        };

        Self {
            api_key,
            port: env_or("PORT", 5000),
            frontend_url: frontend_url_from_env(),
            cart_nurture: CartNurtureConfig::from_env(),
            smtp: SmtpConfig::from_env(),
        }
    }

    /// Store name shown in the emails
    pub fn store_name(&self) -> String {
        self.smtp
            .as_ref()
            .map(|smtp| smtp.from_name.clone())
            .unwrap_or_else(|| "Storefront".into())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

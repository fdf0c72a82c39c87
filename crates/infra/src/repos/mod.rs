mod customer;
mod shared;

use customer::{InMemoryCustomerRepo, PostgresCustomerRepo};
pub use customer::ICustomerRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub customers: Arc<dyn ICustomerRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            customers: Arc::new(PostgresCustomerRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            customers: Arc::new(InMemoryCustomerRepo::new()),
        }
    }
}

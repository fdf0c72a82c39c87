use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use crate::error::StorefrontError;
use actix_web::{web, HttpRequest, HttpResponse};
use storefront_api_structs::sync_cart::{APIResponse, PathParams, RequestBody};
use storefront_domain::{CartItem, CartSnapshot, ID};
use storefront_infra::StorefrontContext;

pub async fn sync_cart_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<StorefrontContext>,
) -> Result<HttpResponse, StorefrontError> {
    protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = SyncCartUseCase {
        customer_id: path.customer_id.clone(),
        items: body
            .items
            .into_iter()
            .map(|item| item.into_cart_item())
            .collect(),
    };

    execute(usecase, &ctx)
        .await
        .map(|cart| HttpResponse::Ok().json(APIResponse::new(cart)))
        .map_err(StorefrontError::from)
}

/// Stores the cart contents reported by the storefront client.
///
/// The first non-empty report starts the abandoned cart timer, and an
/// empty report clears the cart together with its reminder state.
#[derive(Debug)]
pub struct SyncCartUseCase {
    pub customer_id: ID,
    pub items: Vec<CartItem>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidItem(String),
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for StorefrontError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidItem(msg) => Self::BadClientData(msg),
            UseCaseError::NotFound(customer_id) => Self::NotFound(format!(
                "The customer with id: {}, was not found.",
                customer_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

fn validate_item(item: &CartItem) -> Result<(), UseCaseError> {
    if item.id.trim().is_empty() || item.name.trim().is_empty() {
        return Err(UseCaseError::InvalidItem(
            "Cart items must have an id and a name".into(),
        ));
    }
    if item.quantity < 1 {
        return Err(UseCaseError::InvalidItem(format!(
            "Cart item: {} must have a quantity of at least 1",
            item.id
        )));
    }
    if !item.price.is_finite() || item.price < 0.0 {
        return Err(UseCaseError::InvalidItem(format!(
            "Cart item: {} has an invalid price: {}",
            item.id, item.price
        )));
    }
    Ok(())
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncCartUseCase {
    type Response = CartSnapshot;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncCart";

    async fn execute(&mut self, ctx: &StorefrontContext) -> Result<Self::Response, Self::Error> {
        for item in &self.items {
            validate_item(item)?;
        }

        let now = ctx.sys.get_timestamp_millis();
        match ctx
            .repos
            .customers
            .sync_cart(&self.customer_id, &self.items, now)
            .await
        {
            Ok(Some(cart)) => Ok(cart),
            Ok(None) => Err(UseCaseError::NotFound(self.customer_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storefront_domain::Customer;
    use storefront_infra::StaticSys;

    fn item(quantity: u32, price: f64) -> CartItem {
        CartItem {
            id: "p-1".into(),
            name: "Aloe vera".into(),
            price,
            quantity,
            sku: String::new(),
            image: String::new(),
        }
    }

    async fn setup() -> (StorefrontContext, Customer) {
        let ctx = StorefrontContext::create_inmemory();
        let customer = Customer::new("jane@example.com");
        ctx.repos.customers.insert(&customer).await.unwrap();
        (ctx, customer)
    }

    #[actix_web::test]
    async fn first_report_starts_snapshot_and_later_reports_keep_it() {
        let (mut ctx, customer) = setup().await;
        ctx.sys = Arc::new(StaticSys(1000));

        let mut usecase = SyncCartUseCase {
            customer_id: customer.id.clone(),
            items: vec![item(2, 10.0)],
        };
        let cart = usecase.execute(&ctx).await.unwrap();
        assert_eq!(cart.snapshot_at, Some(1000));
        assert_eq!(cart.last_activity, Some(1000));

        ctx.sys = Arc::new(StaticSys(5000));
        let mut usecase = SyncCartUseCase {
            customer_id: customer.id.clone(),
            items: vec![item(3, 10.0)],
        };
        let cart = usecase.execute(&ctx).await.unwrap();
        assert_eq!(cart.snapshot_at, Some(1000));
        assert_eq!(cart.last_activity, Some(5000));
        assert_eq!(cart.items[0].quantity, 3);
    }

    #[actix_web::test]
    async fn empty_report_resets_cart() {
        let (ctx, customer) = setup().await;
        let mut usecase = SyncCartUseCase {
            customer_id: customer.id.clone(),
            items: vec![item(1, 10.0)],
        };
        usecase.execute(&ctx).await.unwrap();

        let mut usecase = SyncCartUseCase {
            customer_id: customer.id.clone(),
            items: Vec::new(),
        };
        let cart = usecase.execute(&ctx).await.unwrap();
        assert_eq!(cart, CartSnapshot::default());
    }

    #[actix_web::test]
    async fn rejects_invalid_items() {
        let (ctx, customer) = setup().await;
        for bad_item in vec![item(0, 10.0), item(1, -1.0), item(1, f64::NAN)] {
            let mut usecase = SyncCartUseCase {
                customer_id: customer.id.clone(),
                items: vec![bad_item],
            };
            let res = usecase.execute(&ctx).await;
            assert!(matches!(res, Err(UseCaseError::InvalidItem(_))));
        }
        let stored = ctx.repos.customers.find(&customer.id).await.unwrap();
        assert_eq!(stored.cart, CartSnapshot::default());
    }

    #[actix_web::test]
    async fn rejects_unknown_customer() {
        let (ctx, _) = setup().await;
        let customer_id = ID::default();
        let mut usecase = SyncCartUseCase {
            customer_id: customer_id.clone(),
            items: vec![item(1, 10.0)],
        };
        let res = usecase.execute(&ctx).await;
        assert_eq!(res, Err(UseCaseError::NotFound(customer_id)));
    }
}

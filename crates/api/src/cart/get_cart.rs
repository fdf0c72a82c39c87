use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use crate::error::StorefrontError;
use actix_web::{web, HttpRequest, HttpResponse};
use storefront_api_structs::get_cart::{APIResponse, PathParams};
use storefront_domain::{CartSnapshot, ID};
use storefront_infra::StorefrontContext;

pub async fn get_cart_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<StorefrontContext>,
) -> Result<HttpResponse, StorefrontError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetCartUseCase {
        customer_id: path.customer_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|cart| HttpResponse::Ok().json(APIResponse::new(cart)))
        .map_err(StorefrontError::from)
}

#[derive(Debug)]
struct GetCartUseCase {
    pub customer_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for StorefrontError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(customer_id) => Self::NotFound(format!(
                "The customer with id: {}, was not found.",
                customer_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetCartUseCase {
    type Response = CartSnapshot;

    type Error = UseCaseError;

    const NAME: &'static str = "GetCart";

    async fn execute(&mut self, ctx: &StorefrontContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.customers.find(&self.customer_id).await {
            Some(customer) => Ok(customer.cart),
            None => Err(UseCaseError::NotFound(self.customer_id.clone())),
        }
    }
}

use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use crate::error::StorefrontError;
use actix_web::{web, HttpRequest, HttpResponse};
use storefront_api_structs::complete_checkout::{APIResponse, RequestBody};
use storefront_domain::Customer;
use storefront_infra::StorefrontContext;
use tracing::info;

pub async fn complete_checkout_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<StorefrontContext>,
) -> Result<HttpResponse, StorefrontError> {
    protect_route(&http_req, &ctx)?;

    let usecase = CompleteCheckoutUseCase {
        customer_email: body.0.customer_email,
    };

    execute(usecase, &ctx)
        .await
        .map(|cleared| HttpResponse::Ok().json(APIResponse { cleared }))
        .map_err(StorefrontError::from)
}

/// Runs when a payment has been confirmed for an order.
///
/// The cart of the customer with the order email is cleared together with
/// its reminder state, which ends any pending abandoned cart sequence.
/// Orders from unknown emails (guest checkouts) are ignored, and handling
/// the same payment twice leaves the same state behind.
#[derive(Debug)]
pub struct CompleteCheckoutUseCase {
    pub customer_email: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidEmail(String),
    StorageError,
}

impl From<UseCaseError> for StorefrontError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEmail(email) => {
                Self::BadClientData(format!("Invalid customer email provided: {}", email))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CompleteCheckoutUseCase {
    /// Whether a customer cart was cleared
    type Response = bool;

    type Error = UseCaseError;

    const NAME: &'static str = "CompleteCheckout";

    async fn execute(&mut self, ctx: &StorefrontContext) -> Result<Self::Response, Self::Error> {
        let email = Customer::normalize_email(&self.customer_email);
        if !email.contains('@') {
            return Err(UseCaseError::InvalidEmail(self.customer_email.clone()));
        }

        let cleared = ctx
            .repos
            .customers
            .reset_cart_by_email(&email)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if cleared {
            info!("Cleared cart after completed checkout for: {}", email);
        }
        Ok(cleared)
    }
}

use crate::error::StorefrontError;
use actix_web::HttpRequest;
use storefront_infra::StorefrontContext;

/// Header that carries the api key of the storefront
pub const API_KEY_HEADER: &str = "storefront-api-key";

/// Only lets through requests that carry the configured api key
pub fn protect_route(http_req: &HttpRequest, ctx: &StorefrontContext) -> Result<(), StorefrontError> {
    let api_key = http_req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match api_key {
        Some(key) if key == ctx.config.api_key => Ok(()),
        Some(_) => Err(StorefrontError::Unauthorized(format!(
            "Invalid value provided in the `{}` header",
            API_KEY_HEADER
        ))),
        None => Err(StorefrontError::Unauthorized(format!(
            "Missing the `{}` header",
            API_KEY_HEADER
        ))),
    }
}

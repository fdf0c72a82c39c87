use actix_web::{web, HttpResponse};
use storefront_api_structs::get_service_health::*;
use storefront_infra::StorefrontContext;

async fn status(ctx: web::Data<StorefrontContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        mail_configured: ctx.mailer.is_configured(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}

mod complete_checkout;
mod get_cart;
pub mod send_cart_reminders;
mod sync_cart;

use actix_web::web;
use complete_checkout::complete_checkout_controller;
use get_cart::get_cart_controller;
use sync_cart::sync_cart_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/customer/{customer_id}/cart",
        web::put().to(sync_cart_controller),
    );
    cfg.route(
        "/customer/{customer_id}/cart",
        web::get().to(get_cart_controller),
    );

    cfg.route(
        "/checkout/completed",
        web::post().to(complete_checkout_controller),
    );
}

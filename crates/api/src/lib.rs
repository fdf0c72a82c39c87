mod cart;
mod error;
mod job_schedulers;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use std::net::TcpListener;
use storefront_infra::StorefrontContext;
use tracing_actix_web::TracingLogger;

pub use cart::send_cart_reminders::CycleReport;
pub use job_schedulers::{run_cart_nurture_cycle, CartNurtureScheduler};
pub use shared::auth::API_KEY_HEADER;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    cart::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    scheduler: CartNurtureScheduler,
}

impl Application {
    pub async fn new(context: StorefrontContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let mut scheduler = CartNurtureScheduler::new(context);
        scheduler.start();

        Ok(Self {
            server,
            port,
            scheduler,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: StorefrontContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Serves requests until the server shuts down, then stops the
    /// abandoned cart scheduler
    pub async fn start(self) -> Result<(), std::io::Error> {
        let Self {
            server,
            mut scheduler,
            ..
        } = self;
        let res = server.await;
        scheduler.stop();
        res
    }
}

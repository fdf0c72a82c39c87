use storefront_api::{Application, API_KEY_HEADER};
use storefront_infra::{Config, StorefrontContext};

pub struct TestApp {
    pub config: Config,
    pub ctx: StorefrontContext,
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    /// Request builder that carries the api key
    pub fn authorized(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(API_KEY_HEADER, &self.config.api_key)
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let mut ctx = StorefrontContext::create_inmemory();
    ctx.config.port = 0; // Random port

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        config,
        ctx,
        address,
        client: reqwest::Client::new(),
    }
}

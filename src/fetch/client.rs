use async_trait::async_trait;
use reqwest::{Request, Response};

/// Anything that can send a prepared request.
///
/// Lets authentication be layered as wrappers (see [`super::auth::ApiKey`])
/// and lets tests point the Eventbrite client at a mock server.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}


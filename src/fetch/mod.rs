//! HTTP plumbing shared by the ticketing clients.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

/// Issues a GET for `url` through `client`.
pub async fn fetch<C: HttpClient>(client: &C, url: reqwest::Url) -> reqwest::Result<reqwest::Response> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);
    client.execute(req).await
}

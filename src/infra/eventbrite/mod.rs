//! Eventbrite v3 REST API client.
//!
//! [`EventbriteClient`] implements [`TicketingApi`](crate::services::ticketing_api::TicketingApi)
//! on top of any [`HttpClient`](crate::fetch::HttpClient); wire types live in
//! [`models`] and are converted into the crate's own records at the edge.

mod client;
pub mod error;
pub mod models;

pub use client::{DEFAULT_API_BASE, EventbriteClient};
pub use error::EventbriteError;

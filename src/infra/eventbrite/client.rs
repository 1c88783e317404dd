use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::error::EventbriteError;
use super::models::{AttendeesPage, EventDto, EventsPage, OrganizationsPage, Page};
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, fetch};
use crate::registration::RegistrationRecord;
use crate::services::ticketing_api::{Event, TicketingApi};

pub const DEFAULT_API_BASE: &str = "https://www.eventbriteapi.com/v3";

pub struct EventbriteClient<C> {
    http: C,
    base_url: String,
}

impl EventbriteClient<ApiKey<BasicClient>> {
    /// Creates a client that authenticates with a private `token`.
    pub fn from_token(token: &str, base_url: &str) -> Result<Self, EventbriteError> {
        let basic = BasicClient::new().map_err(|e| EventbriteError::RequestFailed(e.to_string()))?;
        let http = ApiKey::bearer(basic, token)
            .map_err(|e| EventbriteError::InvalidToken(e.to_string()))?;
        Ok(Self::new(http, base_url))
    }
}

impl<C: HttpClient> EventbriteClient<C> {
    pub fn new(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, EventbriteError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url =
            Url::parse(&raw).map_err(|e| EventbriteError::InvalidUrl(format!("{raw}: {e}")))?;
        // `query_pairs_mut` leaves a bare `?` behind even for an empty list.
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, EventbriteError> {
        debug!(url = %url, "GET");
        let response = fetch(&self.http, url)
            .await
            .map_err(|e| EventbriteError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|e| EventbriteError::ResponseParseFailed(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(EventbriteError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(EventbriteError::RateLimited),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(EventbriteError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }

    /// Follows `continuation` tokens until the API reports no more items.
    ///
    /// Stops with a warning when a token comes back that was already
    /// requested, so a misbehaving server cannot loop us forever.
    async fn get_all<P>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<P::Item>, EventbriteError>
    where
        P: Page + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut continuation: Option<String> = None;
        let mut seen: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let url = {
                let mut params = query.to_vec();
                if let Some(token) = continuation.as_deref() {
                    params.push(("continuation", token));
                }
                self.endpoint(path, &params)?
            };

            let page: P = self.get_json(url).await?;
            let (batch, pagination) = page.into_parts();
            pages += 1;
            items.extend(batch);

            if !pagination.has_more_items {
                break;
            }
            match pagination.continuation {
                Some(next) if !seen.insert(next.clone()) => {
                    warn!(path, pages, continuation = %next, "Continuation token repeated; stopping");
                    break;
                }
                Some(next) => continuation = Some(next),
                None => {
                    warn!(path, pages, "More items reported but no continuation token; stopping");
                    break;
                }
            }
        }

        debug!(path, pages, items = items.len(), "Pagination complete");
        Ok(items)
    }
}

#[async_trait]
impl<C: HttpClient> TicketingApi for EventbriteClient<C> {
    #[tracing::instrument(skip(self))]
    async fn organization_id(&self) -> Result<String> {
        let page: OrganizationsPage = self
            .get_json(self.endpoint("users/me/organizations/", &[])?)
            .await?;

        let org = page
            .organizations
            .into_iter()
            .next()
            .ok_or(EventbriteError::NoOrganization)?;
        Ok(org.id)
    }

    #[tracing::instrument(skip(self))]
    async fn next_event(&self, org_id: &str) -> Result<Event> {
        let url = self.endpoint(
            &format!("organizations/{org_id}/events/"),
            &[
                ("status", "live,started"),
                ("order_by", "start_asc"),
                ("page_size", "1"),
                ("expand", "venue"),
            ],
        )?;
        let page: EventsPage = self.get_json(url).await?;

        let event = page
            .events
            .into_iter()
            .next()
            .map(Event::from)
            .ok_or_else(|| EventbriteError::NoUpcomingEvent(org_id.to_string()))?;

        info!(event_id = %event.id, title = %event.title, "Next event found");
        Ok(event)
    }

    #[tracing::instrument(skip(self))]
    async fn past_events(&self, org_id: &str) -> Result<Vec<Event>> {
        let events = self
            .get_all::<EventsPage>(
                &format!("organizations/{org_id}/events/"),
                &[
                    ("time_filter", "past"),
                    ("order_by", "start_asc"),
                    ("expand", "venue"),
                ],
            )
            .await?;

        info!(count = events.len(), "Past events fetched");
        Ok(events.into_iter().map(Event::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn event(&self, event_id: &str) -> Result<Event> {
        let url = self.endpoint(&format!("events/{event_id}/"), &[("expand", "venue")])?;
        let dto: EventDto = self.get_json(url).await?;
        Ok(Event::from(dto))
    }

    #[tracing::instrument(skip(self))]
    async fn attendees(&self, event_id: &str) -> Result<Vec<RegistrationRecord>> {
        let attendees = self
            .get_all::<AttendeesPage>(&format!("events/{event_id}/attendees/"), &[])
            .await?;

        debug!(count = attendees.len(), "Attendees fetched");
        Ok(attendees.into_iter().map(RegistrationRecord::from).collect())
    }
}

use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue, InvalidHeaderValue};

/// An [`HttpClient`] wrapper that injects a credential header into every request.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Uses `Authorization: Bearer <token>`, which is how Eventbrite private
    /// tokens are sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains characters not allowed in a header.
    pub fn bearer(inner: C, token: &str) -> Result<Self, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name: AUTHORIZATION,
            value,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_rejects_newline() {
        assert!(ApiKey::bearer((), "abc\ndef").is_err());
    }

    #[test]
    fn test_bearer_value_is_sensitive() {
        let key = ApiKey::bearer((), "secret").unwrap();
        assert_eq!(key.header_name, AUTHORIZATION);
        assert!(key.value.is_sensitive());
        assert_eq!(key.value.to_str().unwrap(), "Bearer secret");
    }
}

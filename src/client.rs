use crate::error::AuthError;

const DEFAULT_API_BASE_URL: &str = "https://api.allegro.pl";
const ALLEGRO_MEDIA_TYPE: &str = "application/vnd.allegro.public.v1+json";

/// Bearer-authenticated caller for Allegro REST routes.
///
/// Holds the access token obtained from
/// [`DeviceAuthorizer::authorize`](crate::DeviceAuthorizer::authorize) and
/// attaches it, plus the Allegro public media type, to every request.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl ApiClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// GET a route relative to the API base, returning the raw response for
    /// the caller to decode. Non-2xx statuses are passed through untouched.
    pub async fn get(
        &self,
        route: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, AuthError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        );
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, ALLEGRO_MEDIA_TYPE)
            .query(query)
            .send()
            .await?;
        Ok(resp)
    }
}

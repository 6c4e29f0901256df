//! HTTP client for the places-search API (candidate businesses).
//!
//! Wraps the nearby-search, text-search, and place-details endpoints with
//! typed status handling, pagination, and retry on transient faults.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{PlaceDetails, PlaceDetailsResponse, PlaceResult, PlacesSearchResponse};

/// Maximum number of result pages to follow per search. The live API stops
/// after three pages; this guards against a cycling token.
const MAX_PAGES: usize = 20;

/// Fields requested from the details endpoint; phone is the one we actually
/// need, the rest refine the address.
const DETAILS_FIELDS: &str = "name,formatted_address,formatted_phone_number,geometry,rating";

/// Places API search statuses that indicate a well-formed response.
fn is_success_status(status: &str) -> bool {
    matches!(status, "OK" | "ZERO_RESULTS")
}

/// HTTP client for a places-search API.
///
/// `base_url` is the scheme+host prefix (production:
/// `https://maps.googleapis.com`); injectable so tests can point at a local
/// mock server.
pub struct PlacesClient {
    client: Client,
    base: reqwest::Url,
    api_key: String,
    max_retries: u32,
    backoff_base_secs: u64,
    /// Delay before a `next_page_token` becomes usable. The live API
    /// rejects tokens used immediately.
    page_token_delay_ms: u64,
}

impl PlacesClient {
    /// Creates a `PlacesClient` with configured timeout, user agent, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not
    /// parse, or [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        page_token_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let base = reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base,
            api_key: api_key.to_owned(),
            max_retries,
            backoff_base_secs,
            page_token_delay_ms,
        })
    }

    /// Searches for places of `place_type` within `radius_meters` of
    /// `center`, following pagination to the end.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::ApiStatus`] — the API rejected the request
    ///   (bad key, over quota, malformed parameters).
    /// - [`ScraperError::RateLimited`] / [`ScraperError::Http`] — transient
    ///   faults after all retries exhausted.
    /// - [`ScraperError::PaginationLimit`] — the token never terminated.
    pub async fn search_nearby(
        &self,
        center: (f64, f64),
        radius_meters: u32,
        place_type: &str,
    ) -> Result<Vec<PlaceResult>, ScraperError> {
        let first_url = {
            let mut url = self.endpoint_url("/maps/api/place/nearbysearch/json");
            url.query_pairs_mut()
                .append_pair("location", &format!("{},{}", center.0, center.1))
                .append_pair("radius", &radius_meters.to_string())
                .append_pair("type", place_type)
                .append_pair("key", &self.api_key);
            url
        };
        self.collect_pages(first_url, place_type).await
    }

    /// Searches for places matching a free-text `query`, following
    /// pagination to the end.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::search_nearby`].
    pub async fn search_text(&self, query: &str) -> Result<Vec<PlaceResult>, ScraperError> {
        let first_url = {
            let mut url = self.endpoint_url("/maps/api/place/textsearch/json");
            url.query_pairs_mut()
                .append_pair("query", query)
                .append_pair("key", &self.api_key);
            url
        };
        self.collect_pages(first_url, query).await
    }

    /// Fetches details (phone, refined address) for one place.
    ///
    /// Returns `Ok(None)` when the place has no details (`ZERO_RESULTS` /
    /// `NOT_FOUND`); hard API rejections are errors.
    ///
    /// # Errors
    ///
    /// Same transport errors as the search calls, plus
    /// [`ScraperError::ApiStatus`] for non-lookup-related API statuses.
    pub async fn place_details(
        &self,
        place_id: &str,
    ) -> Result<Option<PlaceDetails>, ScraperError> {
        let url = {
            let mut url = self.endpoint_url("/maps/api/place/details/json");
            url.query_pairs_mut()
                .append_pair("place_id", place_id)
                .append_pair("fields", DETAILS_FIELDS)
                .append_pair("key", &self.api_key);
            url
        };

        let body = self.fetch_with_retry(url.as_str()).await?;
        let parsed = serde_json::from_str::<PlaceDetailsResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("place details for {place_id}"),
                source: e,
            }
        })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed.result),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
            other => Err(ScraperError::ApiStatus {
                status: other.to_owned(),
                message: String::new(),
            }),
        }
    }

    /// Drives the pagination loop for one search, accumulating results.
    async fn collect_pages(
        &self,
        first_url: reqwest::Url,
        query_label: &str,
    ) -> Result<Vec<PlaceResult>, ScraperError> {
        let mut all_results = Vec::new();
        let mut url = first_url;

        for page in 0..MAX_PAGES {
            if page > 0 {
                tokio::time::sleep(Duration::from_millis(self.page_token_delay_ms)).await;
            }

            let body = self.fetch_with_retry(url.as_str()).await?;
            let parsed = serde_json::from_str::<PlacesSearchResponse>(&body).map_err(|e| {
                ScraperError::Deserialize {
                    context: format!("search page for \"{query_label}\""),
                    source: e,
                }
            })?;

            if !is_success_status(&parsed.status) {
                return Err(ScraperError::ApiStatus {
                    status: parsed.status,
                    message: parsed.error_message.unwrap_or_default(),
                });
            }

            tracing::debug!(
                query = query_label,
                page,
                results = parsed.results.len(),
                "places search page fetched"
            );
            all_results.extend(parsed.results);

            let Some(token) = parsed.next_page_token else {
                return Ok(all_results);
            };
            let mut next = self.endpoint_url(url.path());
            next.query_pairs_mut()
                .append_pair("pagetoken", &token)
                .append_pair("key", &self.api_key);
            url = next;
        }

        Err(ScraperError::PaginationLimit {
            query: query_label.to_owned(),
            max_pages: MAX_PAGES,
        })
    }

    /// Fetches a URL with retry, mapping HTTP statuses to typed errors and
    /// returning the response body.
    async fn fetch_with_retry(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        domain: domain_of(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Joins an endpoint path onto the base URL validated at construction.
    fn endpoint_url(&self, endpoint_path: &str) -> reqwest::Url {
        let mut url = self.base.clone();
        url.set_path(endpoint_path);
        url.set_query(None);
        url
    }
}

/// Hostname portion of a URL for rate-limit error context.
fn domain_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

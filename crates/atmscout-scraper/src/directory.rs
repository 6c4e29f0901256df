//! Scraper for the existing-ATM directory site.
//!
//! The directory exposes a city listing page linking to per-ATM detail
//! pages. Extraction is regex-based over the raw HTML: listing pages yield
//! detail links plus coarse name/operator text, detail pages yield the
//! operator, address, and coordinates from the map embed. Every field is
//! best-effort — a machine with no resolvable operator is recorded as
//! `"Unknown"` rather than dropped.

use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::types::RawAtmListing;

/// HTTP client for the ATM directory site.
pub struct AtmDirectoryClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
    /// Pause between detail-page fetches to stay polite.
    inter_request_delay_ms: u64,
}

impl AtmDirectoryClient {
    /// Creates a directory client with configured timeout, user agent, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        inter_request_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
            inter_request_delay_ms,
        })
    }

    /// Scrapes all ATMs for one city: fetches the listing page, then each
    /// detail page for coordinates and operator.
    ///
    /// Detail-page failures are logged and skipped — one broken page should
    /// not lose the whole city — but a failed listing page is fatal since
    /// there is nothing to enumerate.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the city listing page fetch.
    pub async fn scrape_city(&self, city_url: &str) -> Result<Vec<RawAtmListing>, ScraperError> {
        let listing_html = self.fetch_page(city_url).await?;
        let paths = parse_listing_paths(&listing_html);
        tracing::info!(city_url, atms = paths.len(), "directory listing fetched");

        let base = base_origin(city_url);
        let mut atms = Vec::with_capacity(paths.len());

        for (i, path) in paths.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms)).await;
            }

            let detail_url = if path.starts_with("http") {
                path.clone()
            } else {
                format!("{base}{path}")
            };

            match self.fetch_page(&detail_url).await {
                Ok(html) => {
                    let mut atm = parse_detail(&html);
                    atm.detail_url = Some(detail_url);
                    if atm.operator.is_empty() {
                        atm.operator = "Unknown".to_owned();
                    }
                    atms.push(atm);
                }
                Err(e) => {
                    tracing::warn!(url = %detail_url, error = %e, "skipping ATM detail page");
                }
            }
        }

        Ok(atms)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
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
}

/// Detail-page paths from a city listing page, deduplicated in first-seen
/// order.
pub(crate) fn parse_listing_paths(html: &str) -> Vec<String> {
    let re = Regex::new(r#"href\s*=\s*["'](/bitcoin_atm/\d+/[^"']*)["']"#).expect("valid regex");
    let mut seen = std::collections::HashSet::new();
    re.captures_iter(html)
        .map(|c| c[1].to_owned())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Best-effort field extraction from an ATM detail page. Missing fields
/// stay at their defaults (empty strings / `None`).
pub(crate) fn parse_detail(html: &str) -> RawAtmListing {
    let mut atm = RawAtmListing {
        operator: extract_class_text(html, "operator"),
        location_name: extract_class_text(html, "location-name"),
        address: extract_class_text(html, "address"),
        ..RawAtmListing::default()
    };
    if atm.location_name.is_empty() {
        atm.location_name = extract_class_text(html, "title");
    }

    if let Some((lat, lng)) = parse_coordinates(html) {
        atm.latitude = Some(lat);
        atm.longitude = Some(lng);
    }

    atm
}

/// Coordinates from map-embed data attributes, falling back to an inline
/// `LatLng(lat, lng)` script call.
pub(crate) fn parse_coordinates(html: &str) -> Option<(f64, f64)> {
    let attr_re = Regex::new(
        r#"data-lat(?:itude)?\s*=\s*["'](-?[0-9.]+)["'][^>]*data-l(?:ng|ongitude)\s*=\s*["'](-?[0-9.]+)["']"#,
    )
    .expect("valid regex");
    let script_re = Regex::new(r"LatLng\(\s*(-?[0-9.]+)\s*,\s*(-?[0-9.]+)\s*\)")
        .expect("valid regex");

    let caps = attr_re.captures(html).or_else(|| script_re.captures(html))?;
    let lat = caps[1].parse::<f64>().ok()?;
    let lng = caps[2].parse::<f64>().ok()?;
    Some((lat, lng))
}

/// Inner text of the first element whose `class` attribute contains
/// `class_fragment`.
fn extract_class_text(html: &str, class_fragment: &str) -> String {
    let pattern = format!(
        r#"class\s*=\s*["'][^"']*{}[^"']*["'][^>]*>([^<]+)<"#,
        regex::escape(class_fragment)
    );
    let re = Regex::new(&pattern).expect("valid regex");
    re.captures(html)
        .map(|c| c[1].trim().to_owned())
        .unwrap_or_default()
}

/// Scheme + host of a URL, for resolving relative detail links.
fn base_origin(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.host_str()
                .map(|h| format!("{}://{}", u.scheme(), h))
        })
        .unwrap_or_default()
}

fn domain_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r#"
        <div class="atm-list">
          <a href="/bitcoin_atm/1234/">Sunny Mart</a>
          <a href="/bitcoin_atm/5678/">Quick Stop</a>
          <a href="/bitcoin_atm/1234/">Sunny Mart (dup)</a>
          <a href="/other/999/">Not an ATM</a>
        </div>
    "#;

    #[test]
    fn listing_paths_extracted_and_deduped_in_order() {
        let paths = parse_listing_paths(LISTING_HTML);
        assert_eq!(paths, vec!["/bitcoin_atm/1234/", "/bitcoin_atm/5678/"]);
    }

    #[test]
    fn detail_extracts_operator_name_and_address() {
        let html = r#"
            <span class="operator-name">Bitcoin Depot</span>
            <h1 class="location-name">Sunny Mart</h1>
            <div class="address">123 Main St, Miami, FL</div>
        "#;
        let atm = parse_detail(html);
        assert_eq!(atm.operator, "Bitcoin Depot");
        assert_eq!(atm.location_name, "Sunny Mart");
        assert_eq!(atm.address, "123 Main St, Miami, FL");
    }

    #[test]
    fn detail_coordinates_from_data_attributes() {
        let html = r#"<div id="map" data-lat="25.7617" data-lng="-80.1918"></div>"#;
        assert_eq!(parse_coordinates(html), Some((25.7617, -80.1918)));
    }

    #[test]
    fn detail_coordinates_from_script_fallback() {
        let html = "var pos = new google.maps.LatLng(25.77, -80.20);";
        assert_eq!(parse_coordinates(html), Some((25.77, -80.20)));
    }

    #[test]
    fn detail_without_coordinates_yields_none() {
        assert_eq!(parse_coordinates("<div>no map here</div>"), None);
    }

    #[test]
    fn detail_with_nothing_recognizable_stays_default() {
        let atm = parse_detail("<html><body>sparse page</body></html>");
        assert!(atm.operator.is_empty());
        assert!(atm.location_name.is_empty());
        assert!(atm.address.is_empty());
        assert!(atm.latitude.is_none());
    }

    #[test]
    fn base_origin_strips_path() {
        assert_eq!(
            base_origin("https://coinatmradar.com/city/52/bitcoin-atm-miami/"),
            "https://coinatmradar.com"
        );
    }
}

use std::time::Duration;

use tracing::{debug, warn};

use crate::foundation::error::{DeckError, DeckResult};

/// Longest hint accepted by the remote providers.
const MAX_QUERY_LEN: usize = 120;
/// Query substituted when sanitization leaves nothing usable.
const DEFAULT_QUERY: &str = "abstract background";

/// A remote image-search service queried with a sanitized hint.
///
/// `Ok(None)` means the provider is unconfigured or returned an empty result
/// set; `Err` covers timeouts, transport failures and non-success statuses.
/// The acquisition pipeline treats both the same way: move to the next tier.
pub trait ImageProvider {
    /// Provider name used in log breadcrumbs.
    fn name(&self) -> &'static str;

    /// Search for one image matching `query` and return its encoded bytes.
    fn search(&self, query: &str) -> DeckResult<Option<Vec<u8>>>;
}

/// Sanitize a raw image hint into a provider query.
///
/// Strips newlines, quotes, brackets and colons, collapses whitespace,
/// truncates to a bounded length, and substitutes a generic default phrase if
/// the result is empty.
pub fn sanitize_hint(hint: &str) -> String {
    let stripped: String = hint
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .filter(|c| !matches!(c, '"' | '\'' | '(' | ')' | '{' | '}' | '[' | ']' | ':'))
        .collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut query = collapsed;
    if query.len() > MAX_QUERY_LEN {
        let mut cut = MAX_QUERY_LEN;
        while !query.is_char_boundary(cut) {
            cut -= 1;
        }
        query.truncate(cut);
    }
    if query.is_empty() {
        return DEFAULT_QUERY.to_string();
    }
    query
}

/// Primary provider: the Unsplash search API.
pub struct UnsplashProvider {
    access_key: Option<String>,
    search_timeout: Duration,
    download_timeout: Duration,
}

impl UnsplashProvider {
    /// Construct with an optional access key; absent means unconfigured.
    pub fn new(
        access_key: Option<String>,
        search_timeout: Duration,
        download_timeout: Duration,
    ) -> Self {
        UnsplashProvider {
            access_key: access_key.filter(|k| !k.trim().is_empty()),
            search_timeout,
            download_timeout,
        }
    }
}

impl ImageProvider for UnsplashProvider {
    fn name(&self) -> &'static str {
        "unsplash"
    }

    fn search(&self, query: &str) -> DeckResult<Option<Vec<u8>>> {
        let Some(key) = self.access_key.as_deref() else {
            debug!(provider = self.name(), "no credential configured, skipping");
            return Ok(None);
        };

        let body = http_get_json(
            "https://api.unsplash.com/search/photos",
            &[
                ("query", query),
                ("per_page", "1"),
                ("content_filter", "high"),
            ],
            &[
                ("Authorization", &format!("Client-ID {key}")),
                ("Accept-Version", "v1"),
            ],
            self.search_timeout,
        )?;

        let Some(url) = body
            .pointer("/results/0/urls/regular")
            .or_else(|| body.pointer("/results/0/urls/full"))
            .and_then(|v| v.as_str())
        else {
            return Ok(None);
        };
        download_bytes(url, self.download_timeout).map(Some)
    }
}

/// Secondary provider: the Pexels search API.
pub struct PexelsProvider {
    api_key: Option<String>,
    search_timeout: Duration,
    download_timeout: Duration,
}

impl PexelsProvider {
    /// Construct with an optional API key; absent means unconfigured.
    pub fn new(
        api_key: Option<String>,
        search_timeout: Duration,
        download_timeout: Duration,
    ) -> Self {
        PexelsProvider {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            search_timeout,
            download_timeout,
        }
    }
}

impl ImageProvider for PexelsProvider {
    fn name(&self) -> &'static str {
        "pexels"
    }

    fn search(&self, query: &str) -> DeckResult<Option<Vec<u8>>> {
        let Some(key) = self.api_key.as_deref() else {
            debug!(provider = self.name(), "no credential configured, skipping");
            return Ok(None);
        };

        let body = http_get_json(
            "https://api.pexels.com/v1/search",
            &[("query", query), ("per_page", "1")],
            &[("Authorization", key)],
            self.search_timeout,
        )?;

        let Some(url) = body
            .pointer("/photos/0/src/large")
            .or_else(|| body.pointer("/photos/0/src/original"))
            .and_then(|v| v.as_str())
        else {
            return Ok(None);
        };
        download_bytes(url, self.download_timeout).map(Some)
    }
}

fn http_get_json(
    url: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
    timeout: Duration,
) -> DeckResult<serde_json::Value> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DeckError::provider(format!("http client: {e}")))?;

    let mut req = client.get(url).query(query);
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    let resp = req
        .send()
        .map_err(|e| DeckError::provider(format!("request to {url} failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let snippet: String = resp.text().unwrap_or_default().chars().take(180).collect();
        warn!(%url, %status, %snippet, "image search returned non-success status");
        return Err(DeckError::provider(format!(
            "search at {url} returned {status}"
        )));
    }

    resp.json()
        .map_err(|e| DeckError::provider(format!("decode search response: {e}")))
}

fn download_bytes(url: &str, timeout: Duration) -> DeckResult<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DeckError::provider(format!("http client: {e}")))?;
    let resp = client
        .get(url)
        .send()
        .map_err(|e| DeckError::provider(format!("image download failed: {e}")))?;
    if !resp.status().is_success() {
        return Err(DeckError::provider(format!(
            "image download returned {}",
            resp.status()
        )));
    }
    let bytes = resp
        .bytes()
        .map_err(|e| DeckError::provider(format!("image download body: {e}")))?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;

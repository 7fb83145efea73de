//! Opaque cursors and the pagination envelope shared by list endpoints.
//!
//! A [`Cursor`] wraps an ordering key chosen by the caller and a
//! [`Direction`]. Cursors travel to clients as URL-safe base64 of their JSON
//! form, so handlers never expose the key layout. [`Paginated`] is the JSON
//! envelope returned by list endpoints, carrying the page data alongside
//! `self`/`next`/`prev` links built by [`PaginationLinks::from_request`].

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: usize = 20;
/// Largest page size a client may request.
pub const MAX_LIMIT: usize = 100;

/// Which side of the cursor key a page reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rows ordered after the key.
    #[default]
    Next,
    /// Rows ordered before the key.
    Prev,
}

/// Failure decoding a client-supplied cursor.
#[derive(Debug, Error)]
pub enum CursorError {
    /// The token is not valid URL-safe base64.
    #[error("cursor is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// The decoded bytes do not describe a cursor for this endpoint.
    #[error("cursor payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Position within an ordered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor<K> {
    key: K,
    #[serde(default)]
    dir: Direction,
}

impl<K> Cursor<K> {
    /// Cursor reading forward from `key`.
    pub const fn next(key: K) -> Self {
        Self {
            key,
            dir: Direction::Next,
        }
    }

    /// Cursor reading backward from `key`.
    pub const fn prev(key: K) -> Self {
        Self {
            key,
            dir: Direction::Prev,
        }
    }

    /// Ordering key the cursor points at.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Reading direction.
    pub const fn direction(&self) -> Direction {
        self.dir
    }

    /// Consume the cursor, returning its key.
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Encode as an opaque token.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Payload`] if the key cannot be serialized.
    pub fn encode(&self) -> Result<String, CursorError> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Decode a token produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] when the token is not base64 or does not hold
    /// a cursor with the expected key shape.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD.decode(token.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Query parameters accepted by paginated endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Opaque cursor from a previous response's links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Requested page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl PageParams {
    /// Page size clamped to `1..=MAX_LIMIT`, defaulting to [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.map_or(DEFAULT_LIMIT, |n| n.clamp(1, MAX_LIMIT))
    }

    /// Decode the cursor parameter, if any.
    ///
    /// # Errors
    ///
    /// Propagates [`CursorError`] from [`Cursor::decode`].
    pub fn cursor<K: DeserializeOwned>(&self) -> Result<Option<Cursor<K>>, CursorError> {
        self.cursor.as_deref().map(Cursor::decode).transpose()
    }
}

/// Navigation links for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    /// The request that produced this page.
    #[serde(rename = "self")]
    pub self_: String,
    /// Following page, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Preceding page, absent on the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl PaginationLinks {
    /// Build links from the request URL and the neighbouring cursor tokens.
    ///
    /// Existing `cursor` and `limit` parameters are replaced; every other
    /// query parameter is preserved so filters carry across pages.
    #[must_use]
    pub fn from_request(
        request: &Url,
        limit: usize,
        next: Option<&str>,
        prev: Option<&str>,
    ) -> Self {
        Self {
            self_: request.to_string(),
            next: next.map(|token| with_cursor(request, limit, token)),
            prev: prev.map(|token| with_cursor(request, limit, token)),
        }
    }
}

fn with_cursor(request: &Url, limit: usize, token: &str) -> String {
    let mut url = request.clone();
    let kept: Vec<(String, String)> = request
        .query_pairs()
        .filter(|(name, _)| name != "cursor" && name != "limit")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("limit", &limit.to_string())
        .append_pair("cursor", token);
    url.to_string()
}

/// Page of results with navigation links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Page size used to produce the page.
    pub limit: usize,
    /// Links to this and neighbouring pages.
    pub links: PaginationLinks,
}

impl<T> Paginated<T> {
    /// Assemble a page.
    pub const fn new(data: Vec<T>, limit: usize, links: PaginationLinks) -> Self {
        Self { data, limit, links }
    }
}

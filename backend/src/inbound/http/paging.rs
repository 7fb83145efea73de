//! Cursor pagination for list endpoints.

use actix_web::HttpRequest;
use pagination::{Cursor, CursorError, PageParams, Paginated, PaginationLinks};
use serde::Serialize;
use serde::de::DeserializeOwned;
use utoipa::IntoParams;

use crate::domain::{Error, page_by_key};
use crate::inbound::http::validation::parse_cursor;

/// Cursor parameters shared by list endpoints.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI parameter generation via utoipa"
)]
pub struct PageQuery {
    /// Opaque cursor from a previous page's links.
    cursor: Option<String>,
    /// Page size, 1 to 100 (default 20).
    limit: Option<usize>,
}

fn encode<K: Serialize>(cursor: Cursor<K>) -> Result<String, Error> {
    cursor
        .encode()
        .map_err(|error: CursorError| Error::internal(format!("failed to encode cursor: {error}")))
}

/// Cut the page requested by `params` out of `rows`.
///
/// `rows` must already be sorted by `key`. Links keep every other query
/// parameter of the request so filters survive navigation.
pub(crate) fn paginate<T, K, F>(
    request: &HttpRequest,
    params: &PageParams,
    rows: Vec<T>,
    key: F,
) -> Result<Paginated<T>, Error>
where
    K: Ord + Serialize + DeserializeOwned,
    F: Fn(&T) -> K,
{
    let cursor = parse_cursor::<K>(params)?;
    let limit = params.limit();
    let page = page_by_key(rows, cursor.as_ref(), limit, key);
    let next = page.next.map(|key| encode(Cursor::next(key))).transpose()?;
    let prev = page.prev.map(|key| encode(Cursor::prev(key))).transpose()?;
    let links = PaginationLinks::from_request(
        &request.full_url(),
        limit,
        next.as_deref(),
        prev.as_deref(),
    );
    Ok(Paginated::new(page.items, limit, links))
}

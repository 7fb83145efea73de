//! Keyset paging over listings already ordered in memory.
//!
//! Rows must be sorted ascending by the key function. Cursors carry the key
//! of the boundary row, so a page stays stable when rows are added elsewhere
//! in the listing.

use pagination::{Cursor, Direction};

/// One page of rows with the keys bounding its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedPage<T, K> {
    pub items: Vec<T>,
    /// Key to continue forward from, absent on the last page.
    pub next: Option<K>,
    /// Key to continue backward from, absent on the first page.
    pub prev: Option<K>,
}

/// Slice `rows` into the page selected by `cursor`.
///
/// # Examples
/// ```
/// use muncho_crm::domain::page_by_key;
/// use pagination::Cursor;
///
/// let first = page_by_key(vec![1, 2, 3, 4, 5], None, 2, |n| *n);
/// assert_eq!(first.items, vec![1, 2]);
/// let second = page_by_key(vec![1, 2, 3, 4, 5], Some(&Cursor::next(2)), 2, |n| *n);
/// assert_eq!(second.items, vec![3, 4]);
/// assert_eq!(second.prev, Some(3));
/// ```
pub fn page_by_key<T, K, F>(rows: Vec<T>, cursor: Option<&Cursor<K>>, limit: usize, key: F) -> KeyedPage<T, K>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let limit = limit.max(1);
    let len = rows.len();
    let (start, end) = match cursor {
        None => (0, limit.min(len)),
        Some(cursor) => match cursor.direction() {
            Direction::Next => {
                let start = rows.partition_point(|row| key(row) <= *cursor.key());
                (start, start.saturating_add(limit).min(len))
            }
            Direction::Prev => {
                let end = rows.partition_point(|row| key(row) < *cursor.key());
                (end.saturating_sub(limit), end)
            }
        },
    };

    let items: Vec<T> = rows.into_iter().skip(start).take(end - start).collect();
    let next = (end < len).then(|| items.last().map(&key)).flatten();
    let prev = (start > 0).then(|| items.first().map(&key)).flatten();
    KeyedPage { items, next, prev }
}

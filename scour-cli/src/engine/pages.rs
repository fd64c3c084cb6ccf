//! Page walking
//!
//! The list endpoints hand out fixed-size pages; these helpers drive them as
//! a lazy, finite, non-restartable sequence. Pages are fetched strictly one
//! at a time so a stop predicate can be evaluated before the next request is
//! issued; the next page is never fetched once the predicate fires or a
//! short page signals the end.

use std::future::Future;

use anyhow::Result;

/// Collects pages until `stop_after` fires or a short page ends pagination.
///
/// `fetch` is called with 1-based page indices. `stop_after` sees each page
/// after it is fetched; when it returns true, that page is still included in
/// the output but no further page is requested.
pub(crate) async fn collect_until<T, F, Fut>(
    per_page: usize,
    mut fetch: F,
    mut stop_after: impl FnMut(&[T]) -> bool,
) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = fetch(page).await?;
        let batch_len = batch.len();
        let stop = stop_after(&batch);

        items.extend(batch);

        if stop || batch_len < per_page {
            return Ok(items);
        }

        page += 1;
    }
}

/// Collects every page until a short page ends pagination.
pub(crate) async fn collect_all<T, F, Fut>(per_page: usize, fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    collect_until(per_page, fetch, |_| false).await
}

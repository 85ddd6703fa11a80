//! Bounded page-by-page accumulation for sources that paginate instead of
//! scroll-loading.

use crate::sources::SourceError;
use async_trait::async_trait;
use std::time::Duration;

/// A cursor over a paginated listing.
///
/// `has_next` is the capability check for further pages: implementations map
/// whatever disabled-state convention the site uses (typically a marker class
/// on the "next" control) onto it, so the accumulation loop never string-
/// matches DOM attributes itself.
#[async_trait]
pub trait PageCursor: Send {
    type Record: Send;

    /// Extract the records on the current page, waiting for it to be ready.
    async fn read_page(&mut self) -> Result<Vec<Self::Record>, SourceError>;

    /// Whether a further page exists.
    async fn has_next(&mut self) -> Result<bool, SourceError>;

    /// Advance to the next page. Only called after `has_next` returned true.
    async fn next_page(&mut self) -> Result<(), SourceError>;
}

/// Accumulate records across pages until `has_next` reports false.
///
/// `max_pages` is a hard ceiling: if the site changes its disabled-state
/// convention and `has_next` never reports false, the loop stops there
/// instead of clicking forever. The cursor is never advanced after a
/// negative `has_next` or once the ceiling is reached.
pub async fn drain_pages<C>(
    cursor: &mut C,
    max_pages: u32,
    page_delay: Duration,
) -> Result<Vec<C::Record>, SourceError>
where
    C: PageCursor + ?Sized,
{
    let mut records = Vec::new();

    for page in 0..max_pages {
        records.extend(cursor.read_page().await?);

        if !cursor.has_next().await? {
            break;
        }
        if page + 1 == max_pages {
            tracing::warn!(max_pages, "pagination ceiling reached, stopping early");
            break;
        }

        tokio::time::sleep(page_delay).await;
        cursor.next_page().await?;
    }

    Ok(records)
}

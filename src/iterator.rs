use crate::r#trait::CatalogClient;
use crate::types::{ReleaseItem, ReleaseType};
use crate::Result;
use async_trait::async_trait;
use std::collections::VecDeque;

/// Page size used when paginating a release listing.
pub const PAGE_SIZE: u32 = 50;

/// Async iterator trait for paginated catalog data.
///
/// This trait provides a common interface for iterating over paginated data
/// from the catalog service. Iterators fetch pages lazily and surface items
/// one at a time.
#[async_trait(?Send)]
pub trait AsyncPaginatedIterator<T> {
    /// Fetch the next item from the iterator.
    ///
    /// This method automatically handles pagination, fetching new pages as
    /// needed. Returns `None` when there are no more items available.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(item))` - Next item in the sequence
    /// - `Ok(None)` - No more items available
    /// - `Err(...)` - Network or parsing error occurred
    async fn next(&mut self) -> Result<Option<T>>;

    /// Collect all remaining items into a Vec.
    ///
    /// This fetches every remaining page; a discography is bounded enough
    /// that this is the normal way to drain the iterator.
    async fn collect_all(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Take up to n items from the iterator.
    ///
    /// # Arguments
    ///
    /// * `n` - Maximum number of items to collect
    async fn take(&mut self, n: usize) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for _ in 0..n {
            match self.next().await? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(items)
    }

    /// Number of pages fetched so far.
    fn pages_fetched(&self) -> u32;

    /// Total number of items, if the service has reported one.
    fn total_items(&self) -> Option<u32> {
        None // Default implementation returns None
    }
}

/// Iterator over an artist's release listing.
///
/// Requests successive fixed-size pages starting at offset 0 and stops when
/// a page comes back shorter than the page size (or empty). Items are
/// yielded in API discovery order, before any filtering or enrichment.
pub struct ArtistReleasesIterator<'a, C: CatalogClient + ?Sized> {
    client: &'a C,
    artist_id: String,
    release_types: Vec<ReleaseType>,
    page_size: u32,
    next_offset: u32,
    buffer: VecDeque<ReleaseItem>,
    finished: bool,
    pages_fetched: u32,
    total: Option<u32>,
}

impl<'a, C: CatalogClient + ?Sized> ArtistReleasesIterator<'a, C> {
    pub fn new(client: &'a C, artist_id: &str, release_types: &[ReleaseType]) -> Self {
        Self::with_page_size(client, artist_id, release_types, PAGE_SIZE)
    }

    /// A custom page size is only useful in tests; the service caps pages
    /// at 50 anyway.
    pub fn with_page_size(
        client: &'a C,
        artist_id: &str,
        release_types: &[ReleaseType],
        page_size: u32,
    ) -> Self {
        Self {
            client,
            artist_id: artist_id.to_string(),
            release_types: release_types.to_vec(),
            page_size,
            next_offset: 0,
            buffer: VecDeque::new(),
            finished: false,
            pages_fetched: 0,
            total: None,
        }
    }
}

#[async_trait(?Send)]
impl<C: CatalogClient + ?Sized> AsyncPaginatedIterator<ReleaseItem>
    for ArtistReleasesIterator<'_, C>
{
    async fn next(&mut self) -> Result<Option<ReleaseItem>> {
        if self.buffer.is_empty() && !self.finished {
            log::debug!(
                "fetching release page for artist '{}' at offset {}",
                self.artist_id,
                self.next_offset
            );
            let page = self
                .client
                .get_artist_releases_page(
                    &self.artist_id,
                    &self.release_types,
                    self.page_size,
                    self.next_offset,
                )
                .await?;
            self.pages_fetched += 1;
            self.total = page.total.or(self.total);

            // A short or empty page is the terminal condition.
            if (page.items.len() as u32) < self.page_size {
                self.finished = true;
            }
            self.next_offset += self.page_size;
            self.buffer.extend(page.items);
        }
        Ok(self.buffer.pop_front())
    }

    fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    fn total_items(&self) -> Option<u32> {
        self.total
    }
}

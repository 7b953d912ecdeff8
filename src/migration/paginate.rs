use std::{future::Future, marker::PhantomData};

use crate::{
    error::ApiError,
    types::{Locator, Page},
};

/// Follows `next` locators from a starting page until a page has none.
///
/// Pages are fetched lazily, one call per [`Paginator::next_page`]. After a
/// failed fetch the paginator is exhausted; nothing is retried.
pub struct Paginator<T, F> {
    next: Option<Locator>,
    fetch: F,
    pages: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T, F, Fut> Paginator<T, F>
where
    F: FnMut(Locator) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    /// Creates a paginator that starts at `start`. Nothing is fetched yet.
    ///
    /// # Arguments
    ///
    /// * `start` - Locator of the first page
    /// * `fetch` - Loads one page; called once per page, in order
    ///
    /// # Example
    ///
    /// ```
    /// let tracks = Paginator::new(playlist.track_listing_locator.clone(), |locator| async move {
    ///     api.list_tracks_page(&credential, &locator).await
    /// })
    /// .collect_all()
    /// .await?;
    /// ```
    pub fn new(start: Locator, fetch: F) -> Self {
        Paginator {
            next: Some(start),
            fetch,
            pages: 0,
            _item: PhantomData,
        }
    }

    /// Items of the next page, or `None` once the last page was returned.
    pub async fn next_page(&mut self) -> Option<Result<Vec<T>, ApiError>> {
        let locator = self.next.take()?;

        match (self.fetch)(locator).await {
            Ok(page) => {
                self.pages += 1;
                // an empty string is treated like a missing link
                self.next = page.next.filter(|next| !next.as_str().is_empty());
                Some(Ok(page.items))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Number of pages fetched successfully so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Concatenates all pages in order. Any failed page fails the whole
    /// collection; items gathered before it are dropped.
    pub async fn collect_all(mut self) -> Result<Vec<T>, ApiError> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await {
            all.extend(page?);
        }
        Ok(all)
    }
}

// Page selection and the aggregation loop.
//
// Every selection mode is reduced to an ascending run of page numbers; the
// loop in `aggregate` walks that run and applies the same per-page rules
// for all modes. The only mode-specific decisions are what an empty page
// means and whether response metadata can end the run.

use crate::error::{FetchError, PageRangeError};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::{debug, info};

/// One certification record. The schema belongs to the remote API.
pub type Product = serde_json::Value;

/// Default cap on the number of pages an open-ended sweep may request.
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Which pages to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    Single(u32),
    Range { start: u32, end: u32 },
    /// Start at page 1 and follow the server's pagination metadata.
    OpenEnded,
}

impl PageSelection {
    pub fn single(page: u32) -> Result<Self, PageRangeError> {
        if page == 0 {
            return Err(PageRangeError::ZeroPage);
        }
        Ok(PageSelection::Single(page))
    }

    /// Inclusive range; `start > end` is rejected here so no request is ever
    /// issued for it.
    pub fn range(start: u32, end: u32) -> Result<Self, PageRangeError> {
        if start == 0 {
            return Err(PageRangeError::ZeroPage);
        }
        if start > end {
            return Err(PageRangeError::Reversed { start, end });
        }
        Ok(PageSelection::Range { start, end })
    }

    pub fn is_open_ended(&self) -> bool {
        matches!(self, PageSelection::OpenEnded)
    }

    /// Page numbers in issue order. Open-ended runs are bounded only by the
    /// loop's stop conditions.
    pub fn pages(&self) -> RangeInclusive<u32> {
        match *self {
            PageSelection::Single(page) => page..=page,
            PageSelection::Range { start, end } => start..=end,
            PageSelection::OpenEnded => 1..=u32::MAX,
        }
    }
}

/// Parses the `START-END` form used by `--page_range`.
impl FromStr for PageSelection {
    type Err = PageRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || PageRangeError::Format(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(format_err)?;
        let start: u32 = start.trim().parse().map_err(|_| format_err())?;
        let end: u32 = end.trim().parse().map_err(|_| format_err())?;
        PageSelection::range(start, end)
    }
}

/// Everything the data endpoint needs to serve one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub product_type: String,
    pub jsonld: bool,
}

/// Filter applied to every page of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub product_type: String,
    pub jsonld: bool,
}

impl ProductQuery {
    fn page(&self, page: u32) -> PageRequest {
        PageRequest {
            page,
            product_type: self.product_type.clone(),
            jsonld: self.jsonld,
        }
    }
}

/// Decoded body of the data endpoint. Missing sections decode as empty.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PageResponse {
    #[serde(default)]
    pub data: Option<PageData>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PageData {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, rename = "totalPages")]
    pub total_pages: Option<u32>,
}

impl PageResponse {
    pub fn new(products: Vec<Product>, meta: Option<PageMeta>) -> Self {
        PageResponse {
            data: Some(PageData { products }),
            meta,
        }
    }

    fn into_parts(self) -> (Vec<Product>, PageMeta) {
        (
            self.data.map(|d| d.products).unwrap_or_default(),
            self.meta.unwrap_or_default(),
        )
    }
}

/// Something that can serve pages. Implemented by the HTTP client; tests use
/// in-memory fakes.
pub trait PageSource {
    fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        (**self).fetch_page(request)
    }
}

/// How an aggregation run ended.
#[derive(Debug)]
pub enum Completion {
    /// Every page of a single page or fixed range was requested.
    ListExhausted,
    /// The server reported the final page of an open-ended sweep.
    LastPage { page: u32, total: u32 },
    /// An open-ended sweep hit a page with no records.
    EmptyPage { page: u32 },
    /// A page could not be fetched; later pages were not attempted.
    Failed { page: u32, error: FetchError },
    /// An open-ended sweep requested `limit` pages without reaching the end.
    PageLimit { limit: u32 },
}

/// Result of one run: the collected records plus what happened on the way.
#[derive(Debug)]
pub struct Aggregation {
    pub products: Vec<Product>,
    /// Every page a request was issued for, in issue order.
    pub requested_pages: Vec<u32>,
    /// Pages of a fixed selection that returned no records.
    pub skipped_pages: Vec<u32>,
    pub completion: Completion,
}

impl Aggregation {
    pub fn is_failed(&self) -> bool {
        matches!(self.completion, Completion::Failed { .. })
    }
}

/// Fetch the selected pages from `source` and concatenate their records.
///
/// A failed page stops the run but keeps everything gathered before it.
/// `max_pages` only bounds open-ended sweeps.
pub fn aggregate<S: PageSource>(
    source: S,
    query: &ProductQuery,
    selection: PageSelection,
    max_pages: u32,
) -> Aggregation {
    let open_ended = selection.is_open_ended();
    let mut products = Vec::new();
    let mut requested_pages = Vec::new();
    let mut skipped_pages = Vec::new();
    let mut completion = Completion::ListExhausted;

    for page in selection.pages() {
        if open_ended && requested_pages.len() as u64 >= u64::from(max_pages) {
            info!(limit = max_pages, "open-ended sweep reached the page limit");
            completion = Completion::PageLimit { limit: max_pages };
            break;
        }

        debug!(
            page,
            product_type = %query.product_type,
            jsonld = query.jsonld,
            "requesting page"
        );
        requested_pages.push(page);

        let response = match source.fetch_page(&query.page(page)) {
            Ok(response) => response,
            Err(error) => {
                info!(page, status = ?error.status(), %error, "request failed");
                completion = Completion::Failed { page, error };
                break;
            }
        };

        let (records, meta) = response.into_parts();
        if records.is_empty() {
            info!(page, "no products found on this page");
            if open_ended {
                completion = Completion::EmptyPage { page };
                break;
            }
            skipped_pages.push(page);
            continue;
        }

        info!(page, count = records.len(), "page fetched");
        products.extend(records);

        if open_ended {
            let current = meta.page.unwrap_or(page);
            let total = meta.total_pages.unwrap_or(current);
            info!(current, total, "pagination progress");
            if current >= total {
                completion = Completion::LastPage {
                    page: current,
                    total,
                };
                break;
            }
        }
    }

    Aggregation {
        products,
        requested_pages,
        skipped_pages,
        completion,
    }
}

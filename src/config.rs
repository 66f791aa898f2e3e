// Command-line configuration.

use crate::api::DEFAULT_BASE_URL;
use crate::pages::{PageSelection, ProductQuery, DEFAULT_MAX_PAGES};
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments. Credentials are deliberately absent: they are prompted for.
#[derive(Debug, Parser)]
#[command(name = "gtin-fetch")]
#[command(about = "Fetch product certification data from the TCO Certified API.")]
pub struct CliArgs {
    /// Product type to fetch.
    #[arg(
        long = "product_type",
        visible_alias = "product-type",
        default_value = "Desktops"
    )]
    pub product_type: String,

    /// Include JSON-LD in the response.
    #[arg(long)]
    pub jsonld: bool,

    /// Output filename.
    #[arg(long, default_value = "products.json")]
    pub output: PathBuf,

    /// Fetch only a specific page (e.g. --page 3).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), group = "pages")]
    pub page: Option<u32>,

    /// Fetch a range of pages (e.g. --page_range 2-5).
    #[arg(
        long = "page_range",
        visible_alias = "page-range",
        value_name = "START-END",
        value_parser = parse_page_range,
        group = "pages"
    )]
    pub page_range: Option<PageSelection>,

    /// Upper bound on pages requested when sweeping all pages.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_PAGES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_pages: u32,

    /// API base URL.
    #[arg(long, env = "TCO_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

fn parse_page_range(s: &str) -> Result<PageSelection, String> {
    s.parse().map_err(|e: crate::error::PageRangeError| e.to_string())
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub query: ProductQuery,
    pub selection: PageSelection,
    pub max_pages: u32,
    pub output: PathBuf,
}

impl CliArgs {
    /// Convert CLI args to a run configuration. No page flag means an
    /// open-ended sweep.
    pub fn to_config(&self) -> Config {
        let selection = match (self.page, self.page_range) {
            (Some(page), _) => PageSelection::Single(page),
            (None, Some(range)) => range,
            (None, None) => PageSelection::OpenEnded,
        };
        Config {
            base_url: self.base_url.clone(),
            query: ProductQuery {
                product_type: self.product_type.clone(),
                jsonld: self.jsonld,
            },
            selection,
            max_pages: self.max_pages,
            output: self.output.clone(),
        }
    }
}

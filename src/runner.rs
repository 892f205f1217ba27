use indicatif::ProgressBar;
use thiserror::Error;

use crate::catalogue::{self, Product};
use crate::fetcher::{self, EndpointConfig, HttpPageSource, PageSource};
use crate::parser;

#[derive(Clone, Debug)]
pub struct Options {
    pub endpoint: EndpointConfig,
    pub max_pages: u32,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            max_pages: 100,
            timeout_seconds: 30,
            proxy: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid max_pages {value}, expected positive integer")]
    InvalidMaxPages { value: u32 },

    #[error("invalid posts_per_page {value}, expected positive integer")]
    InvalidPostsPerPage { value: u32 },

    #[error("request for page {page} failed: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid {header} header value '{value}'")]
    InvalidHeader { header: &'static str, value: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("row {row} is missing its {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row} has an unparseable price '{raw}'")]
    Price { row: usize, raw: String },

    #[error("listing did not end within {max_pages} pages; raise max_pages if the catalogue really is that large")]
    PageCapExceeded { max_pages: u32 },

    #[error("failed to write export file '{path}': {source}")]
    ExportWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, ScrapeError> {
        if options.max_pages == 0 {
            return Err(ScrapeError::InvalidMaxPages { value: 0 });
        }
        if options.endpoint.posts_per_page == 0 {
            return Err(ScrapeError::InvalidPostsPerPage { value: 0 });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Runs the full pipeline: paginate the listing endpoint until an empty
    /// page, then sort the accumulated catalogue by price ascending.
    pub async fn run(&self, pb: &ProgressBar) -> Result<Vec<Product>, ScrapeError> {
        let client = fetcher::build_client(
            &self.options.endpoint,
            self.options.timeout_seconds,
            self.options.proxy.as_deref(),
        )?;
        let source = HttpPageSource::new(client, self.options.endpoint.clone());

        let mut products = fetch_all_pages(&source, self.options.max_pages, pb).await?;
        catalogue::sort_by_price(&mut products);
        Ok(products)
    }
}

/// Pagination driver. Terminates on the first page that parses to zero
/// rows; the cap turns a listing that never ends into a diagnosable error
/// instead of an infinite loop.
pub async fn fetch_all_pages<S: PageSource>(
    source: &S,
    max_pages: u32,
    pb: &ProgressBar,
) -> Result<Vec<Product>, ScrapeError> {
    let mut catalogue: Vec<Product> = Vec::new();
    let mut page = 1u32;

    loop {
        if page > max_pages {
            return Err(ScrapeError::PageCapExceeded { max_pages });
        }

        let html = source.fetch_page(page).await?;
        let products = parser::parse_listing(&html)?;
        if products.is_empty() {
            break;
        }

        pb.inc(1);
        pb.set_message(format!("page {page}: {} products", products.len()));
        catalogue.extend(products);
        page += 1;
    }

    Ok(catalogue)
}

use std::time::Duration;

use crate::runner::ScrapeError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// The fixed request shape of the storefront's AJAX listing endpoint.
/// This is an external contract (static action name, static nonce, static
/// filter string), kept as data so it can be updated from the config file
/// without touching the pipeline.
#[derive(Clone, Debug)]
pub struct EndpointConfig {
    pub url: String,
    pub referer: String,
    pub user_agent: String,
    pub action: String,
    pub nonce: String,
    pub filter_data: String,
    pub posts_per_page: u32,
    pub categories: String,
    pub attributes: Vec<String>,
    pub order_field: String,
    pub order_direction: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "https://helios-cannabis.de/wp-admin/admin-ajax.php".to_string(),
            referer: "https://helios-cannabis.de/sortiment/".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            action: "filter_products".to_string(),
            nonce: "e383327630".to_string(),
            filter_data: "stock_status=on&stock_status_onbackorder=on&list_view=on".to_string(),
            posts_per_page: 12,
            categories: "blueten,extrakte,shake".to_string(),
            attributes: [
                "pa_genetik",
                "pa_terpene",
                "pa_kultivar",
                "pa_thc-filter",
                "pa_cbd-filter",
                "pa_herkunftsland",
                "pa_hersteller",
                "kategorie",
                "list_view",
                "preis",
                "stock_status",
                "stock_status_onbackorder",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            order_field: "name".to_string(),
            order_direction: "ASC".to_string(),
        }
    }
}

impl EndpointConfig {
    /// Form body for one listing page. The attribute names repeat under the
    /// `attributes[]` key, matching the endpoint's PHP-array convention.
    pub fn form_pairs(&self, page: u32) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = vec![
            ("action".to_string(), self.action.clone()),
            ("nonce".to_string(), self.nonce.clone()),
            ("filter_data".to_string(), self.filter_data.clone()),
            (
                "posts_per_page".to_string(),
                self.posts_per_page.to_string(),
            ),
            ("paged".to_string(), page.to_string()),
            ("categories".to_string(), self.categories.clone()),
        ];
        for attribute in self.attributes.iter() {
            pairs.push(("attributes[]".to_string(), attribute.clone()));
        }
        pairs.push(("tableOrder[field]".to_string(), self.order_field.clone()));
        pairs.push(("tableOrder[order]".to_string(), self.order_direction.clone()));
        pairs
    }
}

pub fn build_client(
    endpoint: &EndpointConfig,
    timeout_seconds: usize,
    proxy: Option<&str>,
) -> Result<reqwest::Client, ScrapeError> {
    let mut headers = reqwest::header::HeaderMap::new();
    let user_agent = reqwest::header::HeaderValue::from_str(&endpoint.user_agent).map_err(|_| {
        ScrapeError::InvalidHeader {
            header: "user-agent",
            value: endpoint.user_agent.clone(),
        }
    })?;
    headers.insert(reqwest::header::USER_AGENT, user_agent);
    let referer = reqwest::header::HeaderValue::from_str(&endpoint.referer).map_err(|_| {
        ScrapeError::InvalidHeader {
            header: "referer",
            value: endpoint.referer.clone(),
        }
    })?;
    headers.insert(reqwest::header::REFERER, referer);
    headers.insert(
        "x-requested-with",
        reqwest::header::HeaderValue::from_static("XMLHttpRequest"),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(30));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| ScrapeError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ScrapeError::HttpClientBuild { source: e })
}

/// Seam between the pagination driver and the network, so the driver can be
/// exercised against canned pages.
pub trait PageSource {
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = Result<String, ScrapeError>>;
}

#[derive(Clone, Debug)]
pub struct HttpPageSource {
    client: reqwest::Client,
    endpoint: EndpointConfig,
}

impl HttpPageSource {
    pub fn new(client: reqwest::Client, endpoint: EndpointConfig) -> Self {
        Self { client, endpoint }
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: u32) -> Result<String, ScrapeError> {
        let response = self
            .client
            .post(&self.endpoint.url)
            .form(&self.endpoint.form_pairs(page))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ScrapeError::Transport { page, source: e })?;
        response
            .text()
            .await
            .map_err(|e| ScrapeError::Transport { page, source: e })
    }
}

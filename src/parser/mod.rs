use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;

use crate::catalogue::Product;
use crate::runner::ScrapeError;

/// Class prefix carried by the status marker div in the first column.
const STATUS_CLASS_PREFIX: &str = "product-status-round-";

/// Extracts one `Product` from a table row. The positional layout is the
/// only strategy in use, but the seam keeps the extraction method swappable
/// without changing the record shape downstream.
pub trait RowExtractor {
    fn extract(&self, row: ElementRef<'_>, index: usize) -> Result<Product, ScrapeError>;
}

/// Fixed-index column layout of the listing table:
/// status marker, name, cultivar, THC/CBD, genetics, price, detail link.
pub struct PositionalColumns {
    cell: Selector,
    div: Selector,
    anchor: Selector,
}

impl Default for PositionalColumns {
    fn default() -> Self {
        Self {
            cell: Selector::parse("td").unwrap(),
            div: Selector::parse("div").unwrap(),
            anchor: Selector::parse("a").unwrap(),
        }
    }
}

impl PositionalColumns {
    fn cell_text(cells: &[ElementRef<'_>], index: usize, row: usize, field: &'static str) -> Result<String, ScrapeError> {
        let cell = cells
            .get(index)
            .ok_or(ScrapeError::MissingField { row, field })?;
        Ok(cell.text().collect::<String>().trim().to_string())
    }
}

impl RowExtractor for PositionalColumns {
    fn extract(&self, row: ElementRef<'_>, index: usize) -> Result<Product, ScrapeError> {
        let cells: Vec<ElementRef<'_>> = row.select(&self.cell).collect();

        let status_div = cells
            .first()
            .and_then(|cell| cell.select(&self.div).next())
            .ok_or(ScrapeError::MissingField {
                row: index,
                field: "status marker",
            })?;
        let status_class =
            status_div
                .value()
                .classes()
                .next()
                .ok_or(ScrapeError::MissingField {
                    row: index,
                    field: "status class",
                })?;
        let stock_status = strip_status_prefix(status_class).to_string();

        let name = Self::cell_text(&cells, 1, index, "name")?;
        let cultivar = Self::cell_text(&cells, 2, index, "cultivar")?;
        let potency = Self::cell_text(&cells, 3, index, "THC/CBD")?;
        let genetics = Self::cell_text(&cells, 4, index, "genetics")?;

        let price_raw = cells
            .get(5)
            .and_then(|cell| cell.select(&self.div).next())
            .map(|div| div.text().collect::<String>().trim().to_string())
            .ok_or(ScrapeError::MissingField {
                row: index,
                field: "price",
            })?;
        let price = parse_price(&price_raw).ok_or(ScrapeError::Price {
            row: index,
            raw: price_raw,
        })?;

        let link = cells
            .get(6)
            .and_then(|cell| cell.select(&self.anchor).next())
            .and_then(|a| a.value().attr("href"))
            .ok_or(ScrapeError::MissingField {
                row: index,
                field: "detail link",
            })?
            .to_string();

        Ok(Product {
            stock_status,
            name,
            cultivar,
            potency,
            genetics,
            price,
            link,
        })
    }
}

/// Strips the marker prefix from a status class token. Tokens without the
/// prefix pass through verbatim.
pub fn strip_status_prefix(class_token: &str) -> &str {
    class_token
        .strip_prefix(STATUS_CLASS_PREFIX)
        .unwrap_or(class_token)
}

/// Normalizes a price cell like `"12,50 €"` to its numeric value: currency
/// symbol removed, decimal comma converted to a dot.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.replace('€', "")
        .replace(',', ".")
        .trim()
        .parse::<f64>()
        .ok()
}

/// Parses one listing page into products, in document order. An empty
/// result means the page holds no rows, which ends pagination upstream.
pub fn parse_listing(html: &str) -> Result<Vec<Product>, ScrapeError> {
    parse_listing_with(html, &PositionalColumns::default())
}

pub fn parse_listing_with(
    html: &str,
    extractor: &impl RowExtractor,
) -> Result<Vec<Product>, ScrapeError> {
    // The endpoint responds with a bare table-body fragment, not a full
    // document. The HTML5 tree builder drops <tbody>/<tr> tags that appear
    // outside a <table>, so give the fragment one; a fragment that already
    // carries its own <table> closes this empty wrapper and parses as-is.
    let document = Html::parse_document(&format!("<table>{html}</table>"));
    let rows = Selector::parse("tbody tr").unwrap();

    let mut products = Vec::new();
    for (index, row) in document.select(&rows).enumerate() {
        products.push(extractor.extract(row, index)?);
    }
    Ok(products)
}

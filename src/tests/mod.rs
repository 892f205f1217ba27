use indicatif::ProgressBar;

use crate::catalogue::{self, Product};
use crate::fetcher::PageSource;
use crate::runner::{fetch_all_pages, ScrapeError};

fn listing_page(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(status, name, price)| {
            format!(
                r#"<tr>
                    <td><div class="product-status-round-{status}"></div></td>
                    <td> {name} </td>
                    <td>Kultivar A</td>
                    <td>THC: 22% CBD: &lt;1%</td>
                    <td>Sativa</td>
                    <td><div>{price}</div></td>
                    <td><a class="more" href="https://example.test/produkt/{name}/">mehr</a></td>
                </tr>"#
            )
        })
        .collect();
    format!("<table><tbody>{body}</tbody></table>")
}

struct Listing {
    pages: Vec<String>,
}

impl PageSource for Listing {
    async fn fetch_page(&self, page: u32) -> Result<String, ScrapeError> {
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_else(|| "<table><tbody></tbody></table>".to_string()))
    }
}

#[tokio::test]
async fn full_pipeline_paginates_parses_and_sorts_by_price() {
    let source = Listing {
        pages: vec![
            listing_page(&[
                ("instock", "alpha", "12,50 €"),
                ("onbackorder", "beta", "7 €"),
            ]),
            listing_page(&[("instock", "gamma", "9,95 €")]),
        ],
    };
    let pb = ProgressBar::hidden();
    let mut products = fetch_all_pages(&source, 100, &pb).await.unwrap();
    catalogue::sort_by_price(&mut products);

    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["beta", "gamma", "alpha"]);
    assert!(products.windows(2).all(|w| w[0].price <= w[1].price));
    assert_eq!(products[0].stock_status, "onbackorder");
    assert_eq!(products[2].price, 12.5);
    assert_eq!(products[2].link, "https://example.test/produkt/alpha/");
}

#[tokio::test]
async fn full_page_followed_by_empty_page_returns_exactly_that_page() {
    let rows: Vec<(String, String, String)> = (0..12)
        .map(|i| {
            (
                "instock".to_string(),
                format!("sorte-{i:02}"),
                format!("{},50 €", 20 - i),
            )
        })
        .collect();
    let row_refs: Vec<(&str, &str, &str)> = rows
        .iter()
        .map(|(s, n, p)| (s.as_str(), n.as_str(), p.as_str()))
        .collect();
    let source = Listing {
        pages: vec![listing_page(&row_refs)],
    };
    let pb = ProgressBar::hidden();
    let mut products = fetch_all_pages(&source, 100, &pb).await.unwrap();
    assert_eq!(products.len(), 12);
    // document order before sorting
    assert_eq!(products[0].name, "sorte-00");
    assert_eq!(products[11].name, "sorte-11");

    catalogue::sort_by_price(&mut products);
    assert!(products.windows(2).all(|w| w[0].price <= w[1].price));
    assert_eq!(products[0].name, "sorte-11");
}

#[tokio::test]
async fn json_output_round_trips_through_serde() {
    let source = Listing {
        pages: vec![listing_page(&[
            ("instock", "alpha", "12,50 €"),
            ("instock", "beta", "7 €"),
        ])],
    };
    let pb = ProgressBar::hidden();
    let mut products = fetch_all_pages(&source, 100, &pb).await.unwrap();
    catalogue::sort_by_price(&mut products);

    let rendered = crate::output::render_json(&products);
    let decoded: Vec<Product> = serde_json::from_slice(&rendered).unwrap();
    assert_eq!(decoded, products);
}

#[test]
fn json_output_keeps_the_upstream_field_names() {
    let products = vec![Product {
        stock_status: "instock".to_string(),
        name: "Alpha".to_string(),
        cultivar: "Kultivar A".to_string(),
        potency: "THC: 22% CBD: <1%".to_string(),
        genetics: "Sativa".to_string(),
        price: 12.5,
        link: "https://example.test/produkt/alpha/".to_string(),
    }];
    let text = String::from_utf8(crate::output::render_json(&products)).unwrap();
    for key in ["\"Lager\"", "\"Name\"", "\"Kultivar\"", "\"THC/CBD\"", "\"Genetik\"", "\"Preis\"", "\"Link\""] {
        assert!(text.contains(key), "missing key {key} in {text}");
    }
}

#[tokio::test]
async fn html_export_contains_every_scraped_row() {
    let source = Listing {
        pages: vec![
            listing_page(&[("instock", "alpha", "12,50 €")]),
            listing_page(&[("outofstock", "beta", "7 €")]),
        ],
    };
    let pb = ProgressBar::hidden();
    let mut products = fetch_all_pages(&source, 100, &pb).await.unwrap();
    catalogue::sort_by_price(&mut products);

    let html = String::from_utf8(crate::output::render_html(&products)).unwrap();
    assert!(html.contains("alpha"));
    assert!(html.contains("beta"));
    assert!(html.contains("Helios Preisliste"));
    // cheapest product first in document order
    assert!(html.find("beta").unwrap() < html.find("alpha").unwrap());
}

#[tokio::test]
async fn malformed_row_fails_the_whole_run() {
    let source = Listing {
        pages: vec![listing_page(&[("instock", "alpha", "kein preis")])],
    };
    let pb = ProgressBar::hidden();
    let err = fetch_all_pages(&source, 100, &pb).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Price { row: 0, .. }));
}

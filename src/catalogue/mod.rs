use serde::Deserialize;
use serde::Serialize;

/// Status token that marks a product as available. Anything else is
/// rendered as out of stock.
pub const IN_STOCK: &str = "instock";

/// One row of the upstream product table. The serde renames keep the
/// original export keys, so JSON output round-trips losslessly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "Lager")]
    pub stock_status: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Kultivar")]
    pub cultivar: String,
    #[serde(rename = "THC/CBD")]
    pub potency: String,
    #[serde(rename = "Genetik")]
    pub genetics: String,
    #[serde(rename = "Preis")]
    pub price: f64,
    #[serde(rename = "Link")]
    pub link: String,
}

impl Product {
    pub fn is_in_stock(&self) -> bool {
        self.stock_status == IN_STOCK
    }
}

/// Sorts the catalogue by price ascending. `sort_by` is stable, so rows
/// with equal prices keep their page/document order.
pub fn sort_by_price(catalogue: &mut [Product]) {
    catalogue.sort_by(|a, b| a.price.total_cmp(&b.price));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: f64) -> Product {
        Product {
            stock_status: IN_STOCK.to_string(),
            name: name.to_string(),
            cultivar: String::new(),
            potency: String::new(),
            genetics: String::new(),
            price,
            link: String::new(),
        }
    }

    #[test]
    fn sort_orders_by_price_ascending() {
        let mut catalogue = vec![product("c", 9.0), product("a", 5.5), product("b", 7.25)];
        sort_by_price(&mut catalogue);
        let prices: Vec<f64> = catalogue.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![5.5, 7.25, 9.0]);
        for pair in catalogue.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }

    #[test]
    fn sort_keeps_original_order_for_equal_prices() {
        let mut catalogue = vec![
            product("first", 9.0),
            product("second", 9.0),
            product("cheap", 1.0),
            product("third", 9.0),
        ];
        sort_by_price(&mut catalogue);
        let names: Vec<&str> = catalogue.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cheap", "first", "second", "third"]);
    }

    #[test]
    fn in_stock_is_exact_token_match() {
        assert!(product("a", 1.0).is_in_stock());
        let mut p = product("b", 1.0);
        p.stock_status = "onbackorder".to_string();
        assert!(!p.is_in_stock());
    }
}

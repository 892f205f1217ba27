pub mod report;

use crate::catalogue::Product;

pub fn render_json(catalogue: &[Product]) -> Vec<u8> {
    serde_json::to_vec_pretty(catalogue).unwrap_or_else(|_| b"[]\n".to_vec())
}

pub fn render_html(catalogue: &[Product]) -> Vec<u8> {
    report::render_document(catalogue)
}

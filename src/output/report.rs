use crate::catalogue::Product;

/// One sortable table column: header label plus the comparison mode the
/// client-side sort uses for it.
struct Column {
    label: &'static str,
    numeric: bool,
}

/// Columns in render order. The detail link column is appended separately
/// and is not sortable.
const SORTABLE_COLUMNS: &[Column] = &[
    Column {
        label: "Lager",
        numeric: false,
    },
    Column {
        label: "Preis",
        numeric: true,
    },
    Column {
        label: "Name",
        numeric: false,
    },
    Column {
        label: "Kultivar",
        numeric: false,
    },
    Column {
        label: "THC/CBD",
        numeric: false,
    },
    Column {
        label: "Genetik",
        numeric: false,
    },
];

const IN_STOCK_CLASS: &str = "instock";
const OUT_OF_STOCK_CLASS: &str = "outofstock";

const DOCUMENT_HEAD: &str = r#"<html>
<head>
    <title>Helios Preisliste</title>
    <style>
        body {background-color: #000; color: #fff;}
        table {width: 100%; border-collapse: collapse;}
        th, td {padding: 8px; text-align: left; border-bottom: 1px solid #ddd;}
        th {background-color: #444; cursor: pointer;}
        .instock {background-color: #2a5;} /* green */
        .outofstock {background-color: #fc3;} /* yellow */
        .instock td, .outofstock td {color: #000;}
    </style>
    <script>
        function sortTable(n, numeric) {
            var table, rows, switching, i, x, y, xContent, yContent, shouldSwitch, dir, switchcount = 0;
            table = document.getElementById("productTable");
            switching = true;
            dir = "asc";
            while (switching) {
                switching = false;
                rows = table.rows;
                for (i = 1; i < (rows.length - 1); i++) {
                    shouldSwitch = false;
                    x = rows[i].getElementsByTagName("TD")[n];
                    y = rows[i + 1].getElementsByTagName("TD")[n];
                    if (numeric) {
                        xContent = parseFloat(x.innerHTML);
                        yContent = parseFloat(y.innerHTML);
                    } else {
                        xContent = x.innerHTML.toLowerCase();
                        yContent = y.innerHTML.toLowerCase();
                    }
                    if (dir == "asc") {
                        if (xContent > yContent) {
                            shouldSwitch = true;
                            break;
                        }
                    } else if (dir == "desc") {
                        if (xContent < yContent) {
                            shouldSwitch = true;
                            break;
                        }
                    }
                }
                if (shouldSwitch) {
                    rows[i].parentNode.insertBefore(rows[i + 1], rows[i]);
                    switching = true;
                    switchcount++;
                } else {
                    if (switchcount == 0 && dir == "asc") {
                        dir = "desc";
                        switching = true;
                    }
                }
            }
        }
    </script>
</head>
<body>
    <table id="productTable">
"#;

const DOCUMENT_FOOT: &str = r#"    </table>
    <script>
        if (Date.parse(document.lastModified) != 0)
            document.write('<p><hr><small><i>Last modified: ' + document.lastModified + '</i></small>');
    </script>
</body>
</html>
"#;

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn header_row() -> String {
    let mut out = String::from("        <tr>\n");
    for (index, column) in SORTABLE_COLUMNS.iter().enumerate() {
        out.push_str(&format!(
            "            <th onclick=\"sortTable({}, {})\">{}</th>\n",
            index, column.numeric, column.label
        ));
    }
    out.push_str("            <th>Link</th>\n        </tr>\n");
    out
}

fn product_row(product: &Product) -> String {
    let row_class = if product.is_in_stock() {
        IN_STOCK_CLASS
    } else {
        OUT_OF_STOCK_CLASS
    };
    format!(
        r#"        <tr class="{row_class}">
            <td>{status}</td>
            <td>{price}</td>
            <td>{name}</td>
            <td>{cultivar}</td>
            <td>{potency}</td>
            <td>{genetics}</td>
            <td><a href="{link}">Zum Produkt</a></td>
        </tr>
"#,
        status = escape_html(&product.stock_status),
        price = product.price,
        name = escape_html(&product.name),
        cultivar = escape_html(&product.cultivar),
        potency = escape_html(&product.potency),
        genetics = escape_html(&product.genetics),
        link = escape_html(&product.link),
    )
}

/// Renders the catalogue as a standalone HTML document: dark theme,
/// stock-status row coloring, and a header-click sort script generated
/// from the column spec above.
pub fn render_document(catalogue: &[Product]) -> Vec<u8> {
    let mut out = String::from(DOCUMENT_HEAD);
    out.push_str(&header_row());
    for product in catalogue {
        out.push_str(&product_row(product));
    }
    out.push_str(DOCUMENT_FOOT);
    out.into_bytes()
}

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "preisliste",
    version,
    about = "product catalogue scraper and price list exporter",
    long_about = "Preisliste scrapes the storefront's paginated AJAX product listing, sorts the catalogue by price, and prints it as JSON or exports it as a static, client-sortable HTML table.\n\nExamples:\n  preisliste\n  preisliste -e preisliste.html\n  preisliste -e preisliste.html -m 25 --timeout 10\n\nTip: Use --config to persist endpoint overrides (nonce, filter string) and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'e',
        long = "export",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the catalogue as a sortable HTML document instead of printing JSON."
    )]
    pub export: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.preisliste/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'm',
        long = "max-pages",
        value_name = "N",
        help_heading = "Fetch",
        help = "Fail with an error if the listing has not ended after N pages."
    )]
    pub max_pages: Option<u32>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,
}

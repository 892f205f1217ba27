use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::fetcher::EndpointConfig;
use crate::output;
use crate::runner::{Options, Runner, ScrapeError};

fn print_banner() {
    const BANNER: &str = r#"
                     _      ___       __
    ____  ________  (_)____/ (_)____ / /____
   / __ \/ ___/ _ \/ / ___/ / / ___// __/ _ \
  / /_/ / /  /  __/ (__  ) / (__  )/ /_/  __/
 / .___/_/   \___/_/____/_/_/____/ \__/\___/
/_/
       v0.2.0 - storefront price list scraper
    "#;
    print!("{}", BANNER.bright_green());
    println!();
}

// Padding happens before colorizing; escape codes would throw the width off.
fn kv_line(label: &str, value: &str) -> String {
    format!(":: {}: {}", format!("{label:<10}").bold(), value)
}

fn format_kv_line(label: &str, value: &str) {
    println!("{}", kv_line(label, value));
}

#[derive(Clone, Debug)]
struct RunConfig {
    options: Options,
    export: Option<String>,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let defaults = EndpointConfig::default();
    let endpoint = EndpointConfig {
        url: cfg.endpoint_url.unwrap_or(defaults.url),
        referer: cfg.referer.unwrap_or(defaults.referer),
        user_agent: cfg.user_agent.unwrap_or(defaults.user_agent),
        action: cfg.action.unwrap_or(defaults.action),
        nonce: cfg.nonce.unwrap_or(defaults.nonce),
        filter_data: cfg.filter_data.unwrap_or(defaults.filter_data),
        posts_per_page: cfg.posts_per_page.unwrap_or(defaults.posts_per_page),
        categories: cfg.categories.unwrap_or(defaults.categories),
        attributes: cfg.attributes.unwrap_or(defaults.attributes),
        order_field: cfg.order_field.unwrap_or(defaults.order_field),
        order_direction: cfg.order_direction.unwrap_or(defaults.order_direction),
    };

    let max_pages = args.max_pages.or(cfg.max_pages).unwrap_or(100);
    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(30);
    let proxy = args.proxy.or(cfg.proxy);

    let export = args
        .export
        .or(cfg.export)
        .map(|p| config::expand_tilde_string(&p));
    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    Ok(RunConfig {
        options: Options {
            endpoint,
            max_pages,
            timeout_seconds,
            proxy,
        },
        export,
        no_color,
    })
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    // JSON mode writes the catalogue to stdout, so all chrome stays off it.
    let export_mode = run.export.is_some();
    if export_mode {
        print_banner();
        format_kv_line("Endpoint", &run.options.endpoint.url);
        format_kv_line(
            "Paging",
            &format!(
                "per-page={} max-pages={}",
                run.options.endpoint.posts_per_page, run.options.max_pages
            ),
        );
        format_kv_line(
            "HTTP",
            &format!(
                "timeout={}s proxy={}",
                run.options.timeout_seconds,
                if run.options.proxy.is_some() {
                    "on"
                } else {
                    "off"
                }
            ),
        );
        if let Some(path) = run.export.as_deref() {
            format_kv_line("Output", path);
        }
        println!();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(
            ":: Pages: [{pos}] :: Duration: [{elapsed_precise}] :: {msg}",
        )
        .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );

    let now = Instant::now();
    let runner = Runner::new(run.options).map_err(|e| e.to_string())?;
    let catalogue = runner.run(&pb).await.map_err(|e| e.to_string())?;
    pb.finish_and_clear();

    match run.export.as_deref() {
        Some(path) => {
            let rendered = output::render_html(&catalogue);
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| {
                    ScrapeError::ExportWrite {
                        path: path.to_string(),
                        source: e,
                    }
                    .to_string()
                })?;
            outfile.write_all(&rendered).await.map_err(|e| {
                ScrapeError::ExportWrite {
                    path: path.to_string(),
                    source: e,
                }
                .to_string()
            })?;

            let elapsed_time = now.elapsed();
            println!();
            println!(
                "{}",
                format!(
                    ":: Completed :: {} products in {}s ::",
                    catalogue.len(),
                    elapsed_time.as_secs()
                )
                .bright_green()
            );
        }
        None => {
            let rendered = output::render_json(&catalogue);
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .write_all(b"\n")
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", CliArgs::command().render_long_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                print!("{}", CliArgs::command().render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let cfg = match args.config.clone().map(|p| config::expand_tilde(&p)) {
        Some(path) => config::load_config(&path, false)?,
        None => match config::default_config_path() {
            Some(path) => {
                config::ensure_default_config_file(&path)?;
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    // The pipeline is strictly sequential (one page at a time), so a
    // single-threaded runtime is enough.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_apply_when_neither_args_nor_config_set_values() {
        let args = CliArgs::parse_from(["preisliste"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.options.max_pages, 100);
        assert_eq!(run.options.timeout_seconds, 30);
        assert!(run.export.is_none());
        assert!(!run.no_color);
        assert_eq!(run.options.endpoint.posts_per_page, 12);
    }

    #[test]
    fn cli_args_override_config_values() {
        let args = CliArgs::parse_from(["preisliste", "-m", "7", "--to", "5"]);
        let cfg = ConfigFile {
            max_pages: Some(50),
            timeout: Some(60),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.options.max_pages, 7);
        assert_eq!(run.options.timeout_seconds, 5);
    }

    #[test]
    fn config_values_apply_when_args_are_absent() {
        let args = CliArgs::parse_from(["preisliste"]);
        let cfg = ConfigFile {
            max_pages: Some(50),
            nonce: Some("deadbeef00".to_string()),
            export: Some("out.html".to_string()),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.options.max_pages, 50);
        assert_eq!(run.options.endpoint.nonce, "deadbeef00");
        assert_eq!(run.export.as_deref(), Some("out.html"));
    }

    #[test]
    fn no_color_flag_wins_over_config() {
        let args = CliArgs::parse_from(["preisliste", "--nc"]);
        let cfg = ConfigFile {
            no_color: Some(false),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert!(run.no_color);
    }

    #[test]
    fn kv_line_honors_the_global_color_override() {
        colored::control::set_override(true);
        assert!(kv_line("Output", "out.html").contains("\u{1b}["));

        colored::control::set_override(false);
        assert_eq!(kv_line("Output", "out.html"), ":: Output    : out.html");

        colored::control::unset_override();
    }

    #[test]
    fn zero_max_pages_is_rejected_up_front() {
        let args = CliArgs::parse_from(["preisliste", "-m", "0"]);
        let err = build_run_config(args, ConfigFile::default()).unwrap_err();
        assert!(err.contains("max-pages"));
    }
}

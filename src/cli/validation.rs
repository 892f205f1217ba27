use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(max_pages) = args.max_pages {
        if max_pages == 0 {
            return Err("invalid max-pages, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(export) = args.export.as_deref() {
        if export.trim().is_empty() {
            return Err("invalid export path, expected a file name".to_string());
        }
    }
    Ok(())
}

use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub endpoint_url: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub action: Option<String>,
    pub nonce: Option<String>,
    pub filter_data: Option<String>,
    pub posts_per_page: Option<u32>,
    pub categories: Option<String>,
    pub attributes: Option<Vec<String>>,
    pub order_field: Option<String>,
    pub order_direction: Option<String>,
    pub max_pages: Option<u32>,
    pub timeout: Option<usize>,
    pub proxy: Option<String>,
    pub export: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".preisliste").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Preisliste config
#
# Location (default):
#   ~/.preisliste/config.yml
#
# Every endpoint field defaults to the upstream storefront values; override
# them here when the site rotates its nonce or changes the filter string.

# Endpoint (optional overrides)
# endpoint_url: https://helios-cannabis.de/wp-admin/admin-ajax.php
# referer: https://helios-cannabis.de/sortiment/
# action: filter_products
# nonce: e383327630
# filter_data: stock_status=on&stock_status_onbackorder=on&list_view=on
# categories: blueten,extrakte,shake
# posts_per_page: 12
# order_field: name
# order_direction: ASC

# Paging
max_pages: 100

# HTTP
timeout: 30
# proxy: http://127.0.0.1:8080

# Output
# export: ./preisliste.html
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

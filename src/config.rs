use crate::error::{Result, SearchError};
use serde::Deserialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_API_URL: &str = "https://api.search.brave.com/res/v1";
const DEFAULT_TIMEOUT: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_COUNTRY: &str = "US";
const DEFAULT_SEARCH_LANG: &str = "en";
const DEFAULT_UI_LANG: &str = "en-US";
const CONFIG_DIR_NAME: &str = "brave-search-mcp";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_PATH_ENV: &str = "BRAVE_SEARCH_CONFIG";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub default_country: String,
    pub default_search_lang: String,
    pub default_ui_lang: String,
}

/// On-disk settings. Every key is optional; environment variables win.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api_key: Option<String>,
    api_url: Option<String>,
    timeout: Option<u64>,
    max_retries: Option<u32>,
    default_country: Option<String>,
    default_search_lang: Option<String>,
    default_ui_lang: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let file = match std::env::var(CONFIG_PATH_ENV).ok().filter(|s| !s.trim().is_empty()) {
            Some(path) => read_file_config(Path::new(path.trim()), true)?,
            None => read_file_config(&Self::config_file_path(), false)?,
        };
        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    fn from_sources<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_opt = |name: &str| env(name).filter(|s| !s.trim().is_empty());

        let api_key = env_opt("BRAVE_SEARCH_API_KEY")
            .or(file.api_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                SearchError::ConfigMissing(
                    "Brave Search API key is required (set api_key in the config file or BRAVE_SEARCH_API_KEY)".into(),
                )
            })?;

        let api_url = env_opt("BRAVE_SEARCH_API_URL")
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        validate_url(&api_url)?;

        let timeout_secs = match env_opt("BRAVE_SEARCH_TIMEOUT") {
            Some(raw) => parse_in_range("BRAVE_SEARCH_TIMEOUT", &raw, 1, 300)?,
            None => check_range("timeout", file.timeout.unwrap_or(DEFAULT_TIMEOUT), 1, 300)?,
        };

        let max_retries = match env_opt("BRAVE_SEARCH_MAX_RETRIES") {
            Some(raw) => parse_in_range("BRAVE_SEARCH_MAX_RETRIES", &raw, 0, 10)?,
            None => check_range("max_retries", file.max_retries.unwrap_or(DEFAULT_MAX_RETRIES), 0, 10)?,
        };

        Ok(Self {
            api_key,
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            timeout_secs,
            max_retries,
            default_country: env_opt("BRAVE_SEARCH_COUNTRY")
                .or(file.default_country)
                .unwrap_or_else(|| DEFAULT_COUNTRY.into()),
            default_search_lang: env_opt("BRAVE_SEARCH_LANGUAGE")
                .or(file.default_search_lang)
                .unwrap_or_else(|| DEFAULT_SEARCH_LANG.into()),
            default_ui_lang: env_opt("BRAVE_SEARCH_UI_LANGUAGE")
                .or(file.default_ui_lang)
                .unwrap_or_else(|| DEFAULT_UI_LANG.into()),
        })
    }

    pub fn mask_api_key(&self) -> String {
        mask_key(&self.api_key)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    pub fn config_file_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }
}

fn read_file_config(path: &Path, required: bool) -> Result<FileConfig> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok(FileConfig::default());
        }
        Err(e) => {
            return Err(SearchError::ConfigFile { path: path.to_path_buf(), message: e.to_string() });
        }
    };

    serde_json::from_str(&data).map_err(|e| SearchError::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse_in_range<T>(name: &str, raw: &str, min: T, max: T) -> Result<T>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let val: T = raw.trim().parse().map_err(|_| {
        SearchError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}"))
    })?;
    check_range(name, val, min, max)
}

fn check_range<T>(name: &str, val: T, min: T, max: T) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if val < min || val > max {
        return Err(SearchError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}")));
    }
    Ok(val)
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SearchError::ConfigInvalid("api_url must be a valid http or https URL".into()));
    }
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 8 {
        return "********".into();
    }
    let first: String = chars[..4].iter().collect();
    let last: String = chars[chars.len() - 4..].iter().collect();
    format!("{first}********{last}")
}

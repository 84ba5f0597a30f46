//! Configuration file handling for smartfinance.
//!
//! The configuration file is stored at `$SMARTFINANCE_HOME/config.json` and holds the settings for
//! the advisory model, the locale used for labels, and how the daily flow is bucketed.

use crate::report::DayKey;
use crate::store::DirStorage;
use crate::{utils, Result};
use anyhow::{anyhow, bail, Context};
use chrono::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "smartfinance";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DATA: &str = "data";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_LOCALE: &str = "ru_RU";
const DEFAULT_CURRENCY: &str = "₽";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SMARTFINANCE_HOME` and from there it loads `$SMARTFINANCE_HOME/config.json`. It
/// provides the path of the data directory, where the transaction collection is kept.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    data_dir: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    locale: Locale,
    api_base: Url,
}

impl Config {
    /// Creates the home directory, its data subdirectory and an initial `config.json` with default
    /// settings.
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists in `dir`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the smartfinance home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "The home directory is already initialized, '{}' exists",
                config_path.display()
            );
        }

        let data_dir = root.join(DATA);
        utils::make_dir(&data_dir).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;
        let locale = config_file.locale()?;
        let api_base = config_file.api_base()?;

        Ok(Self {
            root,
            data_dir,
            config_path,
            config_file,
            locale,
            api_base,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load and validate the config file
    /// - create the data directory if it has gone missing
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative).await.with_context(|| {
            format!(
                "The smartfinance home '{}' is missing, run 'smartfinance init' first",
                maybe_relative.display()
            )
        })?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let locale = config_file.locale()?;
        let api_base = config_file.api_base()?;

        let data_dir = root.join(DATA);
        utils::make_dir(&data_dir).await?;

        Ok(Self {
            root,
            data_dir,
            config_path,
            config_file,
            locale,
            api_base,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The durable storage the transaction store writes to.
    pub fn storage(&self) -> DirStorage {
        DirStorage::new(&self.data_dir)
    }

    pub fn model(&self) -> &str {
        &self.config_file.model
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn daily_flow_key(&self) -> DayKey {
        self.config_file.daily_flow_key
    }

    pub fn currency(&self) -> &str {
        &self.config_file.currency
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "smartfinance",
///   "config_version": 1,
///   "model": "gemini-2.5-flash",
///   "api_base": "https://generativelanguage.googleapis.com/v1beta/",
///   "locale": "ru_RU",
///   "daily_flow_key": "date",
///   "currency": "₽"
/// }
/// ```
///
/// Everything except `app_name` and `config_version` may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "smartfinance"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The Gemini model that writes the budget analysis
    #[serde(default = "default_model")]
    model: String,

    /// Base URL of the Gemini REST API
    #[serde(default = "default_api_base")]
    api_base: String,

    /// A POSIX locale name, e.g. `ru_RU` or `en_US`, used for date labels
    #[serde(default = "default_locale")]
    locale: String,

    /// How transactions are grouped into days for the daily flow
    #[serde(default)]
    daily_flow_key: DayKey,

    /// Symbol appended to amounts when they are displayed
    #[serde(default = "default_currency")]
    currency: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            model: default_model(),
            api_base: default_api_base(),
            locale: default_locale(),
            daily_flow_key: DayKey::default(),
            currency: default_currency(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Parses the configured locale name.
    fn locale(&self) -> Result<Locale> {
        Locale::try_from(self.locale.as_str())
            .map_err(|_| anyhow!("Unknown locale '{}' in config file", self.locale))
    }

    fn api_base(&self) -> Result<Url> {
        Url::parse(&self.api_base)
            .with_context(|| format!("Invalid api_base '{}' in config file", self.api_base))
    }
}

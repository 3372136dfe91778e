use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::{annotate_toml_table, append_commented_field},
    error::{ConfigError, Result},
    utils::xdg_config_home,
};

/// querytext configuration
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Documented, DocumentedFields,
)]
pub struct Config {
    /// Reject plans whose groups do not balance.
    /// Default: false
    pub strict: Option<bool>,

    /// Limit appended to plans that declare none.
    /// Default: unset
    pub default_limit: Option<u64>,

    /// Plan file format used when the file extension does not decide: "toml" or "json".
    /// Default: "toml"
    pub plan_format: Option<PlanFormat>,
}

/// Serialization format of a plan file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanFormat {
    #[default]
    Toml,
    Json,
}

impl PlanFormat {
    /// Picks the format from a `.toml` or `.json` extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("toml") {
            Some(PlanFormat::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(PlanFormat::Json)
        } else {
            None
        }
    }
}

impl FromStr for PlanFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(PlanFormat::Toml),
            "json" => Ok(PlanFormat::Json),
            _ => Err(ConfigError::InvalidPlanFormat(s.to_string())),
        }
    }
}

impl fmt::Display for PlanFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanFormat::Toml => write!(f, "toml"),
            PlanFormat::Json => write!(f, "json"),
        }
    }
}

/// Location of the config file: `$QUERYTEXT_CONFIG`, or
/// `$XDG_CONFIG_HOME/querytext/config.toml`.
pub fn config_path() -> PathBuf {
    match std::env::var("QUERYTEXT_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("querytext").join("config.toml"),
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            strict: Some(false),
            default_limit: None,
            plan_format: Some(PlanFormat::Toml),
        }
    }

    /// Loads the configuration from `path`.
    /// If the file is not found, the default configuration is used.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("config file {} not found, using defaults", path.display());
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve();

        Ok(config)
    }

    /// Fills unset fields with their defaults.
    pub fn resolve(&mut self) {
        self.strict.get_or_insert(false);
        self.plan_format.get_or_insert_with(PlanFormat::default);
    }

    pub fn is_strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }

    pub fn plan_format(&self) -> PlanFormat {
        self.plan_format.unwrap_or_default()
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;
        append_commented_field::<Config>(&mut doc, "default_limit", "100");

        Ok(doc)
    }
}

/// Writes the annotated default configuration to `path`.
///
/// Refuses to overwrite an existing file.
pub fn generate_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(path.display().to_string()));
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(())
}

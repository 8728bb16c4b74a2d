use crate::adapters::yurplan::DEFAULT_ENDPOINT;
use crate::domain::model::{BadgeType, Corrections, Exceptions, TypeIds};
use crate::utils::error::{BadgerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct BadgerConfig {
    pub yurplan: YurplanConfig,
    pub ticket_types: TypeIds,
    pub badge: BadgeConfig,
    pub exceptions: Option<HashMap<String, String>>,
    pub corrections: Option<HashMap<String, (String, String)>>,

    /// Directory of the file this config was loaded from.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YurplanConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub event_id: String,
    pub timeout_seconds: Option<u64>,
    #[serde(flatten)]
    pub credentials: Credentials,
}

/// Account secrets. There are no defaults; `Debug` never prints them.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("email", &"***")
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    pub template: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

/// Exceptions and corrections kept outside the main config, usually
/// maintained by the event staff on the day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverridesFile {
    pub exceptions: Option<HashMap<String, String>>,
    pub corrections: Option<HashMap<String, (String, String)>>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_output_path() -> String {
    "./badges".to_string()
}

impl BadgerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BadgerError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;

        let mut config = Self::from_toml_str(&content)?;
        config.config_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_with_env(content, "toml_parsing")
    }

    /// Merges an overrides file on top of the inline tables. Entries in the
    /// file win over inline entries for the same token.
    pub fn merge_overrides_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BadgerError::MissingOverrides {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let overrides: OverridesFile = parse_with_env(&content, "overrides")?;

        if let Some(exceptions) = overrides.exceptions {
            self.exceptions.get_or_insert_with(HashMap::new).extend(exceptions);
        }
        if let Some(corrections) = overrides.corrections {
            self.corrections.get_or_insert_with(HashMap::new).extend(corrections);
        }

        tracing::debug!("Loaded overrides from {}", path.display());
        Ok(())
    }

    /// Exception map with parsed categories. An absent table is an empty map;
    /// an empty value keeps the derived category.
    pub fn exceptions(&self) -> Result<Exceptions> {
        let Some(raw) = &self.exceptions else {
            return Ok(Exceptions::new());
        };

        raw.iter()
            .map(|(token, value)| {
                if value.trim().is_empty() {
                    return Ok((token.clone(), None));
                }
                value
                    .parse::<BadgeType>()
                    .map(|category| (token.clone(), Some(category)))
                    .map_err(|reason| BadgerError::InvalidConfigValueError {
                        field: format!("exceptions.{}", token),
                        value: value.clone(),
                        reason,
                    })
            })
            .collect()
    }

    pub fn corrections(&self) -> Corrections {
        self.corrections.clone().unwrap_or_default()
    }

    /// Finds the badge template: as given first, then next to the config file.
    pub fn template_path(&self) -> Result<PathBuf> {
        let template = Path::new(&self.badge.template);
        if template.is_file() {
            return Ok(template.to_path_buf());
        }

        if template.is_relative() {
            if let Some(dir) = &self.config_dir {
                let candidate = dir.join(template);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }

        Err(BadgerError::TemplateNotFound {
            path: self.badge.template.clone(),
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("yurplan.endpoint", &self.yurplan.endpoint)?;
        validation::validate_non_empty_string("yurplan.event_id", &self.yurplan.event_id)?;
        if let Some(timeout) = self.yurplan.timeout_seconds {
            validation::validate_range("yurplan.timeout_seconds", timeout, 1, 600)?;
        }

        let credentials = &self.yurplan.credentials;
        validation::validate_secret("yurplan.api_key", &credentials.api_key)?;
        validation::validate_secret("yurplan.email", &credentials.email)?;
        validation::validate_secret("yurplan.password", &credentials.password)?;

        validation::validate_non_empty_string("ticket_types.attendee", &self.ticket_types.attendee)?;
        validation::validate_non_empty_string("ticket_types.speaker", &self.ticket_types.speaker)?;
        validation::validate_non_empty_string("ticket_types.sponsor", &self.ticket_types.sponsor)?;
        validation::validate_non_empty_string("ticket_types.staff", &self.ticket_types.staff)?;

        validation::validate_path("badge.template", &self.badge.template)?;
        validation::validate_path("badge.output_path", &self.badge.output_path)?;

        self.exceptions()?;
        Ok(())
    }
}

impl Validate for BadgerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Parses TOML first and expands `${VAR}` inside string values afterwards,
/// so a substituted value is never re-read as TOML syntax.
fn parse_with_env<T: serde::de::DeserializeOwned>(content: &str, field: &str) -> Result<T> {
    let mut table: toml::Table =
        toml::from_str(content).map_err(|e| BadgerError::ConfigValidationError {
            field: field.to_string(),
            message: format!("TOML parsing error: {}", e),
        })?;

    for value in table.iter_mut().map(|(_, v)| v) {
        substitute_env_vars(value);
    }

    toml::Value::Table(table)
        .try_into()
        .map_err(|e| BadgerError::ConfigValidationError {
            field: field.to_string(),
            message: format!("TOML parsing error: {}", e),
        })
}

/// 替換環境變數 (例如 ${API_KEY})，未設定的變數保留原樣交由驗證回報
fn substitute_env_vars(value: &mut toml::Value) {
    use regex::Regex;
    use std::sync::OnceLock;

    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

    match value {
        toml::Value::String(s) => {
            let expanded = re
                .replace_all(s.as_str(), |caps: &regex::Captures| {
                    let var_name = &caps[1];
                    std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
                })
                .into_owned();
            *s = expanded;
        }
        toml::Value::Array(items) => items.iter_mut().for_each(substitute_env_vars),
        toml::Value::Table(table) => table.iter_mut().map(|(_, v)| v).for_each(substitute_env_vars),
        _ => {}
    }
}

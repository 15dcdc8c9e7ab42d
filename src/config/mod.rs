use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::core::eligibility::DEFAULT_MIN_SHELF_LIFE_DAYS;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_PATH: &str = "./medicine_inventory.db";
pub const DEFAULT_RXNORM_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";
pub const DEFAULT_VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com/api/v3";

#[derive(Debug, Clone, Parser)]
#[command(name = "medicycle")]
#[command(about = "Medicine recycling intake service with URL safety checks")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Listen address, e.g. 127.0.0.1:8080")]
    pub listen: Option<String>,

    #[arg(long, help = "SQLite inventory database path")]
    pub db_path: Option<String>,

    #[arg(long, help = "Path to a GTIN product catalog (TOML)")]
    pub catalog: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rxnorm: RxNormConfig,
    #[serde(default)]
    pub virustotal: VirusTotalConfig,
    #[serde(default)]
    pub recycling: RecyclingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RxNormConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirusTotalConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub poll_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecyclingConfig {
    pub min_shelf_life_days: Option<i64>,
    pub strict_gtin: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: Option<String>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VT_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid");

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn listen_addr(&self) -> String {
        self.server
            .listen
            .clone()
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
    }

    pub fn database_path(&self) -> String {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
    }

    pub fn rxnorm_base_url(&self) -> String {
        self.rxnorm
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_RXNORM_BASE_URL.to_string())
    }

    pub fn rxnorm_timeout(&self) -> Duration {
        Duration::from_secs(self.rxnorm.timeout_seconds.unwrap_or(10))
    }

    pub fn virustotal_base_url(&self) -> String {
        self.virustotal
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_VIRUSTOTAL_BASE_URL.to_string())
    }

    /// Unset key stays empty; the VirusTotal client rejects requests until
    /// one is configured.
    pub fn virustotal_api_key(&self) -> String {
        self.virustotal.api_key.clone().unwrap_or_default()
    }

    pub fn virustotal_timeout(&self) -> Duration {
        Duration::from_secs(self.virustotal.timeout_seconds.unwrap_or(10))
    }

    pub fn virustotal_poll_delay(&self) -> Duration {
        Duration::from_secs(self.virustotal.poll_delay_seconds.unwrap_or(3))
    }

    pub fn min_shelf_life_days(&self) -> i64 {
        self.recycling
            .min_shelf_life_days
            .unwrap_or(DEFAULT_MIN_SHELF_LIFE_DAYS)
    }

    pub fn strict_gtin(&self) -> bool {
        self.recycling.strict_gtin.unwrap_or(false)
    }

    pub fn catalog_path(&self) -> Option<&str> {
        self.catalog.path.as_deref()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.listen", &self.listen_addr())?;
        validate_non_empty_string("database.path", &self.database_path())?;
        validate_url("rxnorm.base_url", &self.rxnorm_base_url())?;
        validate_url("virustotal.base_url", &self.virustotal_base_url())?;
        validate_positive_number(
            "recycling.min_shelf_life_days",
            self.min_shelf_life_days(),
            1,
        )?;
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

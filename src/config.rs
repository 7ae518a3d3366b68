//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::{path::Path, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{key_codec, transfer::Recipient};

/// 默认中继地址
pub const DEFAULT_API_URL: &str = "https://shadow.radr.fun/shadowpay/api";

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 中继服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

/// 转账参数配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// 币种代码
    pub token: String,
    /// 单笔转账最小金额
    pub min_amount: Decimal,
    /// 批量转账每笔固定金额
    pub batch_amount: Decimal,
    /// 批量转账相邻两笔之间的间隔（毫秒）
    pub batch_delay_ms: u64,
    #[serde(default = "default_recipients")]
    pub recipients: Vec<Recipient>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("SHADOWWIRE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            timeout_secs: std::env::var("SHADOWWIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            token: std::env::var("TRANSFER_TOKEN").unwrap_or_else(|_| "SOL".into()),
            min_amount: env_decimal("TRANSFER_MIN_AMOUNT").unwrap_or_else(|| Decimal::new(1, 1)),
            batch_amount: env_decimal("BATCH_AMOUNT").unwrap_or_else(|| Decimal::new(1, 1)),
            batch_delay_ms: std::env::var("BATCH_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
            recipients: default_recipients(),
        }
    }
}

impl TransferConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

fn env_decimal(key: &str) -> Option<Decimal> {
    std::env::var(key)
        .ok()
        .and_then(|s| Decimal::from_str(s.trim()).ok())
}

/// 批量转账的默认收款列表
fn default_recipients() -> Vec<Recipient> {
    [
        ("CLaw...", "CLawNbmwnGcyAGBr8KsNbzHQkYr96ptTsEZVLzkqtjg2"),
        ("c1aw...", "c1awCJKvfH1iERbHhhzn1o1qCG2qGPxKGCz5ym2mTV5"),
        ("cLAw...", "cLAwMD5py6ZKAU3qhbYf2MVPnaHt2xX5v3S9couyM6v"),
        ("cLaw...", "cLaw2M5vpjdLzeAMeZsvdbzNxDTt1K9A49GQXbTD9vt"),
    ]
    .into_iter()
    .map(|(label, address)| Recipient::new(label, address))
    .collect()
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            relay: RelayConfig::default(),
            transfer: TransferConfig::default(),
            logging: LoggingConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if !self.relay.api_url.starts_with("http://") && !self.relay.api_url.starts_with("https://")
        {
            anyhow::bail!("SHADOWWIRE_API_URL must start with http:// or https://");
        }

        if self.transfer.token.trim().is_empty() {
            anyhow::bail!("TRANSFER_TOKEN must not be empty");
        }

        if self.transfer.min_amount <= Decimal::ZERO {
            anyhow::bail!("TRANSFER_MIN_AMOUNT must be positive");
        }

        if self.transfer.batch_amount <= Decimal::ZERO {
            anyhow::bail!("BATCH_AMOUNT must be positive");
        }

        for recipient in &self.transfer.recipients {
            let decoded = key_codec::decode_base58(&recipient.address)
                .with_context(|| format!("Invalid recipient address for {}", recipient.label))?;
            if decoded.len() != 32 {
                anyhow::bail!(
                    "Recipient {} address decodes to {} bytes (expected 32)",
                    recipient.label,
                    decoded.len()
                );
            }
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        // 验证日志格式
        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        Ok(())
    }
}

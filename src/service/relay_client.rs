//! ShadowWire 中继客户端
//!
//! 每次调用只发出一个请求，不做重试；重试属于编排层策略。

use async_trait::async_trait;
use serde_json::Value;

use crate::config::RelayConfig;
use crate::domain::transfer::{Balance, BalanceResponse, TransferRequest, TransferResult};
use crate::error::{AppError, AppResult};
use crate::utils::log_redact::{redact_address, SensitiveRedact};

/// 中继接口
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// 查询池内余额；任何失败都只记录日志并返回零余额
    async fn get_balance(&self, address: &str) -> Balance;

    /// 提交一笔已签名的转账
    ///
    /// 网络失败或响应体无法解析时返回 `NetworkError`；
    /// 中继拒绝以 `TransferResult { success: false, .. }` 表示。
    async fn submit_transfer(&self, request: &TransferRequest) -> AppResult<TransferResult>;
}

/// 基于 HTTP 的中继客户端
pub struct RelayClient {
    base_url: String,
    client: reqwest::Client,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 查询余额，保留错误
    pub async fn try_get_balance(&self, address: &str) -> AppResult<Balance> {
        let url = format!("{}/pool/balance/{}", self.base_url, address);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_text, "Balance query rejected by relay");
            return Err(AppError::network(format!(
                "Relay returned HTTP {} for balance query",
                status
            )));
        }

        let body = response.json::<BalanceResponse>().await?;
        Ok(Balance::from(body))
    }
}

#[async_trait]
impl RelayApi for RelayClient {
    async fn get_balance(&self, address: &str) -> Balance {
        tracing::info!(wallet = %redact_address(address), "Checking ShadowWire balance...");

        match self.try_get_balance(address).await {
            Ok(balance) => {
                tracing::info!(
                    wallet = %redact_address(address),
                    sol = %balance.sol(),
                    "ShadowWire balance: {} SOL",
                    balance.sol()
                );
                balance
            }
            Err(e) => {
                tracing::error!(error = %e, "Balance check failed");
                Balance::default()
            }
        }
    }

    async fn submit_transfer(&self, request: &TransferRequest) -> AppResult<TransferResult> {
        let url = format!("{}/pool/transfer", self.base_url);

        tracing::debug!(request = %request.redact(), "🌐 Submitting transfer to relay");

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(status = %status, body = %text, "❌ Relay returned a non-JSON body");
            AppError::network(format!(
                "Malformed relay response (HTTP {}): {}",
                status, e
            ))
        })?;

        tracing::info!(status = %status, "Response: {}", body);

        let result = TransferResult::from_response(&body);
        if !status.is_success() && result.success {
            tracing::warn!(status = %status, "Relay reported success with a non-2xx status");
        }
        Ok(result)
    }
}

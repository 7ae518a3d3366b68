//! 转账领域模型

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// 1 SOL = 1e9 lamports
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// 中继未给出原因时的失败描述
pub const DEFAULT_FAILURE_MESSAGE: &str = "Transfer failed";

/// 批量转账收款方
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub label: String,
    pub address: String,
}

impl Recipient {
    pub fn new(label: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            address: address.into(),
        }
    }
}

/// 转账类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    /// 池内转账
    Internal,
    /// 转出到外部地址
    External,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::Internal => f.write_str("internal"),
            TransferKind::External => f.write_str("external"),
        }
    }
}

impl FromStr for TransferKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(TransferKind::Internal),
            "external" => Ok(TransferKind::External),
            other => Err(AppError::validation(format!(
                "Unknown transfer type: {}",
                other
            ))),
        }
    }
}

/// `POST /pool/transfer` 请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender: String,
    pub recipient: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub token: String,
    #[serde(rename = "type")]
    pub kind: TransferKind,
    /// Base64 鉴权签名
    pub signature: String,
    /// 毫秒时间戳
    pub timestamp: i64,
}

/// 中继对一次转账的判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub success: bool,
    pub tx_signature: Option<String>,
    pub error_message: Option<String>,
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

impl TransferResult {
    /// 解析中继响应
    ///
    /// `success == true` 或带有非空 `signature` 视为成功；
    /// 否则依次取 `error`、`message` 作为失败原因。空字符串签名按失败处理。
    pub fn from_response(body: &Value) -> Self {
        let success_flag = body.get("success").and_then(Value::as_bool) == Some(true);
        let tx_signature = non_empty_str(body, "signature").map(str::to_string);

        if success_flag || tx_signature.is_some() {
            return Self {
                success: true,
                tx_signature,
                error_message: None,
            };
        }

        let reason = non_empty_str(body, "error")
            .or_else(|| non_empty_str(body, "message"))
            .unwrap_or(DEFAULT_FAILURE_MESSAGE);
        Self::failed(reason)
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_signature: None,
            error_message: Some(reason.into()),
        }
    }

    /// 失败时转为 `RelayRejected`
    pub fn into_result(self) -> AppResult<Option<String>> {
        if self.success {
            Ok(self.tx_signature)
        } else {
            Err(AppError::relay_rejected(
                self.error_message
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ))
        }
    }

    pub fn status_message(&self) -> String {
        if self.success {
            format!(
                "Transfer successful! TX: {}",
                self.tx_signature.as_deref().unwrap_or("pending")
            )
        } else {
            format!(
                "Error: {}",
                self.error_message.as_deref().unwrap_or(DEFAULT_FAILURE_MESSAGE)
            )
        }
    }
}

/// `GET /pool/balance/{address}` 响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub available: Option<u64>,
}

/// 池内可用余额
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    pub available_lamports: u64,
}

impl Balance {
    pub fn from_lamports(available_lamports: u64) -> Self {
        Self { available_lamports }
    }

    pub fn sol(&self) -> Decimal {
        Decimal::from(self.available_lamports) / Decimal::from(LAMPORTS_PER_SOL)
    }
}

impl From<BalanceResponse> for Balance {
    fn from(resp: BalanceResponse) -> Self {
        Self::from_lamports(resp.available.unwrap_or(0))
    }
}

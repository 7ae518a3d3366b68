//! 日志脱敏
//! 地址只显示首尾，签名只显示前缀，私钥永不进入日志

use serde::Serialize;

use crate::domain::transfer::TransferRequest;

/// 可脱敏trait
pub trait SensitiveRedact {
    fn redact(&self) -> String;
}

/// 脱敏地址（显示前6位和后4位）
pub fn redact_address(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return "*".repeat(address.chars().count());
    }

    let prefix = &address[..6];
    let suffix = &address[address.len() - 4..];
    format!("{}...{}", prefix, suffix)
}

/// 脱敏签名（只保留前缀）
pub fn redact_signature(signature: &str, show_chars: usize) -> String {
    if signature.len() <= show_chars || !signature.is_ascii() {
        return "*".repeat(signature.chars().count());
    }
    format!("{}...", &signature[..show_chars])
}

#[derive(Debug, Serialize)]
struct RedactedTransferRequest<'a> {
    sender: String,
    recipient: String,
    amount: String,
    token: &'a str,
    #[serde(rename = "type")]
    kind: String,
    signature: String,
    timestamp: i64,
}

impl SensitiveRedact for TransferRequest {
    fn redact(&self) -> String {
        serde_json::to_string(&RedactedTransferRequest {
            sender: redact_address(&self.sender),
            recipient: redact_address(&self.recipient),
            amount: self.amount.to_string(),
            token: &self.token,
            kind: self.kind.to_string(),
            signature: redact_signature(&self.signature, 8),
            timestamp: self.timestamp,
        })
        .unwrap_or_else(|_| "{ redacted }".to_string())
    }
}

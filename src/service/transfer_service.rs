//! 转账编排服务
//!
//! 单笔转账：校验 → 签名 → 提交 → 成功后刷新余额。
//! 批量转账：按收款列表顺序逐个提交，每一笔重新签名，单笔失败不影响后续，
//! 相邻两笔之间等待固定间隔，全部完成后刷新一次余额。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rust_decimal::Decimal;

use crate::config::TransferConfig;
use crate::domain::key_codec;
use crate::domain::session::Session;
use crate::domain::transfer::{Balance, Recipient, TransferKind, TransferRequest, TransferResult};
use crate::error::{AppError, AppResult};
use crate::service::relay_client::RelayApi;
use crate::utils::{log_redact::redact_address, time_utils::current_timestamp_ms};

/// 单笔转账回执
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub result: TransferResult,
    /// 仅在转账成功后刷新
    pub balance: Option<Balance>,
}

#[derive(Debug, Clone)]
pub struct BatchItemOutcome {
    pub recipient: Recipient,
    pub result: TransferResult,
}

/// 批量转账汇总
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<BatchItemOutcome>,
    /// 取消后未执行的收款方
    pub skipped: Vec<Recipient>,
    pub succeeded: usize,
    pub total: usize,
    pub balance: Balance,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded
    }

    pub fn is_complete_success(&self) -> bool {
        self.succeeded == self.total
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Batch complete: {}/{} successful",
            self.succeeded, self.total
        );
        if !self.skipped.is_empty() {
            summary.push_str(&format!(" ({} cancelled)", self.skipped.len()));
        }
        summary
    }
}

/// 协作式取消标志，在每一笔开始前检查
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct TransferService {
    relay: Arc<dyn RelayApi>,
    config: TransferConfig,
}

impl TransferService {
    pub fn new(relay: Arc<dyn RelayApi>, config: TransferConfig) -> Self {
        Self { relay, config }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// 用当前时间戳重新签名并构造请求
    pub fn build_request(
        &self,
        session: &Session,
        recipient: &str,
        amount: Decimal,
        kind: TransferKind,
    ) -> AppResult<TransferRequest> {
        let signer = session.signer()?;
        let auth = signer.sign_auth(current_timestamp_ms());

        Ok(TransferRequest {
            sender: signer.address().to_string(),
            recipient: recipient.to_string(),
            amount,
            token: self.config.token.clone(),
            kind,
            signature: auth.signature,
            timestamp: auth.timestamp_ms,
        })
    }

    pub async fn refresh_balance(&self, session: &Session) -> AppResult<Balance> {
        let address = session.address()?;
        Ok(self.relay.get_balance(address).await)
    }

    fn validate_single(&self, recipient: &str, amount: Decimal) -> AppResult<()> {
        if recipient.is_empty() || amount.is_zero() {
            return Err(AppError::validation("Please fill in all fields"));
        }

        if amount < self.config.min_amount {
            return Err(AppError::validation(format!(
                "Minimum amount is {} {}",
                self.config.min_amount, self.config.token
            )));
        }

        let decoded = key_codec::decode_base58(recipient)
            .map_err(|_| AppError::validation(format!("Invalid recipient address: {}", recipient)))?;
        if decoded.len() != 32 {
            return Err(AppError::validation(format!(
                "Invalid recipient address: {}",
                recipient
            )));
        }

        Ok(())
    }

    /// 网络错误降级为失败结果
    async fn submit(&self, request: &TransferRequest) -> TransferResult {
        match self.relay.submit_transfer(request).await {
            Ok(result) => result,
            Err(e) => TransferResult::failed(e.message),
        }
    }

    /// 单笔转账
    pub async fn send_transfer(
        &self,
        session: &Session,
        recipient: &str,
        amount: Decimal,
        kind: TransferKind,
    ) -> AppResult<TransferReceipt> {
        session.signer()?;
        let recipient = recipient.trim();
        self.validate_single(recipient, amount)?;

        tracing::info!(
            kind = %kind,
            amount = %amount,
            recipient = %redact_address(recipient),
            "Initiating {} transfer of {} {}",
            kind,
            amount,
            self.config.token
        );

        let request = self.build_request(session, recipient, amount, kind)?;
        let result = self.submit(&request).await;

        if !result.success {
            tracing::error!(
                reason = result.error_message.as_deref().unwrap_or_default(),
                "Transfer failed"
            );
            return Ok(TransferReceipt {
                result,
                balance: None,
            });
        }

        tracing::info!(
            tx = result.tx_signature.as_deref().unwrap_or("pending"),
            "✅ Transfer complete!"
        );
        let balance = self.refresh_balance(session).await?;
        Ok(TransferReceipt {
            result,
            balance: Some(balance),
        })
    }

    /// 批量转账到配置中的全部收款方
    pub async fn batch_transfer(&self, session: &Session) -> AppResult<BatchReport> {
        self.batch_transfer_with_cancel(session, &CancelFlag::new())
            .await
    }

    pub async fn batch_transfer_with_cancel(
        &self,
        session: &Session,
        cancel: &CancelFlag,
    ) -> AppResult<BatchReport> {
        session.signer()?;

        let recipients = &self.config.recipients;
        let amount = self.config.batch_amount;
        let delay = self.config.batch_delay();

        let mut outcomes = Vec::with_capacity(recipients.len());
        let mut skipped = Vec::new();
        let mut succeeded = 0usize;

        for (i, recipient) in recipients.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            // 间隔期间也可能被取消
            if cancel.is_cancelled() {
                tracing::warn!(remaining = recipients.len() - i, "Batch cancelled");
                skipped.extend(recipients[i..].iter().cloned());
                break;
            }

            tracing::info!(
                "Sending {} {} to {}...",
                amount,
                self.config.token,
                recipient.label
            );

            let request =
                self.build_request(session, &recipient.address, amount, TransferKind::External)?;
            let result = self.submit(&request).await;

            if result.success {
                succeeded += 1;
                tracing::info!("✅ {}: Success", recipient.label);
            } else {
                tracing::error!(
                    "❌ {}: {}",
                    recipient.label,
                    result.error_message.as_deref().unwrap_or("Failed")
                );
            }

            outcomes.push(BatchItemOutcome {
                recipient: recipient.clone(),
                result,
            });
        }

        let balance = self.refresh_balance(session).await?;
        let report = BatchReport {
            outcomes,
            skipped,
            succeeded,
            total: recipients.len(),
            balance,
        };
        tracing::info!("{}", report.summary());
        Ok(report)
    }
}

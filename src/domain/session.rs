//! 钱包会话
//!
//! 状态只有两种：导入私钥成功后为 Connected，断开后回到 Disconnected。
//! 导入是原子的，解码或校验失败时会话保持原状。

use crate::domain::key_codec::{self, SecretKey};
use crate::domain::signer::Signer;
use crate::error::{AppError, AppResult};
use crate::utils::log_redact::redact_address;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

#[derive(Debug, Default)]
pub struct Session {
    signer: Option<Signer>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// 导入 Base58 私钥并返回钱包地址
    pub fn connect(&mut self, secret_text: &str) -> AppResult<&str> {
        tracing::info!("Importing wallet...");
        let secret = key_codec::decode_secret_key(secret_text).map_err(|e| {
            tracing::error!(error = %e, "Import failed");
            e
        })?;
        self.connect_with_key(&secret)
    }

    pub fn connect_with_key(&mut self, secret: &SecretKey) -> AppResult<&str> {
        let signer = Signer::from_secret_key(secret).map_err(|e| {
            tracing::error!(error = %e, "Import failed");
            e
        })?;
        tracing::info!(wallet = %redact_address(signer.address()), "✅ Wallet imported");

        let signer = self.signer.insert(signer);
        Ok(signer.address())
    }

    /// 断开会话，签名器随之销毁（私钥在 drop 时清零）
    pub fn disconnect(&mut self) {
        if let Some(signer) = self.signer.take() {
            tracing::info!(wallet = %redact_address(signer.address()), "Wallet disconnected");
        }
    }

    pub fn state(&self) -> SessionState {
        if self.signer.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.signer.is_some()
    }

    pub fn signer(&self) -> AppResult<&Signer> {
        self.signer.as_ref().ok_or_else(AppError::not_connected)
    }

    pub fn address(&self) -> AppResult<&str> {
        self.signer().map(Signer::address)
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::SigningKey;

    use super::*;
    use crate::error::AppErrorCode;

    fn secret_text(seed: u8) -> String {
        key_codec::encode_base58(&SigningKey::from_bytes(&[seed; 32]).to_keypair_bytes())
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(session.address().unwrap_err().code, AppErrorCode::NotConnected);

        let address = session.connect(&secret_text(9)).unwrap().to_string();
        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(session.address().unwrap(), address);

        session.disconnect();
        assert!(!session.is_connected());
        assert_eq!(session.signer().unwrap_err().code, AppErrorCode::NotConnected);
    }

    #[test]
    fn test_failed_import_keeps_previous_state() {
        let mut session = Session::new();
        let err = session.connect("0000").unwrap_err();
        assert_eq!(err.code, AppErrorCode::InvalidCharacter);
        assert!(!session.is_connected());

        let address = session.connect(&secret_text(10)).unwrap().to_string();
        let short = key_codec::encode_base58(&[1u8; 32]);
        assert_eq!(
            session.connect(&short).unwrap_err().code,
            AppErrorCode::InvalidKeyLength
        );
        assert_eq!(session.address().unwrap(), address);
    }

    #[test]
    fn test_connect_from_zeroizing_text() {
        let mut session = Session::new();

        // 导入失败时私钥文本同样在离开作用域时清零
        let bad = zeroize::Zeroizing::new(String::from("0OIl"));
        assert_eq!(
            session.connect(&bad).unwrap_err().code,
            AppErrorCode::InvalidCharacter
        );
        drop(bad);
        assert!(!session.is_connected());

        let secret = zeroize::Zeroizing::new(secret_text(11));
        session.connect(&secret).unwrap();
        drop(secret);
        assert!(session.is_connected());
    }
}

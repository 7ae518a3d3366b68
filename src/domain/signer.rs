//! Ed25519 签名器
//!
//! 中继鉴权消息格式：`ShadowWire:<发送方地址>:<毫秒时间戳>`，签名以 Base64 传输。

use std::fmt;

use base64::Engine;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};

use crate::domain::key_codec::{self, SecretKey};
use crate::error::{AppError, AppResult};

/// 中继鉴权协议标识
pub const AUTH_PROTOCOL: &str = "ShadowWire";

/// 构造鉴权消息
pub fn auth_message(address: &str, timestamp_ms: i64) -> String {
    format!("{}:{}:{}", AUTH_PROTOCOL, address, timestamp_ms)
}

/// 一次鉴权签名的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSignature {
    pub timestamp_ms: i64,
    /// Base64 编码的 64 字节签名
    pub signature: String,
}

pub struct Signer {
    signing_key: SigningKey,
    address: String,
}

impl Signer {
    /// 从 64 字节私钥构造；后 32 字节必须与种子派生出的公钥一致
    pub fn from_secret_key(secret: &SecretKey) -> AppResult<Self> {
        let signing_key = SigningKey::from_keypair_bytes(secret.as_bytes())?;
        let address = key_codec::encode_base58(signing_key.verifying_key().as_bytes());
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Base58 公钥地址
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// 分离签名（Ed25519 对同一消息总是产生相同签名）
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    pub fn sign_auth(&self, timestamp_ms: i64) -> AuthSignature {
        let message = auth_message(&self.address, timestamp_ms);
        let signature = self.sign(message.as_bytes());
        AuthSignature {
            timestamp_ms,
            signature: base64::engine::general_purpose::STANDARD.encode(signature),
        }
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// 用 Base58 地址校验一条分离签名
pub fn verify(address: &str, message: &[u8], signature: &[u8]) -> AppResult<bool> {
    let public: [u8; 32] = key_codec::decode_base58(address)?
        .try_into()
        .map_err(|_| AppError::validation(format!("Invalid address: {}", address)))?;
    let verifying_key = VerifyingKey::from_bytes(&public)?;
    let Ok(signature) = Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(message, &signature).is_ok())
}

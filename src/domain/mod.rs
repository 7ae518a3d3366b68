//! Domain 模块
//!
//! 包含密钥、签名、会话和转账模型

pub mod key_codec;
pub mod session;
pub mod signer;
pub mod transfer;

// 重新导出常用类型
pub use key_codec::{decode_base58, decode_secret_key, encode_base58, SecretKey};
pub use session::{Session, SessionState};
pub use signer::{AuthSignature, Signer, AUTH_PROTOCOL};
pub use transfer::{
    Balance, Recipient, TransferKind, TransferRequest, TransferResult, LAMPORTS_PER_SOL,
};

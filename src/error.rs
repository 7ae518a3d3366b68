use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorCode {
    // 密钥编解码
    InvalidCharacter,
    InvalidKeyLength,
    InvalidKeypair,

    // 会话状态
    NotConnected,

    // 业务校验
    ValidationError,

    // 中继服务
    NetworkError,
    RelayRejected,

    // 配置
    ConfigError,
}

impl AppErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppErrorCode::InvalidCharacter => "invalid_character",
            AppErrorCode::InvalidKeyLength => "invalid_key_length",
            AppErrorCode::InvalidKeypair => "invalid_keypair",
            AppErrorCode::NotConnected => "not_connected",
            AppErrorCode::ValidationError => "validation_error",
            AppErrorCode::NetworkError => "network_error",
            AppErrorCode::RelayRejected => "relay_rejected",
            AppErrorCode::ConfigError => "config_error",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    pub code: AppErrorCode,
    pub message: String,
}

/// 对外展示用的错误体（CLI / 上层 UI 输出）
#[derive(Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'a str,
    pub message: &'a str,
}

impl AppError {
    pub fn new(code: AppErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
        }
    }

    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            code: self.code.as_str(),
            message: &self.message,
        }
    }

    pub fn is(&self, code: AppErrorCode) -> bool {
        self.code == code
    }

    pub fn invalid_character(ch: char) -> Self {
        Self::new(
            AppErrorCode::InvalidCharacter,
            format!("Invalid base58 character: {}", ch),
        )
    }

    pub fn invalid_key_length(len: usize) -> Self {
        Self::new(
            AppErrorCode::InvalidKeyLength,
            format!("Invalid key length: {} (expected 64)", len),
        )
    }

    pub fn invalid_keypair(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::InvalidKeypair, msg)
    }

    /// 未导入钱包时调用需要签名的操作
    pub fn not_connected() -> Self {
        Self::new(AppErrorCode::NotConnected, "Wallet not connected")
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::ValidationError, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::NetworkError, msg)
    }

    /// 中继返回了结构正确但表示失败的响应
    pub fn relay_rejected(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::RelayRejected, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::ConfigError, msg)
    }
}

// 从 reqwest 错误转换
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::network(format!("Relay request timed out: {}", err));
        }
        if err.is_decode() {
            return Self::network(format!("Malformed relay response: {}", err));
        }
        Self::network(format!("Relay request failed: {}", err))
    }
}

// 从 serde_json 错误转换
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::network(format!("Malformed relay response: {}", err))
    }
}

// 从 ed25519 错误转换
impl From<ed25519_dalek::SignatureError> for AppError {
    fn from(err: ed25519_dalek::SignatureError) -> Self {
        Self::invalid_keypair(format!("Invalid keypair: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

//! ShadowWire - 隐私转账中继客户端
//!
//! 导入 Base58 私钥，查询池内余额，向中继提交签名转账（单笔与批量）。
//! 私钥只在本地用于签名，永不发送。

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use error::{AppError, AppErrorCode, AppResult};

pub mod prelude {
    pub use crate::{
        config::{Config, RelayConfig, TransferConfig},
        domain::{Balance, Recipient, Session, TransferKind, TransferRequest, TransferResult},
        error::{AppError, AppErrorCode, AppResult},
        service::{BatchReport, CancelFlag, RelayApi, RelayClient, TransferService},
    };
}

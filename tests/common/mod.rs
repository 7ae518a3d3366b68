//! 测试辅助模块
//! 提供内存中继、模拟 HTTP 中继服务器和测试钱包

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use ed25519_dalek::SigningKey;
use rust_decimal::Decimal;
use serde_json::Value;
use shadowwire::{
    config::{RelayConfig, TransferConfig},
    domain::{encode_base58, Balance, Recipient, Session, TransferRequest, TransferResult},
    error::AppResult,
    service::RelayApi,
};

/// 批量转账的四个收款方
pub fn four_recipients() -> Vec<Recipient> {
    vec![
        Recipient::new("CLaw...", "CLawNbmwnGcyAGBr8KsNbzHQkYr96ptTsEZVLzkqtjg2"),
        Recipient::new("c1aw...", "c1awCJKvfH1iERbHhhzn1o1qCG2qGPxKGCz5ym2mTV5"),
        Recipient::new("cLAw...", "cLAwMD5py6ZKAU3qhbYf2MVPnaHt2xX5v3S9couyM6v"),
        Recipient::new("cLaw...", "cLaw2M5vpjdLzeAMeZsvdbzNxDTt1K9A49GQXbTD9vt"),
    ]
}

pub fn transfer_config(batch_delay_ms: u64) -> TransferConfig {
    TransferConfig {
        token: "SOL".into(),
        min_amount: Decimal::new(1, 1),
        batch_amount: Decimal::new(1, 1),
        batch_delay_ms,
        recipients: four_recipients(),
    }
}

/// Base58 私钥文本（种子固定）
pub fn secret_text(seed: u8) -> String {
    encode_base58(&SigningKey::from_bytes(&[seed; 32]).to_keypair_bytes())
}

pub fn connected_session(seed: u8) -> Session {
    let mut session = Session::new();
    session
        .connect(&secret_text(seed))
        .expect("test key must import");
    session
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 内存中继
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 按脚本依次返回结果的中继；脚本耗尽后一律成功
#[derive(Default)]
pub struct ScriptedRelay {
    script: Mutex<VecDeque<AppResult<TransferResult>>>,
    pub submitted: Mutex<Vec<TransferRequest>>,
    pub submitted_at: Mutex<Vec<tokio::time::Instant>>,
    pub balance_calls: AtomicUsize,
    pub balance_lamports: u64,
}

impl ScriptedRelay {
    pub fn new(script: Vec<AppResult<TransferResult>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            balance_lamports: 3_000_000_000,
            ..Self::default()
        })
    }

    pub fn submitted(&self) -> Vec<TransferRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelayApi for ScriptedRelay {
    async fn get_balance(&self, _address: &str) -> Balance {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Balance::from_lamports(self.balance_lamports)
    }

    async fn submit_transfer(&self, request: &TransferRequest) -> AppResult<TransferResult> {
        self.submitted.lock().unwrap().push(request.clone());
        self.submitted_at
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Ok(TransferResult::from_response(
                &serde_json::json!({ "success": true, "signature": "5xMockTx" }),
            ))
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 模拟 HTTP 中继
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 固定响应：状态码 + 原始响应体
#[derive(Clone)]
pub struct CannedResponse {
    pub status: StatusCode,
    pub body: String,
}

impl CannedResponse {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

struct MockState {
    balance: CannedResponse,
    transfer: CannedResponse,
    transfers: Mutex<Vec<Value>>,
    balance_paths: Mutex<Vec<String>>,
}

pub struct MockRelayServer {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockRelayServer {
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            api_url: self.base_url.clone(),
            timeout_secs: 5,
        }
    }

    /// 收到的转账请求体
    pub fn transfers(&self) -> Vec<Value> {
        self.state.transfers.lock().unwrap().clone()
    }

    /// 被查询余额的地址
    pub fn balance_queries(&self) -> Vec<String> {
        self.state.balance_paths.lock().unwrap().clone()
    }
}

async fn balance_handler(
    State(state): State<Arc<MockState>>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    state.balance_paths.lock().unwrap().push(address);
    (
        state.balance.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.balance.body.clone(),
    )
}

async fn transfer_handler(State(state): State<Arc<MockState>>, body: String) -> impl IntoResponse {
    let value = serde_json::from_str(&body).unwrap_or(Value::Null);
    state.transfers.lock().unwrap().push(value);
    (
        state.transfer.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.transfer.body.clone(),
    )
}

/// 在 127.0.0.1 随机端口启动模拟中继
pub async fn spawn_mock_relay(balance: CannedResponse, transfer: CannedResponse) -> MockRelayServer {
    let state = Arc::new(MockState {
        balance,
        transfer,
        transfers: Mutex::new(Vec::new()),
        balance_paths: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/api/pool/balance/:address", get(balance_handler))
        .route("/api/pool/transfer", post(transfer_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock relay");
    let addr = listener.local_addr().expect("mock relay address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    MockRelayServer {
        base_url: format!("http://{}/api", addr),
        state,
    }
}

//! ShadowWire 命令行入口
//!
//! 用法：
//!   shadowwire balance
//!   shadowwire send <recipient> <amount> [internal|external]
//!   shadowwire batch
//!
//! 私钥从环境变量 SHADOWWIRE_SECRET_KEY 读取（Base58）。

use std::{str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use shadowwire::{
    config::Config,
    domain::{Session, TransferKind},
    error::AppError,
    infrastructure::logging,
    service::{CancelFlag, RelayApi, RelayClient, TransferService},
};
use zeroize::Zeroizing;

enum Command {
    Balance,
    Send {
        recipient: String,
        amount: Decimal,
        kind: TransferKind,
    },
    Batch,
}

fn parse_command() -> Result<Command> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("balance") | None => Ok(Command::Balance),
        Some("batch") => Ok(Command::Batch),
        Some("send") => {
            let recipient = args.next().context("send: missing <recipient>")?;
            let amount = args.next().context("send: missing <amount>")?;
            let amount = Decimal::from_str(amount.trim())
                .with_context(|| format!("send: invalid amount: {}", amount))?;
            let kind = match args.next() {
                Some(kind) => TransferKind::from_str(&kind)?,
                None => TransferKind::External,
            };
            Ok(Command::Send {
                recipient,
                amount,
                kind,
            })
        }
        Some(other) => anyhow::bail!("Unknown command: {}", other),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // 业务错误按 {code, message} 输出，其余保留上下文链
        match e.downcast_ref::<AppError>() {
            Some(app) => match serde_json::to_string(&app.body()) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => eprintln!("{}", app),
            },
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // 1. 加载环境变量
    dotenvy::dotenv().ok();

    // 2. 加载配置（CONFIG_PATH 指向的文件优先）
    let config_path = std::env::var("CONFIG_PATH").ok();
    let config = Config::from_env_and_file(config_path.as_deref())?;
    config.validate()?;

    // 3. 初始化日志
    logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let command = parse_command()?;

    // 4. 导入钱包
    let secret = Zeroizing::new(
        std::env::var("SHADOWWIRE_SECRET_KEY").context("SHADOWWIRE_SECRET_KEY must be set")?,
    );
    let mut session = Session::new();
    session.connect(&secret)?;
    drop(secret);

    let relay: Arc<dyn RelayApi> = Arc::new(RelayClient::new(&config.relay)?);
    let service = TransferService::new(relay, config.transfer.clone());

    // 5. 执行命令
    match command {
        Command::Balance => {
            let balance = service.refresh_balance(&session).await?;
            println!("{:.4} SOL", balance.sol());
        }
        Command::Send {
            recipient,
            amount,
            kind,
        } => {
            let receipt = service
                .send_transfer(&session, &recipient, amount, kind)
                .await?;
            println!("{}", receipt.result.status_message());
            if let Some(balance) = receipt.balance {
                println!("Balance: {:.4} SOL", balance.sol());
            }
        }
        Command::Batch => {
            let cancel = CancelFlag::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Ctrl-C received, stopping after the current transfer");
                    ctrl_c.cancel();
                }
            });

            let report = service.batch_transfer_with_cancel(&session, &cancel).await?;
            for outcome in &report.outcomes {
                println!(
                    "{}: {}",
                    outcome.recipient.label,
                    outcome.result.status_message()
                );
            }
            println!("{}", report.summary());
            println!("Balance: {:.4} SOL", report.balance.sol());
        }
    }

    session.disconnect();
    Ok(())
}

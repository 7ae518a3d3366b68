pub mod relay_client;
pub mod transfer_service;

pub use relay_client::{RelayApi, RelayClient};
pub use transfer_service::{BatchItemOutcome, BatchReport, CancelFlag, TransferReceipt, TransferService};

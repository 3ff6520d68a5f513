// Smart Wallet Core Library
// Codec, account lists and instruction builders for the smart wallet program

pub mod error;
pub mod state;
pub mod instruction;
pub mod swap;
pub mod accounts;
pub mod pda;
pub mod tx_builder;
pub mod planner;
pub mod settings;
pub mod rpc_client;

#[cfg(feature = "native")]
pub mod native;

// Re-exports
pub use error::{CoreError, DecodeError};
pub use state::SmartWalletAccount;
pub use instruction::SmartWalletInstruction;
pub use swap::SwapInstruction;
pub use accounts::PurchaseAccountsBuilder;
pub use settings::Settings;
pub use planner::{plan_purchase, PurchaseDecision, PurchasePlan};
pub use rpc_client::*;

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;
use std::str::FromStr;

/// Environment variables with this prefix override file values,
/// e.g. `SMART_WALLET_PROGRAM_ID` or `SMART_WALLET_RPC_URL`.
pub const ENV_PREFIX: &str = "SMART_WALLET";

pub const MAINNET_USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const JUPITER_V6_PROGRAM: &str = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Deployed smart wallet program.
    pub program_id: String,
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_usdc_mint")]
    pub usdc_mint: String,
    /// Program every relayed swap must target.
    #[serde(default = "default_swap_program_id")]
    pub swap_program_id: String,
    /// Mints considered for purchase, in priority order.
    #[serde(default)]
    pub candidate_mints: Vec<String>,
}

impl Settings {
    pub fn from_file(path: &str) -> Result<Self, CoreError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX));
        let cfg = builder.build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Like `from_file` but the file is optional; everything may come from
    /// the environment.
    pub fn load(path: Option<&str>) -> Result<Self, CoreError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let cfg = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), CoreError> {
        let toml_string = toml::to_string(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    pub fn program_pubkey(&self) -> Result<Pubkey, CoreError> {
        parse_pubkey("program_id", &self.program_id)
    }

    pub fn usdc_mint_pubkey(&self) -> Result<Pubkey, CoreError> {
        parse_pubkey("usdc_mint", &self.usdc_mint)
    }

    pub fn swap_program_pubkey(&self) -> Result<Pubkey, CoreError> {
        parse_pubkey("swap_program_id", &self.swap_program_id)
    }

    pub fn candidate_pubkeys(&self) -> Result<Vec<Pubkey>, CoreError> {
        self.candidate_mints
            .iter()
            .map(|mint| parse_pubkey("candidate_mints", mint))
            .collect()
    }

    /// Validate settings ranges and constraints
    pub fn validate(&self) -> Result<(), CoreError> {
        self.program_pubkey()?;
        self.usdc_mint_pubkey()?;
        self.swap_program_pubkey()?;
        self.candidate_pubkeys()?;
        if self.rpc_url.trim().is_empty() {
            return Err(CoreError::Config("rpc_url must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, CoreError> {
    Pubkey::from_str(value.trim())
        .map_err(|e| CoreError::Config(format!("{} {:?} is not a valid address: {}", field, value, e)))
}

fn default_rpc_url() -> String { "https://api.mainnet-beta.solana.com".to_string() }
fn default_usdc_mint() -> String { MAINNET_USDC_MINT.to_string() }
fn default_swap_program_id() -> String { JUPITER_V6_PROGRAM.to_string() }

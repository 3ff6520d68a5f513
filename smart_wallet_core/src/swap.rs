// Swap-provider instruction model.
// Only `programId`, `accounts` and `data` are consumed; everything else in the
// provider's response is ignored.

use base64::{engine::general_purpose::STANDARD as Base64Engine, Engine as _};
use serde::Deserialize;
use serde_json::Value;
use solana_program::{instruction::AccountMeta, pubkey::Pubkey};
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapAccountJson {
    pub pubkey: String,
    #[serde(default)]
    pub is_signer: bool,
    #[serde(default)]
    pub is_writable: bool,
}

/// Wire shape of a swap instruction as returned by the quote provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInstructionJson {
    pub program_id: String,
    pub accounts: Vec<SwapAccountJson>,
    /// Base64 encoded instruction data.
    pub data: String,
}

/// Parsed swap instruction ready to be relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl SwapInstruction {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidInput(format!("swap response is not JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Accepts the bare instruction object or a full response that wraps it
    /// under `swapInstruction`.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        let target = value.get("swapInstruction").unwrap_or(value);
        let raw: SwapInstructionJson = serde_json::from_value(target.clone())
            .map_err(|e| CoreError::InvalidInput(format!("malformed swap instruction: {}", e)))?;
        Self::try_from(raw)
    }

    /// Reject a swap routed through a program other than `expected`.
    pub fn ensure_program(&self, expected: &Pubkey) -> Result<(), CoreError> {
        if self.program_id != *expected {
            return Err(CoreError::InvalidInput(format!(
                "swap targets program {}, expected {}",
                self.program_id, expected
            )));
        }
        Ok(())
    }
}

impl TryFrom<SwapInstructionJson> for SwapInstruction {
    type Error = CoreError;

    fn try_from(raw: SwapInstructionJson) -> Result<Self, Self::Error> {
        let program_id = Pubkey::from_str(&raw.program_id)
            .map_err(|e| CoreError::InvalidInput(format!("swap programId {:?}: {}", raw.program_id, e)))?;

        let accounts = raw
            .accounts
            .iter()
            .enumerate()
            .map(|(index, account)| {
                let pubkey = Pubkey::from_str(&account.pubkey).map_err(|e| {
                    CoreError::InvalidInput(format!(
                        "swap account {} pubkey {:?}: {}",
                        index, account.pubkey, e
                    ))
                })?;
                Ok(AccountMeta {
                    pubkey,
                    is_signer: account.is_signer,
                    is_writable: account.is_writable,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let data = Base64Engine
            .decode(raw.data.trim())
            .map_err(|e| CoreError::InvalidInput(format!("swap data is not base64: {}", e)))?;

        Ok(SwapInstruction { program_id, accounts, data })
    }
}

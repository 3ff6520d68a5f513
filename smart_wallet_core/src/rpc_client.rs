// RPC client abstraction - the codec never talks to the network itself;
// callers hand a client to these helpers.

use crate::error::CoreError;
use crate::state::SmartWalletAccount;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as Base64Engine, Engine as _};
use log::debug;
use serde_json::Value;

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, CoreError>;

#[async_trait(?Send)]
pub trait RpcClient {
    /// Account info in the JSON-RPC shape, `data` as `[payload, encoding]`.
    /// `None` when the account does not exist.
    async fn get_account_info(&self, pubkey: &str) -> RpcResult<Option<Value>>;

    /// Raw token amount in base units.
    async fn get_token_account_balance(&self, pubkey: &str) -> RpcResult<u64>;
}

/// Pull the raw bytes out of an account-info JSON value. Handles the
/// `[payload, "base64"]` / `[payload, "base58"]` pair and a bare base64 string.
pub fn decode_account_data(account_info: &Value) -> RpcResult<Vec<u8>> {
    let data = account_info
        .get("data")
        .ok_or_else(|| CoreError::ParseError("account info has no data field".to_string()))?;

    let (payload, encoding) = match data {
        Value::String(s) => (s.as_str(), "base64"),
        Value::Array(parts) => {
            let payload = parts
                .first()
                .and_then(|p| p.as_str())
                .ok_or_else(|| CoreError::ParseError("account data array is empty".to_string()))?;
            let encoding = parts.get(1).and_then(|e| e.as_str()).unwrap_or("base64");
            (payload, encoding)
        }
        other => {
            return Err(CoreError::ParseError(format!("unexpected account data format: {}", other)));
        }
    };

    match encoding {
        "base64" => Base64Engine
            .decode(payload)
            .map_err(|e| CoreError::ParseError(format!("Failed to decode base64: {}", e))),
        "base58" => bs58::decode(payload)
            .into_vec()
            .map_err(|e| CoreError::ParseError(format!("Failed to decode base58: {}", e))),
        other => Err(CoreError::ParseError(format!("unsupported account data encoding: {}", other))),
    }
}

/// Fetch and decode a smart wallet record.
pub async fn fetch_smart_wallet<C: RpcClient + ?Sized>(
    address: &str,
    client: &C,
) -> RpcResult<SmartWalletAccount> {
    let account_info = client
        .get_account_info(address)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Smart wallet account not found: {}", address)))?;

    let data = decode_account_data(&account_info)?;
    debug!("Fetched {} bytes for smart wallet {}", data.len(), address);
    SmartWalletAccount::unpack(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solana_program::pubkey::Pubkey;
    use std::collections::HashMap;

    struct MockRpc {
        accounts: HashMap<String, Value>,
    }

    #[async_trait(?Send)]
    impl RpcClient for MockRpc {
        async fn get_account_info(&self, pubkey: &str) -> RpcResult<Option<Value>> {
            Ok(self.accounts.get(pubkey).cloned())
        }

        async fn get_token_account_balance(&self, _pubkey: &str) -> RpcResult<u64> {
            Ok(0)
        }
    }

    fn sample_wallet() -> SmartWalletAccount {
        SmartWalletAccount {
            is_initialized: true,
            owner: Pubkey::new_unique(),
            authority_bump_seed: 253,
            authority_pubkey: Pubkey::new_unique(),
            is_active: true,
            external_authority: Some(Pubkey::new_unique()),
            usdc_token_mint: Pubkey::new_unique(),
            increment_amount: 5_000_000,
            max_tokens_per_run: 1,
            email_notifications: false,
            user_email: String::new(),
            low_balance_notified: false,
        }
    }

    #[tokio::test]
    async fn fetch_decodes_padded_account() {
        let wallet = sample_wallet();
        let mut raw = vec![0u8; SmartWalletAccount::LEN];
        wallet.pack_into_slice(&mut raw).unwrap();

        let address = Pubkey::new_unique().to_string();
        let mut accounts = HashMap::new();
        accounts.insert(
            address.clone(),
            json!({ "data": [Base64Engine.encode(&raw), "base64"], "lamports": 1 }),
        );
        let client = MockRpc { accounts };

        assert_eq!(fetch_smart_wallet(&address, &client).await.unwrap(), wallet);
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let client = MockRpc { accounts: HashMap::new() };
        let result = fetch_smart_wallet("11111111111111111111111111111111", &client).await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[test]
    fn decodes_base58_payload() {
        let value = json!({ "data": [bs58::encode([1u8, 2, 3]).into_string(), "base58"] });
        assert_eq!(decode_account_data(&value).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn rejects_unknown_encoding() {
        let value = json!({ "data": ["abc", "jsonParsed"] });
        assert!(matches!(decode_account_data(&value), Err(CoreError::ParseError(_))));
    }
}

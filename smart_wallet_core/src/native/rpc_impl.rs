// Native RPC client implementation wrapping solana_client::RpcClient

use crate::error::CoreError;
use crate::rpc_client::{RpcClient as RpcClientTrait, RpcResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as Base64Engine, Engine as _};
use log::debug;
use serde_json::{json, Value};
use solana_client::rpc_client::RpcClient as SolanaRpcClient;
use solana_program::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;

pub struct NativeRpcClient {
    client: Arc<SolanaRpcClient>,
}

impl NativeRpcClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Arc::new(SolanaRpcClient::new(endpoint)),
        }
    }

    pub fn from_arc(client: Arc<SolanaRpcClient>) -> Self {
        Self { client }
    }
}

fn parse_pubkey(pubkey: &str) -> RpcResult<Pubkey> {
    Pubkey::from_str(pubkey).map_err(|e| CoreError::ParseError(format!("Invalid pubkey {}: {}", pubkey, e)))
}

#[async_trait(?Send)]
impl RpcClientTrait for NativeRpcClient {
    async fn get_account_info(&self, pubkey: &str) -> RpcResult<Option<Value>> {
        debug!("Native RPC: get_account_info for {}", pubkey);
        let pubkey = parse_pubkey(pubkey)?;

        let client = self.client.clone();
        let response = tokio::task::spawn_blocking(move || {
            client.get_account_with_commitment(&pubkey, client.commitment())
        })
        .await
        .map_err(|e| CoreError::Rpc(format!("Task join error: {}", e)))?
        .map_err(|e| CoreError::Rpc(format!("get_account_info failed: {}", e)))?;

        Ok(response.value.map(|acc| {
            json!({
                "data": [Base64Engine.encode(&acc.data), "base64"],
                "executable": acc.executable,
                "lamports": acc.lamports,
                "owner": acc.owner.to_string(),
                "rentEpoch": acc.rent_epoch,
            })
        }))
    }

    async fn get_token_account_balance(&self, pubkey: &str) -> RpcResult<u64> {
        debug!("Native RPC: get_token_account_balance for {}", pubkey);
        let pubkey = parse_pubkey(pubkey)?;

        let client = self.client.clone();
        let balance = tokio::task::spawn_blocking(move || client.get_token_account_balance(&pubkey))
            .await
            .map_err(|e| CoreError::Rpc(format!("Task join error: {}", e)))?
            .map_err(|e| CoreError::Rpc(format!("get_token_account_balance failed: {}", e)))?;

        balance
            .amount
            .parse::<u64>()
            .map_err(|e| CoreError::ParseError(format!("Failed to parse token balance: {}", e)))
    }
}

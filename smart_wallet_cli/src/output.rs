// JSON rendering for decoded records and built instructions

use serde_json::{json, Value};
use smart_wallet_core::planner::{usdc_ui_amount, PurchaseDecision};
use smart_wallet_core::{SmartWalletAccount, SmartWalletInstruction};
use solana_program::instruction::{AccountMeta, Instruction};

pub fn account_json(wallet: &SmartWalletAccount) -> Value {
    json!({
        "isInitialized": wallet.is_initialized,
        "owner": wallet.owner.to_string(),
        "authorityBumpSeed": wallet.authority_bump_seed,
        "authorityPubkey": wallet.authority_pubkey.to_string(),
        "isActive": wallet.is_active,
        "externalAuthority": wallet.external_authority.map(|k| k.to_string()),
        "usdcTokenMint": wallet.usdc_token_mint.to_string(),
        "incrementAmount": wallet.increment_amount,
        "maxTokensPerRun": wallet.max_tokens_per_run,
        "emailNotifications": wallet.email_notifications,
        "userEmail": wallet.user_email,
        "lowBalanceNotified": wallet.low_balance_notified,
    })
}

pub fn account_meta_json(meta: &AccountMeta) -> Value {
    json!({
        "pubkey": meta.pubkey.to_string(),
        "isSigner": meta.is_signer,
        "isWritable": meta.is_writable,
    })
}

pub fn account_metas_json(metas: &[AccountMeta]) -> Value {
    Value::Array(metas.iter().map(account_meta_json).collect())
}

pub fn instruction_data_json(ix: &SmartWalletInstruction) -> Value {
    match ix {
        SmartWalletInstruction::Initialize {
            increment_amount,
            max_tokens_per_run,
            email,
            enable_notifications,
        } => json!({
            "incrementAmount": increment_amount,
            "maxTokensPerRun": max_tokens_per_run,
            "email": email,
            "enableNotifications": enable_notifications,
        }),
        SmartWalletInstruction::DepositUsdc { amount }
        | SmartWalletInstruction::WithdrawUsdc { amount } => json!({ "amount": amount }),
        SmartWalletInstruction::UpdateSettings {
            increment_amount,
            max_tokens_per_run,
            email,
            enable_notifications,
        } => json!({
            "incrementAmount": increment_amount,
            "maxTokensPerRun": max_tokens_per_run,
            "email": email,
            "enableNotifications": enable_notifications,
        }),
        SmartWalletInstruction::PurchaseTokens { token_mints, jupiter_swap_ix_data } => json!({
            "tokenMints": token_mints.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
            "swapDataLen": jupiter_swap_ix_data.len(),
        }),
        SmartWalletInstruction::AuthorizeExternal
        | SmartWalletInstruction::ResetLowBalanceFlag
        | SmartWalletInstruction::CancelSmartWallet => json!({}),
    }
}

pub fn instruction_json(ix: &SmartWalletInstruction, data: &[u8]) -> Value {
    json!({
        "instruction": ix.name(),
        "tag": ix.tag(),
        "fields": instruction_data_json(ix),
        "dataBase58": bs58::encode(data).into_string(),
        "dataHex": hex::encode(data),
    })
}

pub fn built_instruction_json(ix: &Instruction) -> Value {
    json!({
        "programId": ix.program_id.to_string(),
        "accounts": account_metas_json(&ix.accounts),
        "dataBase58": bs58::encode(&ix.data).into_string(),
        "dataHex": hex::encode(&ix.data),
    })
}

pub fn decision_json(decision: &PurchaseDecision) -> Value {
    match decision {
        PurchaseDecision::Skip(reason) => json!({
            "action": "skip",
            "reason": reason.to_string(),
        }),
        PurchaseDecision::InsufficientBalance { balance, required, notify } => json!({
            "action": "insufficientBalance",
            "balance": balance,
            "balanceUi": usdc_ui_amount(*balance),
            "required": required,
            "notify": notify,
        }),
        PurchaseDecision::Buy(plan) => json!({
            "action": "buy",
            "mints": plan.mints.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
            "incrementAmount": plan.increment_amount,
            "remainingBalance": plan.remaining_balance,
            "remainingBalanceUi": usdc_ui_amount(plan.remaining_balance),
            "notifyLowBalance": plan.notify_low_balance,
        }),
    }
}

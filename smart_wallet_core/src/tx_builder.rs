// Complete instructions for the smart wallet program.
// Each builder pairs an encoded payload with its positional account list.

use log::debug;
use solana_program::{instruction::Instruction, pubkey::Pubkey};

use crate::accounts::{
    authorize_external_accounts, cancel_accounts, deposit_usdc_accounts, initialize_accounts,
    wallet_record_accounts, withdraw_usdc_accounts, PurchaseAccountsBuilder,
};
use crate::error::CoreError;
use crate::instruction::SmartWalletInstruction;
use crate::swap::SwapInstruction;

/// Fields for `UpdateSettings`; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub increment_amount: Option<u64>,
    pub max_tokens_per_run: Option<u8>,
    pub email: Option<String>,
    pub enable_notifications: Option<bool>,
}

/// Addresses involved in a `PurchaseTokens` call.
#[derive(Debug, Clone)]
pub struct PurchaseContext {
    pub authority: Pubkey,
    pub smart_wallet: Pubkey,
    pub wallet_token_account: Pubkey,
    pub token_program: Pubkey,
}

fn assemble(
    program_id: &Pubkey,
    ix: SmartWalletInstruction,
    accounts: Vec<solana_program::instruction::AccountMeta>,
) -> Result<Instruction, CoreError> {
    let data = ix.pack()?;
    debug!("{}: {} data bytes, {} accounts", ix.name(), data.len(), accounts.len());
    Ok(Instruction { program_id: *program_id, accounts, data })
}

pub fn build_initialize_instruction(
    program_id: &Pubkey,
    funder: &Pubkey,
    smart_wallet: &Pubkey,
    usdc_mint: &Pubkey,
    increment_amount: u64,
    max_tokens_per_run: u8,
    email: String,
    enable_notifications: bool,
) -> Result<Instruction, CoreError> {
    assemble(
        program_id,
        SmartWalletInstruction::Initialize {
            increment_amount,
            max_tokens_per_run,
            email,
            enable_notifications,
        },
        initialize_accounts(funder, smart_wallet, usdc_mint),
    )
}

pub fn build_deposit_instruction(
    program_id: &Pubkey,
    source_owner: &Pubkey,
    source_usdc: &Pubkey,
    wallet_usdc: &Pubkey,
    smart_wallet: &Pubkey,
    amount: u64,
) -> Result<Instruction, CoreError> {
    assemble(
        program_id,
        SmartWalletInstruction::DepositUsdc { amount },
        deposit_usdc_accounts(source_owner, source_usdc, wallet_usdc, smart_wallet),
    )
}

pub fn build_withdraw_instruction(
    program_id: &Pubkey,
    owner: &Pubkey,
    smart_wallet: &Pubkey,
    wallet_usdc: &Pubkey,
    destination_usdc: &Pubkey,
    amount: u64,
) -> Result<Instruction, CoreError> {
    assemble(
        program_id,
        SmartWalletInstruction::WithdrawUsdc { amount },
        withdraw_usdc_accounts(owner, smart_wallet, wallet_usdc, destination_usdc),
    )
}

pub fn build_update_settings_instruction(
    program_id: &Pubkey,
    owner: &Pubkey,
    smart_wallet: &Pubkey,
    update: SettingsUpdate,
) -> Result<Instruction, CoreError> {
    assemble(
        program_id,
        SmartWalletInstruction::UpdateSettings {
            increment_amount: update.increment_amount,
            max_tokens_per_run: update.max_tokens_per_run,
            email: update.email,
            enable_notifications: update.enable_notifications,
        },
        wallet_record_accounts(owner, smart_wallet),
    )
}

pub fn build_authorize_external_instruction(
    program_id: &Pubkey,
    owner: &Pubkey,
    smart_wallet: &Pubkey,
    new_authority: &Pubkey,
) -> Result<Instruction, CoreError> {
    assemble(
        program_id,
        SmartWalletInstruction::AuthorizeExternal,
        authorize_external_accounts(owner, smart_wallet, new_authority),
    )
}

/// Wrap a quoted swap so the wallet program can relay it. The swap's raw
/// data travels inside our payload and its accounts trail the fixed slots.
pub fn build_purchase_tokens_instruction(
    program_id: &Pubkey,
    ctx: &PurchaseContext,
    token_mints: Vec<Pubkey>,
    swap: SwapInstruction,
) -> Result<Instruction, CoreError> {
    let jupiter_swap_ix_data = swap.data.clone();
    let accounts = PurchaseAccountsBuilder::new()
        .authority(ctx.authority)
        .smart_wallet(ctx.smart_wallet)
        .wallet_token_account(ctx.wallet_token_account)
        .token_program(ctx.token_program)
        .swap(swap)
        .build()?;
    assemble(
        program_id,
        SmartWalletInstruction::PurchaseTokens { token_mints, jupiter_swap_ix_data },
        accounts,
    )
}

pub fn build_reset_low_balance_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    smart_wallet: &Pubkey,
) -> Result<Instruction, CoreError> {
    assemble(
        program_id,
        SmartWalletInstruction::ResetLowBalanceFlag,
        wallet_record_accounts(authority, smart_wallet),
    )
}

pub fn build_cancel_instruction(
    program_id: &Pubkey,
    owner: &Pubkey,
    smart_wallet: &Pubkey,
    wallet_usdc: &Pubkey,
    owner_usdc: &Pubkey,
    rent_destination: &Pubkey,
) -> Result<Instruction, CoreError> {
    assemble(
        program_id,
        SmartWalletInstruction::CancelSmartWallet,
        cancel_accounts(owner, smart_wallet, wallet_usdc, owner_usdc, rent_destination),
    )
}

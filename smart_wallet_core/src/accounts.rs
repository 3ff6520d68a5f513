// Ordered account lists for smart wallet instructions.
// The program reads accounts by index, so every list here is positional.

use log::debug;
use solana_program::{
    instruction::AccountMeta,
    pubkey::Pubkey,
    system_program,
    sysvar::{instructions as instructions_sysvar, rent},
};
use std::collections::HashSet;

use crate::error::CoreError;
use crate::swap::SwapInstruction;

/// Number of position-sensitive slots ahead of the swap accounts.
pub const PURCHASE_FIXED_ACCOUNTS: usize = 8;

/// Collects the accounts a `PurchaseTokens` call needs.
///
/// Slots 0..8 are fixed: authority, smart wallet, wallet token account, token
/// program, system program, rent sysvar, instructions sysvar, swap program.
/// The swap provider's accounts follow in the order it returned them.
#[derive(Debug, Clone)]
pub struct PurchaseAccountsBuilder {
    authority: Option<Pubkey>,
    smart_wallet: Option<Pubkey>,
    wallet_token_account: Option<Pubkey>,
    token_program: Pubkey,
    swap: Option<SwapInstruction>,
}

impl Default for PurchaseAccountsBuilder {
    fn default() -> Self {
        Self {
            authority: None,
            smart_wallet: None,
            wallet_token_account: None,
            token_program: spl_token::ID,
            swap: None,
        }
    }
}

impl PurchaseAccountsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fee payer and signing authority (owner or external authority).
    pub fn authority(mut self, authority: Pubkey) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn smart_wallet(mut self, smart_wallet: Pubkey) -> Self {
        self.smart_wallet = Some(smart_wallet);
        self
    }

    pub fn wallet_token_account(mut self, wallet_token_account: Pubkey) -> Self {
        self.wallet_token_account = Some(wallet_token_account);
        self
    }

    /// Defaults to the SPL Token program.
    pub fn token_program(mut self, token_program: Pubkey) -> Self {
        self.token_program = token_program;
        self
    }

    pub fn swap(mut self, swap: SwapInstruction) -> Self {
        self.swap = Some(swap);
        self
    }

    pub fn build(&self) -> Result<Vec<AccountMeta>, CoreError> {
        let authority = require(self.authority, "authority")?;
        let smart_wallet = require(self.smart_wallet, "smart_wallet")?;
        let wallet_token_account = require(self.wallet_token_account, "wallet_token_account")?;
        let swap = self
            .swap
            .as_ref()
            .ok_or_else(|| CoreError::InvalidInput("missing required account: swap instruction".to_string()))?;

        let mut metas = Vec::with_capacity(PURCHASE_FIXED_ACCOUNTS + swap.accounts.len());
        metas.push(AccountMeta::new_readonly(authority, true)); // 0: authority
        metas.push(AccountMeta::new(smart_wallet, false)); // 1: wallet record
        metas.push(AccountMeta::new(wallet_token_account, false)); // 2: wallet USDC
        metas.push(AccountMeta::new_readonly(self.token_program, false)); // 3: token program
        metas.push(AccountMeta::new_readonly(system_program::ID, false)); // 4: system program
        metas.push(AccountMeta::new_readonly(rent::ID, false)); // 5: rent
        metas.push(AccountMeta::new_readonly(instructions_sysvar::ID, false)); // 6: instructions
        metas.push(AccountMeta::new_readonly(swap.program_id, false)); // 7: swap program

        // Fixed slots are emitted even when they share an address; only the
        // swap accounts are collapsed, against the fixed slots and each other.
        let mut seen: HashSet<Pubkey> = metas.iter().map(|meta| meta.pubkey).collect();
        let swap_metas = dedup_first_wins(&mut seen, swap.accounts.iter().cloned());
        let dropped = swap.accounts.len() - swap_metas.len();
        metas.extend(swap_metas);

        debug!(
            "PurchaseTokens accounts: {} fixed + {} swap, {} duplicates dropped",
            PURCHASE_FIXED_ACCOUNTS,
            swap.accounts.len(),
            dropped
        );
        Ok(metas)
    }
}

fn require(value: Option<Pubkey>, name: &str) -> Result<Pubkey, CoreError> {
    value.ok_or_else(|| CoreError::InvalidInput(format!("missing required account: {}", name)))
}

/// Collapse repeated addresses against `seen` and each other. The first
/// reference keeps its position and flags; later references are dropped, not
/// merged.
fn dedup_first_wins(
    seen: &mut HashSet<Pubkey>,
    metas: impl IntoIterator<Item = AccountMeta>,
) -> Vec<AccountMeta> {
    metas.into_iter().filter(|meta| seen.insert(meta.pubkey)).collect()
}

pub fn initialize_accounts(funder: &Pubkey, smart_wallet: &Pubkey, usdc_mint: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*funder, true),
        AccountMeta::new(*smart_wallet, false),
        AccountMeta::new_readonly(*usdc_mint, false),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new_readonly(rent::ID, false),
    ]
}

pub fn deposit_usdc_accounts(
    source_owner: &Pubkey,
    source_usdc: &Pubkey,
    wallet_usdc: &Pubkey,
    smart_wallet: &Pubkey,
) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*source_owner, true),
        AccountMeta::new(*source_usdc, false),
        AccountMeta::new(*wallet_usdc, false),
        AccountMeta::new_readonly(spl_token::ID, false),
        AccountMeta::new(*smart_wallet, false),
    ]
}

pub fn withdraw_usdc_accounts(
    owner: &Pubkey,
    smart_wallet: &Pubkey,
    wallet_usdc: &Pubkey,
    destination_usdc: &Pubkey,
) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*owner, true),
        AccountMeta::new(*smart_wallet, false),
        AccountMeta::new(*wallet_usdc, false),
        AccountMeta::new(*destination_usdc, false),
        AccountMeta::new_readonly(spl_token::ID, false),
    ]
}

/// Owner-signed instructions that only touch the wallet record:
/// `UpdateSettings` and `ResetLowBalanceFlag`.
pub fn wallet_record_accounts(signer: &Pubkey, smart_wallet: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*signer, true),
        AccountMeta::new(*smart_wallet, false),
    ]
}

pub fn authorize_external_accounts(
    owner: &Pubkey,
    smart_wallet: &Pubkey,
    new_authority: &Pubkey,
) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*owner, true),
        AccountMeta::new(*smart_wallet, false),
        AccountMeta::new_readonly(*new_authority, false),
    ]
}

pub fn cancel_accounts(
    owner: &Pubkey,
    smart_wallet: &Pubkey,
    wallet_usdc: &Pubkey,
    owner_usdc: &Pubkey,
    rent_destination: &Pubkey,
) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*owner, true),
        AccountMeta::new(*smart_wallet, false),
        AccountMeta::new(*wallet_usdc, false),
        AccountMeta::new(*owner_usdc, false),
        AccountMeta::new_readonly(spl_token::ID, false),
        AccountMeta::new(*rent_destination, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        authority: Pubkey,
        wallet: Pubkey,
        wallet_usdc: Pubkey,
        swap_program: Pubkey,
    }

    fn fixture() -> Fixture {
        Fixture {
            authority: Pubkey::new_unique(),
            wallet: Pubkey::new_unique(),
            wallet_usdc: Pubkey::new_unique(),
            swap_program: Pubkey::new_unique(),
        }
    }

    fn builder(f: &Fixture, swap_accounts: Vec<AccountMeta>) -> PurchaseAccountsBuilder {
        PurchaseAccountsBuilder::new()
            .authority(f.authority)
            .smart_wallet(f.wallet)
            .wallet_token_account(f.wallet_usdc)
            .swap(SwapInstruction {
                program_id: f.swap_program,
                accounts: swap_accounts,
                data: vec![1, 2, 3],
            })
    }

    #[test]
    fn fixed_slots_then_swap_accounts_without_duplicates() {
        let f = fixture();
        let pool = Pubkey::new_unique();
        let out_mint = Pubkey::new_unique();
        let swap_accounts = vec![
            AccountMeta::new(pool, false),
            // Same address as slot 2 but with different flags: must be dropped.
            AccountMeta::new_readonly(f.wallet_usdc, false),
            AccountMeta::new_readonly(out_mint, false),
        ];

        let metas = builder(&f, swap_accounts).build().unwrap();
        assert_eq!(metas.len(), 10);

        let expected_fixed = [
            AccountMeta::new_readonly(f.authority, true),
            AccountMeta::new(f.wallet, false),
            AccountMeta::new(f.wallet_usdc, false),
            AccountMeta::new_readonly(spl_token::ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(rent::ID, false),
            AccountMeta::new_readonly(instructions_sysvar::ID, false),
            AccountMeta::new_readonly(f.swap_program, false),
        ];
        assert_eq!(&metas[..PURCHASE_FIXED_ACCOUNTS], &expected_fixed);
        assert_eq!(metas[8], AccountMeta::new(pool, false));
        assert_eq!(metas[9], AccountMeta::new_readonly(out_mint, false));
    }

    #[test]
    fn earlier_swap_duplicate_keeps_first_flags() {
        let f = fixture();
        let shared = Pubkey::new_unique();
        let metas = builder(
            &f,
            vec![AccountMeta::new_readonly(shared, false), AccountMeta::new(shared, true)],
        )
        .build()
        .unwrap();
        assert_eq!(metas.len(), 9);
        assert_eq!(metas[8], AccountMeta::new_readonly(shared, false));
    }

    #[test]
    fn custom_token_program_lands_in_slot_three() {
        let f = fixture();
        let token_2022 = Pubkey::new_unique();
        let metas = builder(&f, vec![]).token_program(token_2022).build().unwrap();
        assert_eq!(metas[3].pubkey, token_2022);
    }

    #[test]
    fn missing_fixed_account_is_rejected() {
        let f = fixture();
        let err = PurchaseAccountsBuilder::new()
            .authority(f.authority)
            .wallet_token_account(f.wallet_usdc)
            .build()
            .unwrap_err();
        match err {
            CoreError::InvalidInput(msg) => assert!(msg.contains("smart_wallet")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_swap_is_rejected() {
        let f = fixture();
        let result = PurchaseAccountsBuilder::new()
            .authority(f.authority)
            .smart_wallet(f.wallet)
            .wallet_token_account(f.wallet_usdc)
            .build();
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn colliding_fixed_slots_stay_in_place() {
        let f = fixture();
        let extra = Pubkey::new_unique();
        // Wallet token account equal to the wallet, swap program equal to the token program.
        let metas = PurchaseAccountsBuilder::new()
            .authority(f.authority)
            .smart_wallet(f.wallet)
            .wallet_token_account(f.wallet)
            .swap(SwapInstruction {
                program_id: spl_token::ID,
                accounts: vec![AccountMeta::new(extra, false)],
                data: vec![],
            })
            .build()
            .unwrap();

        assert_eq!(metas.len(), PURCHASE_FIXED_ACCOUNTS + 1);
        assert_eq!(metas[1].pubkey, f.wallet);
        assert_eq!(metas[2].pubkey, f.wallet);
        assert_eq!(metas[3].pubkey, spl_token::ID);
        assert_eq!(metas[7].pubkey, spl_token::ID);
        assert_eq!(metas[8], AccountMeta::new(extra, false));
    }

    #[test]
    fn authority_equal_to_wallet_keeps_eight_fixed_slots() {
        let f = fixture();
        let metas = PurchaseAccountsBuilder::new()
            .authority(f.wallet)
            .smart_wallet(f.wallet)
            .wallet_token_account(f.wallet_usdc)
            .swap(SwapInstruction {
                program_id: system_program::ID,
                accounts: vec![AccountMeta::new_readonly(f.wallet, false)],
                data: vec![],
            })
            .build()
            .unwrap();

        assert_eq!(metas.len(), PURCHASE_FIXED_ACCOUNTS);
        assert_eq!(metas[0], AccountMeta::new_readonly(f.wallet, true));
        assert_eq!(metas[1], AccountMeta::new(f.wallet, false));
        assert_eq!(metas[4].pubkey, system_program::ID);
        assert_eq!(metas[7].pubkey, system_program::ID);
    }

    #[test]
    fn swap_accounts_matching_fixed_slots_are_dropped() {
        let f = fixture();
        let pool = Pubkey::new_unique();
        let metas = builder(
            &f,
            vec![
                AccountMeta::new_readonly(spl_token::ID, false),
                AccountMeta::new(pool, false),
                AccountMeta::new_readonly(f.swap_program, false),
                AccountMeta::new_readonly(f.authority, false),
            ],
        )
        .build()
        .unwrap();
        assert_eq!(metas.len(), PURCHASE_FIXED_ACCOUNTS + 1);
        assert_eq!(metas[8], AccountMeta::new(pool, false));
    }

    #[test]
    fn signer_leads_every_fixed_list() {
        let owner = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        for metas in [
            initialize_accounts(&owner, &wallet, &other),
            deposit_usdc_accounts(&owner, &other, &other, &wallet),
            withdraw_usdc_accounts(&owner, &wallet, &other, &other),
            wallet_record_accounts(&owner, &wallet),
            authorize_external_accounts(&owner, &wallet, &other),
            cancel_accounts(&owner, &wallet, &other, &other, &owner),
        ] {
            assert_eq!(metas[0].pubkey, owner);
            assert!(metas[0].is_signer);
            assert!(metas.iter().skip(1).all(|m| !m.is_signer));
        }
    }
}

// Derived addresses used around a smart wallet

use solana_program::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use crate::error::CoreError;

pub const WALLET_AUTHORITY_SEED: &[u8] = b"wallet";

/// Authority PDA and bump for a wallet owned by `owner`.
pub fn find_wallet_authority(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[WALLET_AUTHORITY_SEED, owner.as_ref()], program_id)
}

/// Rebuild the authority from a stored bump seed. Fails when the seeds land
/// on the curve, which means the bump does not belong to these seeds.
pub fn create_wallet_authority(program_id: &Pubkey, owner: &Pubkey, bump: u8) -> Result<Pubkey, CoreError> {
    Pubkey::create_program_address(&[WALLET_AUTHORITY_SEED, owner.as_ref(), &[bump]], program_id)
        .map_err(|e| CoreError::InvalidInput(format!("authority seeds with bump {}: {}", bump, e)))
}

/// The wallet's USDC associated token account, owned by the authority PDA.
pub fn wallet_usdc_account(authority: &Pubkey, usdc_mint: &Pubkey) -> Pubkey {
    get_associated_token_address(authority, usdc_mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_bump_recreates_authority() {
        let program_id = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let (authority, bump) = find_wallet_authority(&program_id, &owner);
        assert_eq!(create_wallet_authority(&program_id, &owner, bump).unwrap(), authority);
    }

    #[test]
    fn usdc_account_is_stable_per_authority() {
        let authority = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert_eq!(wallet_usdc_account(&authority, &mint), wallet_usdc_account(&authority, &mint));
        assert_ne!(
            wallet_usdc_account(&authority, &mint),
            wallet_usdc_account(&Pubkey::new_unique(), &mint)
        );
    }
}

// Instruction payloads for the smart wallet program.
// Borsh enum encoding: 1-byte tag in declaration order, then the variant's
// fields. Variant order is part of the on-chain contract.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::{CoreError, DecodeError};

/// Names reported by `name()` are the deployed program's, e.g. `DepositUSDC`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum SmartWalletInstruction {
    /// Create the wallet record.
    Initialize {
        increment_amount: u64,
        max_tokens_per_run: u8,
        email: String,
        enable_notifications: bool,
    },

    /// Move USDC from the owner into the wallet's token account.
    DepositUsdc { amount: u64 },

    /// Move USDC out of the wallet back to the owner.
    WithdrawUsdc { amount: u64 },

    /// Absent fields are left unchanged by the program.
    UpdateSettings {
        increment_amount: Option<u64>,
        max_tokens_per_run: Option<u8>,
        email: Option<String>,
        enable_notifications: Option<bool>,
    },

    AuthorizeExternal,

    /// Buy `token_mints`, relaying a pre-quoted swap instruction verbatim.
    PurchaseTokens {
        token_mints: Vec<Pubkey>,
        jupiter_swap_ix_data: Vec<u8>,
    },

    ResetLowBalanceFlag,

    /// Ask the program to deactivate the wallet and return its funds.
    CancelSmartWallet,
}

impl SmartWalletInstruction {
    pub const INITIALIZE: u8 = 0;
    pub const DEPOSIT_USDC: u8 = 1;
    pub const WITHDRAW_USDC: u8 = 2;
    pub const UPDATE_SETTINGS: u8 = 3;
    pub const AUTHORIZE_EXTERNAL: u8 = 4;
    pub const PURCHASE_TOKENS: u8 = 5;
    pub const RESET_LOW_BALANCE_FLAG: u8 = 6;
    pub const CANCEL_SMART_WALLET: u8 = 7;

    pub fn tag(&self) -> u8 {
        match self {
            Self::Initialize { .. } => Self::INITIALIZE,
            Self::DepositUsdc { .. } => Self::DEPOSIT_USDC,
            Self::WithdrawUsdc { .. } => Self::WITHDRAW_USDC,
            Self::UpdateSettings { .. } => Self::UPDATE_SETTINGS,
            Self::AuthorizeExternal => Self::AUTHORIZE_EXTERNAL,
            Self::PurchaseTokens { .. } => Self::PURCHASE_TOKENS,
            Self::ResetLowBalanceFlag => Self::RESET_LOW_BALANCE_FLAG,
            Self::CancelSmartWallet => Self::CANCEL_SMART_WALLET,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize { .. } => "Initialize",
            Self::DepositUsdc { .. } => "DepositUSDC",
            Self::WithdrawUsdc { .. } => "WithdrawUSDC",
            Self::UpdateSettings { .. } => "UpdateSettings",
            Self::AuthorizeExternal => "AuthorizeExternal",
            Self::PurchaseTokens { .. } => "PurchaseTokens",
            Self::ResetLowBalanceFlag => "ResetLowBalanceFlag",
            Self::CancelSmartWallet => "CancelSmartWallet",
        }
    }

    /// Tag byte followed by the variant fields. Values go out exactly as
    /// given; there is no cross-field validation.
    pub fn pack(&self) -> Result<Vec<u8>, CoreError> {
        borsh::to_vec(self).map_err(|e| CoreError::Encode(format!("{}: {}", self.name(), e)))
    }

    /// Strict decode of captured instruction data. Unknown tags and trailing
    /// bytes are rejected.
    pub fn unpack(data: &[u8]) -> Result<Self, CoreError> {
        if data.is_empty() {
            return Err(DecodeError::Truncated {
                field: "tag",
                offset: 0,
                needed: 1,
                available: 0,
            }
            .into());
        }
        Self::try_from_slice(data)
            .map_err(|e| DecodeError::Instruction(format!("tag {}: {}", data[0], e)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<SmartWalletInstruction> {
        vec![
            SmartWalletInstruction::Initialize {
                increment_amount: 20_000_000,
                max_tokens_per_run: 3,
                email: "me@example.com".to_string(),
                enable_notifications: true,
            },
            SmartWalletInstruction::DepositUsdc { amount: 1 },
            SmartWalletInstruction::WithdrawUsdc { amount: 2 },
            SmartWalletInstruction::UpdateSettings {
                increment_amount: None,
                max_tokens_per_run: None,
                email: None,
                enable_notifications: None,
            },
            SmartWalletInstruction::AuthorizeExternal,
            SmartWalletInstruction::PurchaseTokens {
                token_mints: vec![Pubkey::new_from_array([7; 32])],
                jupiter_swap_ix_data: vec![0xde, 0xad],
            },
            SmartWalletInstruction::ResetLowBalanceFlag,
            SmartWalletInstruction::CancelSmartWallet,
        ]
    }

    #[test]
    fn first_byte_is_declaration_order_tag() {
        for (expected, ix) in all_variants().iter().enumerate() {
            let data = ix.pack().unwrap();
            assert_eq!(data[0] as usize, expected, "{}", ix.name());
            assert_eq!(ix.tag() as usize, expected);
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        for ix in all_variants() {
            assert_eq!(ix.pack().unwrap(), ix.clone().pack().unwrap());
        }
    }

    #[test]
    fn update_settings_with_only_max_tokens() {
        let ix = SmartWalletInstruction::UpdateSettings {
            increment_amount: None,
            max_tokens_per_run: Some(5),
            email: None,
            enable_notifications: None,
        };
        assert_eq!(ix.pack().unwrap(), vec![3, 0x00, 0x01, 0x05, 0x00, 0x00]);
    }

    #[test]
    fn initialize_layout() {
        let ix = SmartWalletInstruction::Initialize {
            increment_amount: 0x0102,
            max_tokens_per_run: 9,
            email: "ab".to_string(),
            enable_notifications: false,
        };
        let mut expected = vec![0u8];
        expected.extend_from_slice(&0x0102u64.to_le_bytes());
        expected.push(9);
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(b"ab");
        expected.push(0);
        assert_eq!(ix.pack().unwrap(), expected);
    }

    #[test]
    fn purchase_tokens_layout() {
        let mint = Pubkey::new_from_array([9; 32]);
        let ix = SmartWalletInstruction::PurchaseTokens {
            token_mints: vec![mint],
            jupiter_swap_ix_data: vec![1, 2, 3],
        };
        let data = ix.pack().unwrap();
        assert_eq!(data[0], 5);
        assert_eq!(&data[1..5], &1u32.to_le_bytes());
        assert_eq!(&data[5..37], mint.as_ref());
        assert_eq!(&data[37..41], &3u32.to_le_bytes());
        assert_eq!(&data[41..], &[1, 2, 3]);
    }

    #[test]
    fn unit_variants_are_a_single_byte() {
        assert_eq!(SmartWalletInstruction::AuthorizeExternal.pack().unwrap(), vec![4]);
        assert_eq!(SmartWalletInstruction::ResetLowBalanceFlag.pack().unwrap(), vec![6]);
        assert_eq!(SmartWalletInstruction::CancelSmartWallet.pack().unwrap(), vec![7]);
    }

    #[test]
    fn unpack_reads_captured_data() {
        let ix = SmartWalletInstruction::DepositUsdc { amount: 42 };
        assert_eq!(SmartWalletInstruction::unpack(&ix.pack().unwrap()).unwrap(), ix);
    }

    #[test]
    fn unpack_rejects_unknown_tag_and_empty_data() {
        assert!(matches!(
            SmartWalletInstruction::unpack(&[8]),
            Err(CoreError::Decode(DecodeError::Instruction(_)))
        ));
        assert!(matches!(
            SmartWalletInstruction::unpack(&[]),
            Err(CoreError::Decode(DecodeError::Truncated { field: "tag", .. }))
        ));
    }
}

// On-chain smart wallet record.
// The layout is positional and unversioned; it mirrors the deployed program
// byte for byte, so fields must never be reordered or inserted.

use borsh::BorshSerialize;
use log::debug;
use solana_program::pubkey::Pubkey;

use crate::error::{CoreError, DecodeError};

const PUBKEY_BYTES: usize = 32;

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct SmartWalletAccount {
    pub is_initialized: bool,
    pub owner: Pubkey,
    pub authority_bump_seed: u8,
    pub authority_pubkey: Pubkey,
    pub is_active: bool,
    pub external_authority: Option<Pubkey>,
    pub usdc_token_mint: Pubkey,
    /// USDC base units spent per token purchased.
    pub increment_amount: u64,
    pub max_tokens_per_run: u8,
    pub email_notifications: bool,
    pub user_email: String,
    pub low_balance_notified: bool,
}

impl SmartWalletAccount {
    /// Size the program allocates for a wallet account. The record is written
    /// at the front and the remainder is zero padded.
    pub const LEN: usize = 256;

    /// Decode a record from raw account data.
    ///
    /// Purely structural: nothing is checked beyond what the layout itself
    /// needs. Bytes after `low_balance_notified` are ignored.
    pub fn unpack(data: &[u8]) -> Result<Self, CoreError> {
        let mut reader = LayoutReader::new(data);

        let account = SmartWalletAccount {
            is_initialized: reader.read_bool("is_initialized")?,
            owner: reader.read_pubkey("owner")?,
            authority_bump_seed: reader.read_u8("authority_bump_seed")?,
            authority_pubkey: reader.read_pubkey("authority_pubkey")?,
            is_active: reader.read_bool("is_active")?,
            external_authority: reader.read_option_pubkey("external_authority")?,
            usdc_token_mint: reader.read_pubkey("usdc_token_mint")?,
            increment_amount: reader.read_u64("increment_amount")?,
            max_tokens_per_run: reader.read_u8("max_tokens_per_run")?,
            email_notifications: reader.read_bool("email_notifications")?,
            user_email: reader.read_string("user_email")?,
            low_balance_notified: reader.read_bool("low_balance_notified")?,
        };

        debug!(
            "Decoded smart wallet owner={} ({} of {} bytes used)",
            account.owner,
            reader.offset,
            data.len()
        );
        Ok(account)
    }

    /// Encode the record without padding.
    pub fn pack(&self) -> Result<Vec<u8>, CoreError> {
        borsh::to_vec(self).map_err(|e| CoreError::Encode(format!("smart wallet account: {}", e)))
    }

    /// Write the record into a fixed allocation, zero filling the tail.
    pub fn pack_into_slice(&self, dst: &mut [u8]) -> Result<(), CoreError> {
        let encoded = self.pack()?;
        if encoded.len() > dst.len() {
            return Err(CoreError::InvalidInput(format!(
                "smart wallet record needs {} bytes, destination has {}",
                encoded.len(),
                dst.len()
            )));
        }
        dst[..encoded.len()].copy_from_slice(&encoded);
        dst[encoded.len()..].fill(0);
        Ok(())
    }

    /// Exact encoded size of this record.
    pub fn packed_len(&self) -> usize {
        // bool + owner + bump + authority + bool + option flag + mint + u64 + u8 + bool
        // + string prefix + email + bool
        let fixed = 1 + PUBKEY_BYTES + 1 + PUBKEY_BYTES + 1 + 1 + PUBKEY_BYTES + 8 + 1 + 1 + 4 + 1;
        let external = if self.external_authority.is_some() { PUBKEY_BYTES } else { 0 };
        fixed + external + self.user_email.len()
    }

    /// Whether `signer` may trigger purchases: the owner or the external authority.
    pub fn has_authority(&self, signer: &Pubkey) -> bool {
        self.owner == *signer || self.external_authority.as_ref() == Some(signer)
    }
}

/// Little-endian cursor that reports which field ran out of bytes.
struct LayoutReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> LayoutReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn take(&mut self, field: &'static str, needed: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < needed {
            return Err(DecodeError::Truncated {
                field,
                offset: self.offset,
                needed,
                available: self.remaining(),
            });
        }
        let start = self.offset;
        self.offset += needed;
        Ok(&self.data[start..self.offset])
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(field, 1)?[0])
    }

    fn read_bool(&mut self, field: &'static str) -> Result<bool, DecodeError> {
        let offset = self.offset;
        match self.read_u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            found => Err(DecodeError::InvalidTag { field, offset, found }),
        }
    }

    fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.take(field, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(field, 8)?);
        Ok(u64::from_le_bytes(buf))
    }

    fn read_pubkey(&mut self, field: &'static str) -> Result<Pubkey, DecodeError> {
        let mut buf = [0u8; PUBKEY_BYTES];
        buf.copy_from_slice(self.take(field, PUBKEY_BYTES)?);
        Ok(Pubkey::new_from_array(buf))
    }

    fn read_option_pubkey(&mut self, field: &'static str) -> Result<Option<Pubkey>, DecodeError> {
        if self.read_bool(field)? {
            Ok(Some(self.read_pubkey(field)?))
        } else {
            Ok(None)
        }
    }

    fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let prefix_offset = self.offset;
        let declared = self.read_u32(field)? as usize;
        if declared > self.remaining() {
            return Err(DecodeError::LengthOverrun {
                field,
                offset: prefix_offset,
                declared,
                available: self.remaining(),
            });
        }
        let start = self.offset;
        let bytes = self.take(field, declared)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8 { field, offset: start })
    }
}

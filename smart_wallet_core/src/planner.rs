use solana_program::pubkey::Pubkey;

use crate::error::CoreError;
use crate::state::SmartWalletAccount;

/// USDC has six decimals.
pub const USDC_DECIMALS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseDecision {
    Skip(SkipReason),
    /// Not even one increment is affordable. `notify` is set when an alert is
    /// due and has not been sent yet.
    InsufficientBalance { balance: u64, required: u64, notify: bool },
    Buy(PurchasePlan),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Inactive,
    NothingToBuy,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Inactive => write!(f, "wallet inactive"),
            SkipReason::NothingToBuy => write!(f, "no candidate tokens"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasePlan {
    pub mints: Vec<Pubkey>,
    pub increment_amount: u64,
    pub remaining_balance: u64,
    /// The run leaves less than one increment and no alert has gone out yet.
    pub notify_low_balance: bool,
}

/// Decide what one wallet should buy this run.
///
/// Buys `min(balance / increment, candidates, max_tokens_per_run)` mints from
/// the front of `candidates`.
pub fn plan_purchase(
    wallet: &SmartWalletAccount,
    usdc_balance: u64,
    candidates: &[Pubkey],
) -> Result<PurchaseDecision, CoreError> {
    if !wallet.is_active {
        return Ok(PurchaseDecision::Skip(SkipReason::Inactive));
    }
    if wallet.increment_amount == 0 {
        return Err(CoreError::InvalidInput("increment_amount must be > 0".to_string()));
    }

    let alert_pending = wallet.email_notifications && !wallet.low_balance_notified;

    if usdc_balance < wallet.increment_amount {
        return Ok(PurchaseDecision::InsufficientBalance {
            balance: usdc_balance,
            required: wallet.increment_amount,
            notify: alert_pending,
        });
    }

    let affordable = usdc_balance / wallet.increment_amount;
    let count = candidates
        .len()
        .min(wallet.max_tokens_per_run as usize)
        .min(usize::try_from(affordable).unwrap_or(usize::MAX));
    if count == 0 {
        return Ok(PurchaseDecision::Skip(SkipReason::NothingToBuy));
    }

    // count <= affordable, so this cannot underflow
    let remaining_balance = usdc_balance - count as u64 * wallet.increment_amount;
    Ok(PurchaseDecision::Buy(PurchasePlan {
        mints: candidates[..count].to_vec(),
        increment_amount: wallet.increment_amount,
        remaining_balance,
        notify_low_balance: remaining_balance < wallet.increment_amount && alert_pending,
    }))
}

/// Base units to a display amount, e.g. 20_000_000 -> 20.0 USDC.
pub fn usdc_ui_amount(base_units: u64) -> f64 {
    base_units as f64 / 10u64.pow(USDC_DECIMALS) as f64
}

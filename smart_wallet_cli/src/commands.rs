use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "smart-wallet")]
#[command(about = "Inspect and build smart wallet accounts and instructions")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum DataEncoding {
    Base64,
    Base58,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode raw smart wallet account data
    DecodeAccount {
        /// Account data, base64 unless --encoding says otherwise
        #[arg(short, long, conflicts_with = "file")]
        data: Option<String>,
        /// Read raw bytes from a file instead
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "base64")]
        encoding: DataEncoding,
    },

    /// Decode captured instruction data
    DecodeInstruction {
        data: String,
        #[arg(short, long, value_enum, default_value = "base64")]
        encoding: DataEncoding,
    },

    /// Encode an instruction payload
    Encode {
        #[command(subcommand)]
        instruction: EncodeCommands,
    },

    /// Build a complete instruction (program id, accounts, data)
    Build {
        #[command(subcommand)]
        instruction: BuildCommands,
    },

    /// Build the ordered account list for PurchaseTokens
    PurchaseAccounts {
        /// Swap instruction JSON from the quote provider
        #[arg(short, long)]
        swap: PathBuf,
        /// Signing authority (owner or external authority)
        #[arg(long)]
        authority: String,
        /// Smart wallet account address
        #[arg(long)]
        wallet: String,
        /// Wallet USDC account; derived from --wallet-authority when omitted
        #[arg(long)]
        wallet_token_account: Option<String>,
        /// Wallet authority PDA, used to derive the USDC account
        #[arg(long)]
        wallet_authority: Option<String>,
        /// Token program override
        #[arg(long)]
        token_program: Option<String>,
    },

    /// Plan a purchase run for captured account data and a USDC balance
    Plan {
        /// Base64 account data
        data: String,
        /// Wallet USDC balance in base units
        #[arg(short, long)]
        balance: u64,
    },

    /// Fetch a smart wallet over RPC and show what a purchase run would do
    Fetch {
        address: String,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum EncodeCommands {
    Initialize {
        #[arg(long)]
        increment_amount: u64,
        #[arg(long)]
        max_tokens_per_run: u8,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        notifications: bool,
    },
    Deposit {
        amount: u64,
    },
    Withdraw {
        amount: u64,
    },
    /// Fields left out are encoded as absent
    UpdateSettings {
        #[arg(long)]
        increment_amount: Option<u64>,
        #[arg(long)]
        max_tokens_per_run: Option<u8>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
    },
    AuthorizeExternal,
    PurchaseTokens {
        /// Target mint; repeat for several
        #[arg(long = "mint", required = true)]
        mints: Vec<String>,
        /// Base64 swap instruction data to relay
        #[arg(long, default_value = "")]
        swap_data: String,
    },
    ResetLowBalance,
    Cancel,
}

/// Program id and USDC mint come from the configuration.
#[derive(Subcommand, Debug, Clone)]
pub enum BuildCommands {
    Initialize {
        /// Pays for the new wallet account
        #[arg(long)]
        funder: String,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        increment_amount: u64,
        #[arg(long)]
        max_tokens_per_run: u8,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        notifications: bool,
    },
    Deposit {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        source_usdc: String,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        wallet_usdc: String,
        amount: u64,
    },
    Withdraw {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        wallet_usdc: String,
        #[arg(long)]
        destination_usdc: String,
        amount: u64,
    },
    UpdateSettings {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        increment_amount: Option<u64>,
        #[arg(long)]
        max_tokens_per_run: Option<u8>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
    },
    AuthorizeExternal {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        new_authority: String,
    },
    PurchaseTokens {
        #[arg(long)]
        authority: String,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        wallet_usdc: String,
        /// Swap instruction JSON from the quote provider
        #[arg(short, long)]
        swap: PathBuf,
        /// Target mint; repeat for several
        #[arg(long = "mint", required = true)]
        mints: Vec<String>,
        #[arg(long)]
        token_program: Option<String>,
    },
    ResetLowBalance {
        #[arg(long)]
        authority: String,
        #[arg(long)]
        wallet: String,
    },
    Cancel {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        wallet_usdc: String,
        #[arg(long)]
        owner_usdc: String,
        /// Receives the reclaimed rent
        #[arg(long)]
        rent_destination: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate the configuration
    Validate,
}

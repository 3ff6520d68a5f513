mod commands;
mod output;

use base64::{engine::general_purpose::STANDARD as Base64Engine, Engine as _};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use commands::{BuildCommands, Cli, Commands, ConfigCommands, DataEncoding, EncodeCommands};
use log::{debug, info};
use serde_json::{json, Value};
use smart_wallet_core::native::NativeRpcClient;
use smart_wallet_core::pda::wallet_usdc_account;
use smart_wallet_core::tx_builder::{
    build_authorize_external_instruction, build_cancel_instruction, build_deposit_instruction,
    build_initialize_instruction, build_purchase_tokens_instruction, build_reset_low_balance_instruction,
    build_update_settings_instruction, build_withdraw_instruction, PurchaseContext, SettingsUpdate,
};
use smart_wallet_core::{
    fetch_smart_wallet, plan_purchase, PurchaseAccountsBuilder, RpcClient, Settings,
    SmartWalletAccount, SmartWalletInstruction, SwapInstruction,
};
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Err(error) = handle_command(cli).await {
        eprintln!("{} {}", "ERROR:".red(), error);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_command(cli: Cli) -> Result<(), String> {
    match &cli.command {
        Commands::DecodeAccount { data, file, encoding } => {
            let raw = match (data, file) {
                (Some(data), _) => decode_text(data, *encoding)?,
                (None, Some(path)) => std::fs::read(path)
                    .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
                (None, None) => return Err("Either --data or --file is required".to_string()),
            };
            let wallet = SmartWalletAccount::unpack(&raw).map_err(|e| e.to_string())?;
            print_json(&output::account_json(&wallet))
        }

        Commands::DecodeInstruction { data, encoding } => {
            let raw = decode_text(data, *encoding)?;
            let ix = SmartWalletInstruction::unpack(&raw).map_err(|e| e.to_string())?;
            print_json(&output::instruction_json(&ix, &raw))
        }

        Commands::Encode { instruction } => {
            let ix = encode_command_to_instruction(instruction)?;
            let data = ix.pack().map_err(|e| e.to_string())?;
            let mut value = output::instruction_json(&ix, &data);
            value["dataBase64"] = Value::String(Base64Engine.encode(&data));
            print_json(&value)
        }

        Commands::Build { instruction } => {
            let settings = load_config(&cli)?;
            let ix = build_instruction(instruction, &settings)?;
            info!("Built instruction with {} accounts", ix.accounts.len());
            print_json(&output::built_instruction_json(&ix))
        }

        Commands::PurchaseAccounts {
            swap,
            authority,
            wallet,
            wallet_token_account,
            wallet_authority,
            token_program,
        } => {
            let settings = load_config(&cli)?;
            let swap = read_swap(swap, &settings)?;

            let wallet_token_account = match (wallet_token_account, wallet_authority) {
                (Some(account), _) => parse_pubkey("wallet-token-account", account)?,
                (None, Some(authority)) => {
                    let mint = settings.usdc_mint_pubkey().map_err(|e| e.to_string())?;
                    wallet_usdc_account(&parse_pubkey("wallet-authority", authority)?, &mint)
                }
                (None, None) => {
                    return Err("Either --wallet-token-account or --wallet-authority is required".to_string())
                }
            };

            let mut builder = PurchaseAccountsBuilder::new()
                .authority(parse_pubkey("authority", authority)?)
                .smart_wallet(parse_pubkey("wallet", wallet)?)
                .wallet_token_account(wallet_token_account)
                .swap(swap);
            if let Some(program) = token_program {
                builder = builder.token_program(parse_pubkey("token-program", program)?);
            }
            let metas = builder.build().map_err(|e| e.to_string())?;
            info!("Built {} purchase accounts", metas.len());
            print_json(&output::account_metas_json(&metas))
        }

        Commands::Plan { data, balance } => {
            let settings = load_config(&cli)?;
            let raw = decode_text(data, DataEncoding::Base64)?;
            let wallet = SmartWalletAccount::unpack(&raw).map_err(|e| e.to_string())?;
            let candidates = settings.candidate_pubkeys().map_err(|e| e.to_string())?;
            let decision = plan_purchase(&wallet, *balance, &candidates).map_err(|e| e.to_string())?;
            print_json(&output::decision_json(&decision))
        }

        Commands::Fetch { address } => handle_fetch(address, &cli).await,

        Commands::Config { command } => handle_config_command(command, &cli),

        Commands::Completion { shell, output: path } => handle_completion_generation(*shell, path.clone()),
    }
}

async fn handle_fetch(address: &str, cli: &Cli) -> Result<(), String> {
    let settings = load_config(cli)?;
    info!("Fetching smart wallet {} from {}", address, settings.rpc_url);
    let client = NativeRpcClient::new(settings.rpc_url.clone());

    let wallet = fetch_smart_wallet(address, &client)
        .await
        .map_err(|e| e.to_string())?;

    let usdc_account = wallet_usdc_account(&wallet.authority_pubkey, &wallet.usdc_token_mint);
    debug!("Wallet USDC account: {}", usdc_account);
    let balance = client
        .get_token_account_balance(&usdc_account.to_string())
        .await
        .map_err(|e| e.to_string())?;

    let candidates = settings.candidate_pubkeys().map_err(|e| e.to_string())?;
    let decision = plan_purchase(&wallet, balance, &candidates).map_err(|e| e.to_string())?;

    print_json(&json!({
        "address": address,
        "account": output::account_json(&wallet),
        "usdcAccount": usdc_account.to_string(),
        "usdcBalance": balance,
        "plan": output::decision_json(&decision),
    }))
}

fn handle_config_command(command: &ConfigCommands, cli: &Cli) -> Result<(), String> {
    match command {
        ConfigCommands::Show => {
            let settings = load_config(cli)?;
            let json = serde_json::to_string_pretty(&settings).map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(())
        }
        ConfigCommands::Validate => {
            if !cli.config.exists() {
                return Err(format!("Configuration file not found: {}", cli.config.display()));
            }
            let settings = Settings::from_file(&cli.config.to_string_lossy()).map_err(|e| e.to_string())?;
            settings.validate().map_err(|e| e.to_string())?;
            println!("{}", "Configuration validation passed".green());
            Ok(())
        }
    }
}

fn handle_completion_generation(shell: clap_complete::Shell, output: Option<PathBuf>) -> Result<(), String> {
    let mut cmd = Cli::command();

    let mut buf = Vec::new();
    generate(shell, &mut cmd, "smart-wallet", &mut buf);

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, buf).map_err(|e| e.to_string())?;
            println!("Completions written to: {}", output_path.display());
        }
        None => {
            print!("{}", String::from_utf8_lossy(&buf));
        }
    }

    Ok(())
}

fn encode_command_to_instruction(command: &EncodeCommands) -> Result<SmartWalletInstruction, String> {
    let ix = match command {
        EncodeCommands::Initialize {
            increment_amount,
            max_tokens_per_run,
            email,
            notifications,
        } => SmartWalletInstruction::Initialize {
            increment_amount: *increment_amount,
            max_tokens_per_run: *max_tokens_per_run,
            email: email.clone(),
            enable_notifications: *notifications,
        },
        EncodeCommands::Deposit { amount } => SmartWalletInstruction::DepositUsdc { amount: *amount },
        EncodeCommands::Withdraw { amount } => SmartWalletInstruction::WithdrawUsdc { amount: *amount },
        EncodeCommands::UpdateSettings {
            increment_amount,
            max_tokens_per_run,
            email,
            notifications,
        } => SmartWalletInstruction::UpdateSettings {
            increment_amount: *increment_amount,
            max_tokens_per_run: *max_tokens_per_run,
            email: email.clone(),
            enable_notifications: *notifications,
        },
        EncodeCommands::AuthorizeExternal => SmartWalletInstruction::AuthorizeExternal,
        EncodeCommands::PurchaseTokens { mints, swap_data } => {
            let token_mints = mints
                .iter()
                .map(|m| parse_pubkey("mint", m))
                .collect::<Result<Vec<_>, _>>()?;
            SmartWalletInstruction::PurchaseTokens {
                token_mints,
                jupiter_swap_ix_data: decode_text(swap_data, DataEncoding::Base64)?,
            }
        }
        EncodeCommands::ResetLowBalance => SmartWalletInstruction::ResetLowBalanceFlag,
        EncodeCommands::Cancel => SmartWalletInstruction::CancelSmartWallet,
    };
    Ok(ix)
}

fn build_instruction(command: &BuildCommands, settings: &Settings) -> Result<Instruction, String> {
    let program_id = settings.program_pubkey().map_err(|e| e.to_string())?;
    let ix = match command {
        BuildCommands::Initialize {
            funder,
            wallet,
            increment_amount,
            max_tokens_per_run,
            email,
            notifications,
        } => build_initialize_instruction(
            &program_id,
            &parse_pubkey("funder", funder)?,
            &parse_pubkey("wallet", wallet)?,
            &settings.usdc_mint_pubkey().map_err(|e| e.to_string())?,
            *increment_amount,
            *max_tokens_per_run,
            email.clone(),
            *notifications,
        ),
        BuildCommands::Deposit { owner, source_usdc, wallet, wallet_usdc, amount } => build_deposit_instruction(
            &program_id,
            &parse_pubkey("owner", owner)?,
            &parse_pubkey("source-usdc", source_usdc)?,
            &parse_pubkey("wallet-usdc", wallet_usdc)?,
            &parse_pubkey("wallet", wallet)?,
            *amount,
        ),
        BuildCommands::Withdraw { owner, wallet, wallet_usdc, destination_usdc, amount } => {
            build_withdraw_instruction(
                &program_id,
                &parse_pubkey("owner", owner)?,
                &parse_pubkey("wallet", wallet)?,
                &parse_pubkey("wallet-usdc", wallet_usdc)?,
                &parse_pubkey("destination-usdc", destination_usdc)?,
                *amount,
            )
        }
        BuildCommands::UpdateSettings {
            owner,
            wallet,
            increment_amount,
            max_tokens_per_run,
            email,
            notifications,
        } => build_update_settings_instruction(
            &program_id,
            &parse_pubkey("owner", owner)?,
            &parse_pubkey("wallet", wallet)?,
            SettingsUpdate {
                increment_amount: *increment_amount,
                max_tokens_per_run: *max_tokens_per_run,
                email: email.clone(),
                enable_notifications: *notifications,
            },
        ),
        BuildCommands::AuthorizeExternal { owner, wallet, new_authority } => build_authorize_external_instruction(
            &program_id,
            &parse_pubkey("owner", owner)?,
            &parse_pubkey("wallet", wallet)?,
            &parse_pubkey("new-authority", new_authority)?,
        ),
        BuildCommands::PurchaseTokens { authority, wallet, wallet_usdc, swap, mints, token_program } => {
            let swap = read_swap(swap, settings)?;
            let token_mints = mints
                .iter()
                .map(|m| parse_pubkey("mint", m))
                .collect::<Result<Vec<_>, _>>()?;
            let token_program = match token_program {
                Some(program) => parse_pubkey("token-program", program)?,
                None => spl_token::ID,
            };
            let ctx = PurchaseContext {
                authority: parse_pubkey("authority", authority)?,
                smart_wallet: parse_pubkey("wallet", wallet)?,
                wallet_token_account: parse_pubkey("wallet-usdc", wallet_usdc)?,
                token_program,
            };
            build_purchase_tokens_instruction(&program_id, &ctx, token_mints, swap)
        }
        BuildCommands::ResetLowBalance { authority, wallet } => build_reset_low_balance_instruction(
            &program_id,
            &parse_pubkey("authority", authority)?,
            &parse_pubkey("wallet", wallet)?,
        ),
        BuildCommands::Cancel { owner, wallet, wallet_usdc, owner_usdc, rent_destination } => build_cancel_instruction(
            &program_id,
            &parse_pubkey("owner", owner)?,
            &parse_pubkey("wallet", wallet)?,
            &parse_pubkey("wallet-usdc", wallet_usdc)?,
            &parse_pubkey("owner-usdc", owner_usdc)?,
            &parse_pubkey("rent-destination", rent_destination)?,
        ),
    };
    ix.map_err(|e| e.to_string())
}

/// Load a quoted swap and check it targets the configured swap program.
fn read_swap(path: &Path, settings: &Settings) -> Result<SwapInstruction, String> {
    let swap_json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let swap = SwapInstruction::from_json(&swap_json).map_err(|e| e.to_string())?;
    let expected = settings.swap_program_pubkey().map_err(|e| e.to_string())?;
    swap.ensure_program(&expected).map_err(|e| e.to_string())?;
    Ok(swap)
}

fn load_config(cli: &Cli) -> Result<Settings, String> {
    let path = cli.config.to_string_lossy();
    debug!("Loading config from: {}", path);
    let settings = Settings::load(Some(path.as_ref())).map_err(|e| e.to_string())?;
    Ok(settings)
}

fn decode_text(data: &str, encoding: DataEncoding) -> Result<Vec<u8>, String> {
    let data = data.trim();
    match encoding {
        DataEncoding::Base64 => Base64Engine
            .decode(data)
            .map_err(|e| format!("Invalid base64 input: {}", e)),
        DataEncoding::Base58 => bs58::decode(data)
            .into_vec()
            .map_err(|e| format!("Invalid base58 input: {}", e)),
    }
}

fn parse_pubkey(arg: &str, value: &str) -> Result<Pubkey, String> {
    Pubkey::from_str(value.trim()).map_err(|e| format!("--{} {:?} is not a valid address: {}", arg, value, e))
}

fn print_json(value: &Value) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

use std::{fs, path::PathBuf, str::FromStr};

use alloy_primitives::{Address, FixedBytes, U256};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use vault_router_encoder::{
    calldata::{execute_calldata, execute_with_operator_permits_calldata, initialize_calldata},
    signer::{address_of, sign_operator_permit, sign_token_permit, SigningKey},
};
use vault_router_types::eip712::domain_separator;

mod batch_file;
mod logging;

use batch_file::{BatchFile, OperatorPermitSpec, PermitSpec};

/// Build vault-router calldata and sign the permits that go into it.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log filter (`info`, `debug`, or a full `EnvFilter` directive).
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a JSON batch file into `execute` / `executeWithOperatorPermits` calldata.
    Encode {
        /// Batch description (see `batch_file.rs` for the format).
        #[arg(long)]
        batch: PathBuf,

        /// Write the 0x-hex calldata here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Encode `initialize(swapAggregator)` calldata.
    Initialize {
        #[arg(long, env = "SWAP_AGGREGATOR")]
        swap_aggregator: Address,
    },

    /// Sign an ERC-2612 permit letting the router pull tokens.
    SignPermit {
        #[arg(long)]
        token: Address,

        /// Spender, normally the router.
        #[arg(long, env = "ROUTER_ADDRESS")]
        spender: Address,

        #[arg(long)]
        value: U256,

        /// Current `nonces(owner)` on the token.
        #[arg(long, default_value = "0")]
        nonce: U256,

        #[arg(long)]
        deadline: U256,

        #[command(flatten)]
        domain: DomainArgs,

        #[command(flatten)]
        signer: SignerArgs,
    },

    /// Sign an operator permit granting (or revoking) the router on a vault manager.
    SignOperatorPermit {
        #[arg(long)]
        module: Address,

        #[arg(long, env = "ROUTER_ADDRESS")]
        router: Address,

        /// Pass `--approved false` to revoke.
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        approved: bool,

        /// Current operator nonce of the owner on the module.
        #[arg(long, default_value = "0")]
        nonce: U256,

        #[arg(long)]
        deadline: U256,

        #[command(flatten)]
        domain: DomainArgs,

        #[command(flatten)]
        signer: SignerArgs,
    },
}

/// EIP-712 domain of the contract that verifies the signature.
#[derive(Args, Debug)]
struct DomainArgs {
    #[arg(long)]
    domain_name: String,

    #[arg(long, default_value = "1")]
    domain_version: String,

    #[arg(long, env = "CHAIN_ID")]
    chain_id: u64,
}

#[derive(Args, Debug)]
struct SignerArgs {
    /// Signer private key (hex string, 0x...).
    #[arg(long, env = "SIGNER_KEY")]
    signer_key: String,
}

impl SignerArgs {
    fn key(&self) -> Result<SigningKey> {
        let raw = FixedBytes::<32>::from_str(self.signer_key.trim())
            .context("signer key must be 32 bytes of hex")?;
        SigningKey::from_slice(raw.as_slice()).map_err(|e| anyhow!("invalid signer key: {e}"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level, cli.log_json);

    match cli.command {
        Command::Encode { batch, out } => encode(batch, out),
        Command::Initialize { swap_aggregator } => {
            println!("0x{}", hex::encode(initialize_calldata(swap_aggregator)));
            Ok(())
        }
        Command::SignPermit {
            token,
            spender,
            value,
            nonce,
            deadline,
            domain,
            signer,
        } => {
            let key = signer.key()?;
            let separator =
                domain_separator(&domain.domain_name, &domain.domain_version, domain.chain_id, token);
            let permit = sign_token_permit(&key, separator, token, spender, value, nonce, deadline)
                .map_err(|e| anyhow!("signing failed: {e}"))?;
            info!(owner = %permit.owner, %token, %spender, "signed token permit");
            print_json(&PermitSpec::from(&permit))
        }
        Command::SignOperatorPermit {
            module,
            router,
            approved,
            nonce,
            deadline,
            domain,
            signer,
        } => {
            let key = signer.key()?;
            let separator = domain_separator(
                &domain.domain_name,
                &domain.domain_version,
                domain.chain_id,
                module,
            );
            let permit =
                sign_operator_permit(&key, separator, module, router, approved, nonce, deadline)
                    .map_err(|e| anyhow!("signing failed: {e}"))?;
            info!(owner = %address_of(&key), %module, approved, "signed operator permit");
            print_json(&OperatorPermitSpec::from(&permit))
        }
    }
}

fn encode(path: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let file = BatchFile::load(&path)?;
    let batch = file.batch();
    let operator_permits = file.operator_permits();

    let calldata = if operator_permits.is_empty() {
        execute_calldata(&batch)
    } else {
        execute_with_operator_permits_calldata(&operator_permits, &batch)
    };
    info!(
        operator_permits = operator_permits.len(),
        permits = batch.permits.len(),
        transfers = batch.transfers.len(),
        swaps = batch.swaps.len(),
        module_calls = batch.module_calls.len(),
        bytes = calldata.len(),
        "encoded batch"
    );

    let encoded = format!("0x{}", hex::encode(&calldata));
    match out {
        Some(out) => {
            fs::write(&out, format!("{encoded}\n"))
                .with_context(|| format!("failed writing {}", out.display()))?;
            debug!(path = %out.display(), "wrote calldata");
        }
        None => println!("{encoded}"),
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serialising output")?;
    println!("{rendered}");
    Ok(())
}

//! NameDapp CLI - interactive client for the NameDapp name registry.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use namedapp::config::{DappConfig, RefreshPolicy, load_config};
use namedapp::controller::{ChannelNotifier, ControllerSettings, NameDappController};
use namedapp::wallet;
use namedapp_cli::Console;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

/// Cache behaviour after a confirmed mutation.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RefreshArg {
    /// Refetch only on request
    Manual,
    /// Refetch as soon as a mutation is confirmed
    AfterMutation,
}

impl From<RefreshArg> for RefreshPolicy {
    fn from(arg: RefreshArg) -> Self {
        match arg {
            RefreshArg::Manual => Self::Manual,
            RefreshArg::AfterMutation => Self::AfterMutation,
        }
    }
}

/// NameDapp CLI - read and edit the on-chain name list
#[derive(Parser, Debug)]
#[command(name = "namedapp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (default: <config dir>/namedapp/config.json)
    #[arg(short, long, env = "NAMEDAPP_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint
    #[arg(long, env = "NAMEDAPP_RPC_URL")]
    rpc_url: Option<String>,

    /// Hex private key for the local wallet
    #[arg(long, env = "NAMEDAPP_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// BIP39 mnemonic for the local wallet
    #[arg(long, env = "NAMEDAPP_MNEMONIC", hide_env_values = true)]
    mnemonic: Option<String>,

    /// Cache refresh policy after add/remove
    #[arg(long, value_enum)]
    refresh: Option<RefreshArg>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Apply command-line overrides on top of the file configuration.
    fn apply(&self, config: &mut DappConfig) {
        if let Some(url) = &self.rpc_url {
            config.rpc_url = Some(url.clone());
        }
        if let Some(key) = &self.private_key {
            config.wallet.private_key = Some(key.clone());
        }
        if let Some(mnemonic) = &self.mnemonic {
            config.wallet.mnemonic = Some(mnemonic.clone());
        }
        if let Some(refresh) = self.refresh {
            config.refresh = refresh.into();
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "namedapp={level},namedapp_cli={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())
        .await
        .context("failed to load config")?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let bridge = wallet::discover(&config)
        .await
        .context("failed to set up wallet")?;
    if bridge.is_none() {
        info!("no wallet key material configured");
    }

    let (notifier, notices) = ChannelNotifier::new();
    let controller = NameDappController::builder()
        .maybe_wallet(bridge)
        .notifier(Arc::new(notifier))
        .settings(ControllerSettings::from(&config))
        .build();

    Console::new(Arc::new(controller), notices).run().await?;
    println!("Bye.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "namedapp",
            "--rpc-url",
            "http://127.0.0.1:8545",
            "--refresh",
            "after-mutation",
            "-vv",
        ]);
        let mut config = DappConfig::default();
        args.apply(&mut config);

        assert_eq!(config.rpc_url.as_deref(), Some("http://127.0.0.1:8545"));
        assert_eq!(config.refresh, RefreshPolicy::AfterMutation);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_args_keep_file_values() {
        let args = Args::parse_from(["namedapp"]);
        let mut config = DappConfig {
            rpc_url: Some("http://file".into()),
            ..DappConfig::default()
        };
        args.apply(&mut config);
        assert_eq!(config.rpc_url.as_deref(), Some("http://file"));
    }
}

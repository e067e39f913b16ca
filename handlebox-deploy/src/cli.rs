use clap::{Parser, Subcommand};

use handlebox_types::constants::DEFAULT_DEPOSIT_AMOUNT;
use handlebox_types::primitives::{Amount, AppId};

use crate::commands;
use crate::config::DeployConfig;
use crate::error::DeployError;

#[derive(Parser)]
#[command(
    name = "handlebox",
    about = "Deploy the handlebox application and store a GitHub handle against a deposit",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "handlebox.toml")]
    pub config: String,
    /// Override the node RPC URL from the config file
    #[arg(long)]
    pub node_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new deployment configuration file
    Init {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        dir: String,
    },
    /// Generate a new operator mnemonic and address
    Keygen,
    /// Write the approval and clear-state program artifact files
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: String,
    },
    /// Compile the artifacts on the node and create the application
    Deploy {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Submit a grouped deposit that stores a GitHub handle
    Deposit {
        /// Target application id
        #[arg(long)]
        app_id: AppId,
        /// GitHub handle to store
        #[arg(long)]
        handle: String,
        /// Deposit amount in microunits
        #[arg(long, default_value_t = DEFAULT_DEPOSIT_AMOUNT)]
        amount: Amount,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Read the stored handle back from the github box
    Show {
        /// Target application id
        #[arg(long)]
        app_id: AppId,
    },
}

pub async fn run(cli: Cli) -> Result<(), DeployError> {
    let mut config = DeployConfig::load_or_default(&cli.config)?;
    if let Some(url) = cli.node_url {
        config.node_url = url;
    }

    match cli.command {
        Command::Init { dir } => {
            let path = std::path::Path::new(&dir).join("handlebox.toml");
            DeployConfig::default().save(&path.display().to_string())?;
            crate::format::print_success(&format!("Wrote {}", path.display()));
            Ok(())
        }
        Command::Keygen => commands::keygen::run(),
        Command::Export { out } => commands::export::run(&out),
        Command::Deploy { yes } => commands::deploy::run(&config, yes).await,
        Command::Deposit {
            app_id,
            handle,
            amount,
            yes,
        } => commands::deposit::run(&config, app_id, &handle, amount, yes).await,
        Command::Show { app_id } => commands::show::run(&config, app_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_defaults() {
        let cli = Cli::try_parse_from([
            "handlebox",
            "deposit",
            "--app-id",
            "7",
            "--handle",
            "@alice",
        ])
        .unwrap();
        match cli.command {
            Command::Deposit {
                app_id,
                handle,
                amount,
                yes,
            } => {
                assert_eq!(app_id, 7);
                assert_eq!(handle, "@alice");
                assert_eq!(amount, DEFAULT_DEPOSIT_AMOUNT);
                assert!(!yes);
            }
            _ => panic!("expected deposit command"),
        }
    }

    #[test]
    fn test_node_url_override_flag() {
        let cli = Cli::try_parse_from([
            "handlebox",
            "--node-url",
            "http://10.0.0.2:9741",
            "show",
            "--app-id",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.node_url.as_deref(), Some("http://10.0.0.2:9741"));
    }

    #[test]
    fn test_deposit_requires_handle() {
        assert!(Cli::try_parse_from(["handlebox", "deposit", "--app-id", "7"]).is_err());
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopkeep_core::IdPolicy;
use shopkeep_db::{Database, DbConfig};

use crate::config::AppConfig;
use crate::error::CliError;
use crate::output::Output;

mod item;
mod sales;
mod sell;

#[derive(Debug, Parser)]
#[command(name = "shopkeep", about = "Shopkeep store CLI", long_about = None)]
pub(crate) struct Cli {
    /// Database file (default: store.db in the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// What deleting an item does to the other ids: renumber or stable
    #[arg(long, global = true)]
    id_policy: Option<IdPolicy>,

    /// Currency symbol printed before amounts
    #[arg(long, global = true)]
    currency: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage catalog items
    Item(item::ItemCommand),
    /// Sell items in a single checkout
    Sell(sell::SellArgs),
    /// Browse and report on recorded sales
    Sales(sales::SalesCommand),
}

impl Cli {
    pub(crate) fn json(&self) -> bool {
        self.json
    }

    pub(crate) async fn run(self) -> Result<(), CliError> {
        let config =
            AppConfig::from_env()?.with_overrides(self.db, self.id_policy, self.currency);
        let path = config.database_path()?;
        tracing::debug!(path = %path.display(), policy = ?config.id_policy, "Opening store");

        let db = Database::new(DbConfig::new(path).id_policy(config.id_policy)).await?;
        let out = Output::new(self.json, config);

        let result = match self.command {
            Commands::Item(command) => item::run(command, &db, &out).await,
            Commands::Sell(args) => sell::run(args, &db, &out).await,
            Commands::Sales(command) => sales::run(command, &db, &out).await,
        };

        db.close().await;
        result
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shopkeep",
            "item",
            "list",
            "--json",
            "--id-policy",
            "stable",
        ])
        .unwrap();

        assert!(cli.json());
        assert_eq!(cli.id_policy, Some(IdPolicy::Stable));
    }

    #[test]
    fn test_unknown_policy_is_a_usage_error() {
        assert!(Cli::try_parse_from(["shopkeep", "--id-policy", "shuffle", "item", "list"]).is_err());
    }

    #[test]
    fn test_sell_requires_a_line() {
        assert!(Cli::try_parse_from(["shopkeep", "sell", "--pay", "10"]).is_err());
        assert!(Cli::try_parse_from(["shopkeep", "sell", "--line", "1:2", "--pay", "10"]).is_ok());
    }
}

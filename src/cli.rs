use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "partsbin", version, about = "Terminal inventory and BOM manager")]
pub struct Args {
    /// Store file (defaults to the configured store path)
    #[arg(short, long, conflicts_with = "memory")]
    pub data: Option<PathBuf>,

    /// Use an in-memory store seeded with demo data
    #[arg(long)]
    pub memory: bool,

    /// Username to prefill in the login popup
    #[arg(short, long)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Create or replace a user in the store, then exit
    AddUser {
        name: String,

        #[arg(short, long)]
        password: String,

        /// Grant write permission
        #[arg(short, long)]
        write: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_add_user() {
        let args = Args::parse_from(["partsbin", "--data", "inv.json", "add-user", "bob", "-p", "pw", "--write"]);
        assert_eq!(args.data, Some(PathBuf::from("inv.json")));
        match args.command {
            Some(CliCommand::AddUser {
                name,
                password,
                write,
            }) => {
                assert_eq!(name, "bob");
                assert_eq!(password, "pw");
                assert!(write);
            }
            None => panic!("expected add-user"),
        }
    }

    #[test]
    fn test_memory_conflicts_with_data() {
        assert!(Args::try_parse_from(["partsbin", "--memory", "--data", "x.json"]).is_err());
    }
}

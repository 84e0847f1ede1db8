use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "vehicle-hire")]
#[command(about = "Run a vehicle hire scenario against an in-memory fleet")]
pub struct CliConfig {
    /// Path to the TOML scenario file
    #[arg(short, long, default_value = "fleet.toml")]
    pub config: PathBuf,

    /// Date used for age checks (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Validate the scenario and print a summary without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let config =
            CliConfig::parse_from(["vehicle-hire", "-c", "demo.toml", "--today", "2024-05-01", "--json"]);

        assert_eq!(config.config, PathBuf::from("demo.toml"));
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(config.json);
        assert!(!config.dry_run);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(CliConfig::try_parse_from(["vehicle-hire", "--today", "01/05/2024"]).is_err());
    }
}

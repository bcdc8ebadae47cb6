use std::path::PathBuf;

use clap::{ArgAction, Parser};
use pdf2db::config::DEFAULT_INTERSECTION_TOLERANCE;
use pdf2db::{Config, DatabaseConfig, PageSelection};

/// Extract ruled tables from a PDF and load each one into its own MySQL table.
///
/// Flags accept both `--snake_case` and `--kebab-case` spellings.
#[derive(Debug, Parser)]
#[command(name = "pdf2db", about, version)]
pub struct Cli {
    /// File name (path) of the PDF with tables to be extracted
    #[arg(long = "filename", visible_alias = "file", value_name = "FILE")]
    pub filename: Option<PathBuf>,

    /// When combining edges into cells, orthogonal edges must be within this
    /// many points to be considered intersecting
    #[arg(
        long = "intersection_tolerance",
        alias = "intersection-tolerance",
        default_value_t = DEFAULT_INTERSECTION_TOLERANCE
    )]
    pub intersection_tolerance: u32,

    /// MySQL host address
    #[arg(long = "mysql_host", alias = "mysql-host", default_value = "localhost")]
    pub mysql_host: String,

    /// MySQL port
    #[arg(long = "mysql_port", alias = "mysql-port", default_value_t = 3306)]
    pub mysql_port: u16,

    /// MySQL username
    #[arg(long = "mysql_user", alias = "mysql-user", default_value = "root")]
    pub mysql_user: String,

    /// MySQL password
    #[arg(
        long = "mysql_password",
        alias = "mysql-password",
        env = "MYSQL_PWD",
        hide_env_values = true,
        default_value = ""
    )]
    pub mysql_password: String,

    /// MySQL database name
    #[arg(
        long = "mysql_database",
        alias = "mysql-database",
        default_value = "pdf_tables"
    )]
    pub mysql_database: String,

    /// Page range (e.g. '1,3-5'). Default: all pages
    #[arg(long)]
    pub pages: Option<PageSelection>,

    /// Extract and normalize only; do not connect to MySQL
    #[arg(long, conflicts_with = "require_db")]
    pub dry_run: bool,

    /// Fail instead of continuing when MySQL is unreachable
    #[arg(long)]
    pub require_db: bool,

    /// Write the raw detected tables as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub raw_json: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Build the run configuration. An absent `--filename` becomes an empty path.
    pub fn to_config(&self) -> Config {
        Config {
            file: self.filename.clone().unwrap_or_default(),
            intersection_tolerance: self.intersection_tolerance,
            pages: self.pages.clone(),
            database: DatabaseConfig {
                host: self.mysql_host.clone(),
                port: self.mysql_port,
                user: self.mysql_user.clone(),
                password: self.mysql_password.clone(),
                database: self.mysql_database.clone(),
            },
        }
    }
}

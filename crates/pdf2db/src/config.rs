//! Run configuration.

use std::path::PathBuf;

use crate::pages::PageSelection;

/// Default slack, in points, for two ruling lines to form a cell corner.
pub const DEFAULT_INTERSECTION_TOLERANCE: u32 = 10;

/// Connection parameters for the MySQL server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "pdf_tables".to_string(),
        }
    }
}

/// Everything one run needs. Built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source PDF. An empty path is accepted here and fails at extraction.
    pub file: PathBuf,
    /// Intersection tolerance in points.
    pub intersection_tolerance: u32,
    /// Pages to scan; `None` scans the whole document.
    pub pages: Option<PageSelection>,
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            intersection_tolerance: DEFAULT_INTERSECTION_TOLERANCE,
            pages: None,
            database: DatabaseConfig::default(),
        }
    }
}

//! pdf2db: Load ruled tables from PDF documents into MySQL.
//!
//! Table detection is delegated to [`pdfplumber`] using the line-based
//! (lattice) strategy. Each detected table is cleaned by the [`normalize`]
//! module and persisted through a [`TableSink`], normally a [`MySqlGateway`].
//!
//! # Architecture
//!
//! - [`ruling`]: ruling lines and rects replayed from content streams
//! - [`extract`]: PDF pages → [`RawTable`]s
//! - [`normalize`]: [`RawTable`] → [`NormalizedTable`]
//! - [`gateway`]: table creation and row insertion
//! - [`pipeline`]: wires the three together for one input file

pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod model;
pub mod normalize;
pub mod pages;
pub mod pipeline;
pub mod ruling;

pub use config::{Config, DatabaseConfig};
pub use error::{ExtractError, GatewayError};
pub use extract::{extract_tables, lattice_settings};
pub use gateway::{InsertReport, MySqlGateway, TableSink};
pub use model::{CellValue, NormalizedTable, RawTable};
pub use normalize::normalize;
pub use pages::PageSelection;
pub use pipeline::{RunReport, TableOutcome, TableStatus, load_tables, run, table_name};

//! Persistence of normalized tables.
//!
//! [`TableSink`] is the seam the pipeline writes through. [`MySqlGateway`]
//! is the MySQL implementation: one `TEXT` column per table column plus a
//! surrogate `id` key, rows inserted one statement at a time inside a single
//! transaction per table.

use std::fmt;

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Statement, Transaction, TxOpts, Value};
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::error::GatewayError;
use crate::model::CellValue;

/// Character set and collation used for connections and created tables.
pub const CHARSET: &str = "utf8mb4";
pub const COLLATION: &str = "utf8mb4_unicode_ci";

/// Counts from one [`TableSink::insert_rows`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertReport {
    pub inserted: usize,
    pub failed: usize,
}

/// Destination for normalized tables.
pub trait TableSink {
    /// Create `table` with the given columns unless it already exists.
    fn create_table_if_absent(&mut self, table: &str, columns: &[String])
    -> Result<(), GatewayError>;

    /// Append `rows` to `table`.
    ///
    /// A rejected row is counted in [`InsertReport::failed`] and the
    /// remaining rows are still attempted. An `Err` means the batch as a
    /// whole could not be started or committed.
    fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<CellValue>],
    ) -> Result<InsertReport, GatewayError>;
}

/// Quote a MySQL identifier, doubling any embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `CREATE TABLE IF NOT EXISTS` statement for a table of text columns.
pub fn create_table_sql(table: &str, columns: &[String]) -> String {
    let mut defs = vec!["`id` INT AUTO_INCREMENT PRIMARY KEY".to_string()];
    defs.extend(columns.iter().map(|c| format!("{} TEXT", quote_identifier(c))));
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({}) CHARACTER SET {CHARSET} COLLATE {COLLATION}",
        quote_identifier(table),
        defs.join(", "),
    )
}

/// Parameterized single-row `INSERT` statement.
pub fn insert_sql(table: &str, columns: &[String]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
    let placeholders = vec!["?"; columns.len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        names.join(", "),
        placeholders.join(", "),
    )
}

fn to_sql_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::NULL,
        CellValue::Text(s) => Value::from(s.as_str()),
        CellValue::Integer(n) => Value::Int(*n),
        CellValue::Float(x) => Value::Double(*x),
    }
}

/// An open insert batch for one table.
trait RowBatch {
    fn exec_row(&mut self, params: Vec<Value>) -> mysql::Result<()>;
    fn commit(self) -> mysql::Result<()>;
}

/// A prepared single-row `INSERT` inside a transaction.
struct PreparedInsert<'c> {
    tx: Transaction<'c>,
    stmt: Statement,
}

impl RowBatch for PreparedInsert<'_> {
    fn exec_row(&mut self, params: Vec<Value>) -> mysql::Result<()> {
        self.tx.exec_drop(&self.stmt, params)
    }

    fn commit(self) -> mysql::Result<()> {
        self.tx.commit()
    }
}

/// Execute every row, then commit once.
///
/// A row the server rejects is logged and counted; the rows after it are
/// still executed and committed with the rest.
fn write_rows<B: RowBatch>(
    mut batch: B,
    table: &str,
    rows: &[Vec<CellValue>],
) -> mysql::Result<InsertReport> {
    let mut report = InsertReport::default();
    for (idx, row) in rows.iter().enumerate() {
        let params: Vec<Value> = row.iter().map(to_sql_value).collect();
        match batch.exec_row(params) {
            Ok(()) => report.inserted += 1,
            Err(e) => {
                report.failed += 1;
                let err = GatewayError::Insert {
                    table: table.to_string(),
                    row: idx + 1,
                    message: e.to_string(),
                };
                warn!("{err}");
            }
        }
    }
    batch.commit()?;
    Ok(report)
}

/// A live MySQL connection. Closed when dropped.
pub struct MySqlGateway {
    conn: Conn,
}

impl fmt::Debug for MySqlGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlGateway")
            .field("connection_id", &self.conn.connection_id())
            .finish()
    }
}

impl MySqlGateway {
    /// Connect with the `utf8mb4` character set and `utf8mb4_unicode_ci`
    /// collation.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Connect`] on authentication, network, or
    /// unknown-database failures.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, GatewayError> {
        let password = (!config.password.is_empty()).then_some(config.password.as_str());
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.as_str()))
            .tcp_port(config.port)
            .user(Some(config.user.as_str()))
            .pass(password)
            .db_name(Some(config.database.as_str()))
            .init(vec![format!("SET NAMES {CHARSET} COLLATE {COLLATION}")]);

        let conn = Conn::new(opts).inspect_err(|e| {
            error!(host = %config.host, database = %config.database, error = %e, "error connecting to MySQL");
        })?;

        info!(
            host = %config.host,
            database = %config.database,
            "connected to MySQL"
        );
        Ok(Self { conn })
    }
}

impl TableSink for MySqlGateway {
    fn create_table_if_absent(
        &mut self,
        table: &str,
        columns: &[String],
    ) -> Result<(), GatewayError> {
        let sql = create_table_sql(table, columns);
        match self.conn.query_drop(&sql) {
            Ok(()) => {
                info!(table, "table created or already exists");
                Ok(())
            }
            Err(e) => {
                error!(table, error = %e, "error creating table");
                Err(GatewayError::CreateTable {
                    table: table.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<CellValue>],
    ) -> Result<InsertReport, GatewayError> {
        let tx_error = |e: mysql::Error| {
            error!(table, error = %e, "error inserting data");
            GatewayError::Transaction {
                table: table.to_string(),
                message: e.to_string(),
            }
        };

        let mut tx = self
            .conn
            .start_transaction(TxOpts::default())
            .map_err(tx_error)?;
        let stmt = tx.prep(insert_sql(table, columns)).map_err(tx_error)?;
        let report = write_rows(PreparedInsert { tx, stmt }, table, rows).map_err(tx_error)?;

        info!(table, rows = report.inserted, failed = report.failed, "inserted rows");
        Ok(report)
    }
}

use crate::config;
use crate::core::{PipelineError, Record, Result, Sink};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends canonical batches to the yearly `autosleep_<year>` table.
///
/// The connection is opened lazily on the first write and lives for one
/// pipeline run; it is closed on `close()` or when the sink is dropped, on
/// every exit path. A duplicate `date` surfaces as a primary-key constraint
/// violation: re-running over the same export fails on the second run
/// unless the table is cleared first. Concurrent runs against the same
/// database file are unsupported.
pub struct SqliteSink {
    db_path: PathBuf,
    table: String,
    // Mutex only to satisfy the `Sink: Sync` bound; all access is `&mut self`.
    conn: Option<Mutex<Connection>>,
}

impl SqliteSink {
    pub fn new<P: AsRef<Path>>(db_path: P, year: i32) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            table: config::table_name(year),
            conn: None,
        }
    }

    fn ensure_conn(&mut self) -> Result<()> {
        if self.conn.is_none() {
            let conn = Connection::open(&self.db_path)?;
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {} (
                        date DATE PRIMARY KEY,
                        wakeup_time TIME,
                        hours_slept TIME,
                        quality_sleep_time TIME,
                        deep_sleep_time TIME,
                        sleep_efficiency VARCHAR(5),
                        oxygen_saturation_average VARCHAR(5)
                    )",
                    self.table
                ),
                [],
            )?;
            self.conn = Some(Mutex::new(conn));
        }
        Ok(())
    }
}

#[async_trait]
impl Sink for SqliteSink {
    async fn write(&mut self, record: Record) -> Result<()> {
        self.ensure_conn()?;

        let values: Vec<String> = config::CANONICAL_COLUMNS
            .iter()
            .map(|column| record.require_str(column).map(str::to_string))
            .collect::<Result<_>>()?;

        if let Some(ref mut conn) = self.conn {
            let conn = conn.get_mut().expect("connection mutex poisoned");
            conn.execute(
                &format!(
                    "INSERT INTO {} (date, wakeup_time, hours_slept, quality_sleep_time,
                        deep_sleep_time, sleep_efficiency, oxygen_saturation_average)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    self.table
                ),
                rusqlite::params_from_iter(values),
            )?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            let conn = conn.into_inner().expect("connection mutex poisoned");
            conn.close()
                .map_err(|(_, err)| PipelineError::Store(err))?;
        }
        Ok(())
    }
}

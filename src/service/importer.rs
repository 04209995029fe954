//! One-shot bootstrap: create `passengers`, clear it, bulk-load the CSV.
//!
//! Each step runs once. Only a schema failure stops the run early; truncate
//! and load failures are logged and the run carries on to cleanup. The
//! connection is closed on every path.

use std::future::Future;

use tracing::{error, info, warn};

use crate::config::{IMPORTER_DB_HOST, IMPORTER_DB_USER, ImporterConfig};
use crate::db::ImportSession;
use crate::error::HubError;

const LOAD_HINTS: [&str; 2] = [
    "the CSV path must match the file's location inside the MySQL server's secure-file directory (/var/lib/mysql-files/)",
    "the MySQL account (root) must hold the FILE privilege",
];

/// Statements the importer issues, in order.
pub trait ImportTarget {
    fn ensure_schema(&mut self) -> impl Future<Output = Result<(), HubError>>;
    fn truncate(&mut self) -> impl Future<Output = Result<(), HubError>>;
    fn bulk_load(&mut self, csv_path: &str) -> impl Future<Output = Result<u64, HubError>>;
    fn count(&mut self) -> impl Future<Output = Result<i64, HubError>>;
    fn close(self) -> impl Future<Output = Result<(), HubError>>;
}

impl ImportTarget for ImportSession {
    async fn ensure_schema(&mut self) -> Result<(), HubError> {
        ImportSession::ensure_schema(self).await
    }

    async fn truncate(&mut self) -> Result<(), HubError> {
        ImportSession::truncate(self).await
    }

    async fn bulk_load(&mut self, csv_path: &str) -> Result<u64, HubError> {
        ImportSession::bulk_load(self, csv_path).await
    }

    async fn count(&mut self) -> Result<i64, HubError> {
        ImportSession::count(self).await
    }

    async fn close(self) -> Result<(), HubError> {
        ImportSession::close(self).await
    }
}

#[derive(Debug)]
pub enum ImportOutcome {
    /// `inserted` is what the server reported for the load; `total` is the
    /// table count afterwards.
    Loaded { inserted: u64, total: i64 },
    ConnectFailed(HubError),
    SchemaFailed(HubError),
    LoadFailed(HubError),
}

#[derive(Debug)]
pub struct ImportReport {
    pub outcome: ImportOutcome,
    /// Set when the clear step failed and stale rows may remain.
    pub truncate_error: Option<HubError>,
}

impl ImportReport {
    fn stopped(outcome: ImportOutcome) -> Self {
        Self {
            outcome,
            truncate_error: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.outcome, ImportOutcome::Loaded { .. })
    }

    pub fn total_rows(&self) -> Option<i64> {
        match self.outcome {
            ImportOutcome::Loaded { total, .. } => Some(total),
            _ => None,
        }
    }
}

/// Connect as root on the loopback host and run the import.
pub async fn run(cfg: &ImporterConfig) -> ImportReport {
    info!(
        host = IMPORTER_DB_HOST,
        port = cfg.mysql_port,
        database = %cfg.mysql_database,
        "connecting to MySQL"
    );
    let session = match ImportSession::connect(&cfg.connect_options()).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "connection failed");
            return ImportReport::stopped(ImportOutcome::ConnectFailed(e));
        }
    };
    info!(user = IMPORTER_DB_USER, "connected to MySQL");

    import_with(session, &cfg.csv_path).await
}

/// Run every step against `target`, then close it.
pub async fn import_with<T: ImportTarget>(mut target: T, csv_path: &str) -> ImportReport {
    let report = import_steps(&mut target, csv_path).await;

    match target.close().await {
        Ok(()) => info!("database connection closed"),
        Err(e) => warn!(error = %e, "failed to close database connection cleanly"),
    }
    report
}

async fn import_steps<T: ImportTarget>(target: &mut T, csv_path: &str) -> ImportReport {
    if let Err(e) = target.ensure_schema().await {
        error!(error = %e, "error creating table 'passengers'");
        return ImportReport::stopped(ImportOutcome::SchemaFailed(e));
    }
    info!("table 'passengers' checked/created");

    let truncate_error = match target.truncate().await {
        Ok(()) => {
            info!("table 'passengers' truncated");
            None
        }
        Err(e) => {
            warn!(
                error = %e,
                truncate_failed = true,
                "error truncating table 'passengers'; continuing, existing rows may be duplicated"
            );
            Some(e)
        }
    };

    info!(path = %csv_path, "executing LOAD DATA INFILE");
    let outcome = match load_and_count(target, csv_path).await {
        Ok((inserted, total)) => {
            info!(inserted, "data loaded into 'passengers'");
            info!(total, "total rows in 'passengers'");
            ImportOutcome::Loaded { inserted, total }
        }
        Err(e) => {
            error!(error = %e, path = %csv_path, "error loading data");
            for (i, hint) in LOAD_HINTS.iter().enumerate() {
                warn!("please ensure {}: {}", i + 1, hint);
            }
            ImportOutcome::LoadFailed(e)
        }
    };

    ImportReport {
        outcome,
        truncate_error,
    }
}

async fn load_and_count<T: ImportTarget>(
    target: &mut T,
    csv_path: &str,
) -> Result<(u64, i64), HubError> {
    let inserted = target.bulk_load(csv_path).await?;
    let total = target.count().await?;
    Ok((inserted, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Error as SqlxError;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Table {
        calls: Vec<&'static str>,
        rows: i64,
    }

    #[derive(Default, Clone)]
    struct FakeTarget {
        table: Arc<Mutex<Table>>,
        fail_schema: bool,
        fail_truncate: bool,
        fail_load: bool,
        csv_rows: u64,
    }

    impl FakeTarget {
        fn record(&self, call: &'static str) {
            self.table.lock().unwrap().calls.push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.table.lock().unwrap().calls.clone()
        }
    }

    fn fail() -> HubError {
        HubError::DatabaseError(SqlxError::Protocol("boom".into()))
    }

    impl ImportTarget for FakeTarget {
        async fn ensure_schema(&mut self) -> Result<(), HubError> {
            self.record("schema");
            if self.fail_schema { Err(fail()) } else { Ok(()) }
        }

        async fn truncate(&mut self) -> Result<(), HubError> {
            self.record("truncate");
            if self.fail_truncate {
                return Err(fail());
            }
            self.table.lock().unwrap().rows = 0;
            Ok(())
        }

        async fn bulk_load(&mut self, _csv_path: &str) -> Result<u64, HubError> {
            self.record("load");
            if self.fail_load {
                return Err(fail());
            }
            self.table.lock().unwrap().rows += self.csv_rows as i64;
            Ok(self.csv_rows)
        }

        async fn count(&mut self) -> Result<i64, HubError> {
            self.record("count");
            Ok(self.table.lock().unwrap().rows)
        }

        async fn close(self) -> Result<(), HubError> {
            self.record("close");
            Ok(())
        }
    }

    #[test]
    fn mysql_session_drives_the_import() {
        fn assert_target<T: ImportTarget>() {}
        assert_target::<ImportSession>();
    }

    #[tokio::test]
    async fn successful_run_issues_every_step_in_order() {
        let target = FakeTarget {
            csv_rows: 3,
            ..Default::default()
        };
        let report = import_with(target.clone(), "/tmp/p.csv").await;
        assert_eq!(target.calls(), ["schema", "truncate", "load", "count", "close"]);
        assert!(report.is_loaded());
        assert_eq!(report.total_rows(), Some(3));
        assert!(report.truncate_error.is_none());
    }

    #[tokio::test]
    async fn schema_failure_stops_before_truncate_but_closes() {
        let target = FakeTarget {
            fail_schema: true,
            ..Default::default()
        };
        let report = import_with(target.clone(), "/tmp/p.csv").await;
        assert_eq!(target.calls(), ["schema", "close"]);
        assert!(matches!(report.outcome, ImportOutcome::SchemaFailed(_)));
    }

    #[tokio::test]
    async fn truncate_failure_is_recorded_and_load_still_runs() {
        let target = FakeTarget {
            fail_truncate: true,
            csv_rows: 3,
            ..Default::default()
        };
        target.table.lock().unwrap().rows = 2;
        let report = import_with(target.clone(), "/tmp/p.csv").await;
        assert_eq!(target.calls(), ["schema", "truncate", "load", "count", "close"]);
        assert!(report.truncate_error.is_some());
        // stale rows survive a failed clear
        assert_eq!(report.total_rows(), Some(5));
    }

    #[tokio::test]
    async fn load_failure_skips_count_and_still_closes() {
        let target = FakeTarget {
            fail_load: true,
            ..Default::default()
        };
        let report = import_with(target.clone(), "/nope.csv").await;
        assert_eq!(target.calls(), ["schema", "truncate", "load", "close"]);
        assert!(matches!(report.outcome, ImportOutcome::LoadFailed(_)));
        assert_eq!(report.total_rows(), None);
        assert_eq!(target.table.lock().unwrap().rows, 0);
    }

    #[tokio::test]
    async fn repeated_import_is_idempotent() {
        let target = FakeTarget {
            csv_rows: 4,
            ..Default::default()
        };
        let first = import_with(target.clone(), "/tmp/p.csv").await;
        let second = import_with(target.clone(), "/tmp/p.csv").await;
        assert_eq!(first.total_rows(), Some(4));
        assert_eq!(second.total_rows(), first.total_rows());
    }
}

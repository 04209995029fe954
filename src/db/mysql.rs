use crate::config::ApiConfig;
use crate::db::models::Passenger;
use crate::db::schema::{
    COUNT_PASSENGERS, MYSQL_INIT, SELECT_SAMPLE, TRUNCATE_PASSENGERS, load_data_infile,
};
use crate::error::HubError;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPoolOptions};
use sqlx::{Connection, MySql, Pool};

pub type MySqlPool = Pool<MySql>;

/// Read access to `passengers` for the HTTP service.
///
/// The pool owns every connection; a request borrows one for the duration of
/// its query and hands it back on drop.
#[derive(Clone)]
pub struct PassengerStorage {
    pool: MySqlPool,
}

impl PassengerStorage {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Build a bounded pool that opens connections on first use, so the
    /// service can start before the database is reachable.
    pub fn connect_lazy(cfg: &ApiConfig) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(cfg.db_pool_max_connections)
            .acquire_timeout(cfg.acquire_timeout())
            .connect_lazy_with(cfg.connect_options());
        Self::new(pool)
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// First rows of the table, in storage order.
    ///
    /// Borrow failures map to [`HubError::Connection`] and no statement is
    /// sent; statement failures map to [`HubError::DatabaseError`].
    pub async fn sample(&self) -> Result<Vec<Passenger>, HubError> {
        let mut conn = self.pool.acquire().await.map_err(HubError::Connection)?;
        let rows = sqlx::query_as::<_, Passenger>(SELECT_SAMPLE)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }
}

/// A single privileged connection used by the importer for one run.
pub struct ImportSession {
    conn: MySqlConnection,
}

impl ImportSession {
    pub async fn connect(opts: &MySqlConnectOptions) -> Result<Self, HubError> {
        let conn = MySqlConnection::connect_with(opts)
            .await
            .map_err(HubError::Connection)?;
        Ok(Self { conn })
    }

    /// Create the table when absent. DDL commits implicitly.
    pub async fn ensure_schema(&mut self) -> Result<(), HubError> {
        sqlx::raw_sql(MYSQL_INIT).execute(&mut self.conn).await?;
        Ok(())
    }

    pub async fn truncate(&mut self) -> Result<(), HubError> {
        sqlx::query(TRUNCATE_PASSENGERS)
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    /// Run the server-side bulk load. Returns the rows the server reports as
    /// inserted. Sent over the text protocol since `LOAD DATA` cannot be
    /// prepared.
    pub async fn bulk_load(&mut self, csv_path: &str) -> Result<u64, HubError> {
        let sql = load_data_infile(csv_path);
        let done = sqlx::raw_sql(&sql).execute(&mut self.conn).await?;
        Ok(done.rows_affected())
    }

    pub async fn count(&mut self) -> Result<i64, HubError> {
        let n: i64 = sqlx::query_scalar(COUNT_PASSENGERS)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(n)
    }

    /// Send COM_QUIT and drop the socket.
    pub async fn close(self) -> Result<(), HubError> {
        self.conn.close().await?;
        Ok(())
    }
}

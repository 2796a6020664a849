use crate::models::student::StudentSnapshot;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::students::Model as StudentRecord;
pub use repositories::search_log::SearchType;
pub use repositories::student::SearchOutcome;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn student_repo(&self) -> repositories::student::StudentRepository {
        repositories::student::StudentRepository::new(self.conn.clone())
    }

    fn search_log_repo(&self) -> repositories::search_log::SearchLogRepository {
        repositories::search_log::SearchLogRepository::new(self.conn.clone())
    }

    /// Best-effort snapshot write. The login path logs and discards the
    /// failure branch; authentication never depends on this succeeding.
    pub async fn upsert_student(&self, snapshot: &StudentSnapshot) -> Result<()> {
        self.student_repo().upsert(snapshot).await
    }

    pub async fn get_student(&self, id: i64) -> Result<Option<StudentRecord>> {
        self.student_repo().get(id).await
    }

    pub async fn search_students(&self, query: &str) -> Result<SearchOutcome> {
        self.student_repo().search(query).await
    }

    pub async fn record_search(
        &self,
        searcher_address: &str,
        search_term: &str,
        search_type: SearchType,
        result_count: i32,
    ) -> Result<()> {
        self.search_log_repo()
            .add(searcher_address, search_term, search_type, result_count)
            .await
    }
}

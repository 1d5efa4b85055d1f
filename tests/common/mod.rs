use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::MigrationHarness;
use tempfile::TempDir;

use shreeji_erp::db::{DbPool, establish_connection_pool};

/// File-backed SQLite database that lives in its own temp directory for the
/// duration of one test. Dropping it removes the directory and with it the
/// database file and its WAL side files.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let database_url = dir.path().join(name).to_string_lossy().into_owned();

        let mut conn = SqliteConnection::establish(&database_url)
            .expect("failed to open test database");
        conn.run_pending_migrations(shreeji_erp::MIGRATIONS)
            .expect("failed to run migrations");

        let pool = establish_connection_pool(&database_url)
            .expect("failed to build test connection pool");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

mod conversion;
mod schema;
mod submission_repository;

pub use schema::{ensure_schema, TableName};
pub use submission_repository::SubmissionRepository;

/// A single-connection in-memory database that lives as long as the pool.
#[cfg(test)]
pub(crate) async fn memory_pool() -> sqlx::Pool<sqlx::Sqlite> {
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

use std::fmt::Display;

use indoc::formatdoc;
use lazy_regex::regex_is_match;
use sqlx::{query, Pool, Sqlite};
use thiserror::Error;
use tracing::info;

const TABLE_SUFFIX: &str = "collaborate_requests";

/// Name of the submissions table, namespaced with a configurable prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableName(String);

#[derive(Debug, Error)]
#[error("Invalid table prefix `{0}`: it can only contain a-z, A-Z, 0-9 or an underscore (_)")]
pub struct InvalidTablePrefix(String);

impl TableName {
    pub fn with_prefix(prefix: &str) -> Result<TableName, InvalidTablePrefix> {
        if regex_is_match!(r"^[A-Za-z0-9_]*$", prefix) {
            Ok(TableName(format!("{prefix}{TABLE_SUFFIX}")))
        } else {
            Err(InvalidTablePrefix(prefix.escape_default().to_string()))
        }
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Creates the submissions table and its index unless they already exist.
#[tracing::instrument(skip(pool))]
pub async fn ensure_schema(pool: &Pool<Sqlite>, table: &TableName) -> anyhow::Result<()> {
    let mut transaction = pool.begin().await?;

    query(&formatdoc! {
        r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type VARCHAR(50) NOT NULL,
                job_title VARCHAR(255) NOT NULL,
                company VARCHAR(255) NOT NULL,
                phone VARCHAR(50) NOT NULL,
                email VARCHAR(255) NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
        "#,
    })
    .execute(&mut *transaction)
    .await?;

    query(&format!(
        "CREATE INDEX IF NOT EXISTS {table}_created_at ON {table} (created_at)"
    ))
    .execute(&mut *transaction)
    .await?;

    transaction.commit().await?;

    info!("Table {table} is ready");
    Ok(())
}

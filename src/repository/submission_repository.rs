use sqlx::{query_as, FromRow, Pool, Sqlite};

use crate::models::{types::UtcDateTime, CollabType, NewSubmission, Submission, SubmissionId};

use super::{
    conversion::{DBConvertible, DBFromConversionError, DBToConversionError},
    TableName,
};

pub struct SubmissionRepository {
    pool: Pool<Sqlite>,
    table: TableName,
}

impl SubmissionRepository {
    pub fn new(pool: Pool<Sqlite>, table: TableName) -> SubmissionRepository {
        SubmissionRepository { pool, table }
    }

    pub async fn add_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<Submission, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let added_submission = {
            let collab_type = submission.collab_type.to_db()?;
            let table = &self.table;

            query_as::<_, SqlSubmission>(&format!(
                r#"
                    INSERT INTO {table} (type, job_title, company, phone, email)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id, type, job_title, company, phone, email, created_at
                "#
            ))
            .bind(collab_type)
            .bind(&submission.job_title)
            .bind(&submission.company)
            .bind(&submission.phone)
            .bind(&submission.email)
            .fetch_one(&mut *transaction)
            .await?
        };

        transaction.commit().await?;

        Ok(Submission::from_db(&added_submission)?)
    }

    /// All submissions, the most recent first.
    pub async fn list_newest_first(&self) -> Result<Vec<Submission>, anyhow::Error> {
        let table = &self.table;

        let rows = query_as::<_, SqlSubmission>(&format!(
            r#"
                SELECT id, type, job_title, company, phone, email, created_at
                FROM {table}
                ORDER BY created_at DESC, id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        let submissions = rows
            .iter()
            .map(Submission::from_db)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(submissions)
    }

    pub async fn ping(&self) -> Result<(), anyhow::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
pub struct SqlSubmission {
    id: i64,
    #[sqlx(rename = "type")]
    collab_type: String,
    job_title: String,
    company: String,
    phone: String,
    email: String,
    created_at: String,
}

impl DBConvertible for Submission {
    type DBType = SqlSubmission;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(SqlSubmission {
            id: self.id.to_db()?,
            collab_type: self.collab_type.to_db()?,
            job_title: self.job_title.clone(),
            company: self.company.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            created_at: self.created_at.to_db()?,
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Submission {
            id: SubmissionId::from_db(&value.id)?,
            collab_type: CollabType::from_db(&value.collab_type)?,
            job_title: value.job_title.clone(),
            company: value.company.clone(),
            phone: value.phone.clone(),
            email: value.email.clone(),
            created_at: UtcDateTime::from_db(&value.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::{
        models::{CollabType, NewSubmission, Submission, SubmissionId},
        repository::{
            conversion::{DBConvertible, DBToConversionError},
            ensure_schema, memory_pool, TableName,
        },
    };

    use super::SubmissionRepository;

    async fn repository() -> SubmissionRepository {
        let pool = memory_pool().await;
        let table = TableName::with_prefix("test_").unwrap();
        ensure_schema(&pool, &table).await.unwrap();
        SubmissionRepository::new(pool, table)
    }

    fn new_submission(company: &str) -> NewSubmission {
        NewSubmission {
            collab_type: CollabType::Developer,
            job_title: "Engineer".to_string(),
            company: company.to_string(),
            phone: "555-0100".to_string(),
            email: "dev@example.com".to_string(),
        }
    }

    #[test(tokio::test)]
    async fn stores_all_fields() {
        let repository = repository().await;

        let submission = repository
            .add_submission(&new_submission("Acme"))
            .await
            .unwrap();

        assert_eq!(submission.collab_type, CollabType::Developer);
        assert_eq!(submission.job_title, "Engineer");
        assert_eq!(submission.company, "Acme");
        assert_eq!(submission.phone, "555-0100");
        assert_eq!(submission.email, "dev@example.com");
    }

    #[test(tokio::test)]
    async fn ids_and_timestamps_increase() {
        let repository = repository().await;

        let mut previous = repository
            .add_submission(&new_submission("First"))
            .await
            .unwrap();

        for company in ["Second", "Third", "Fourth"] {
            let next = repository
                .add_submission(&new_submission(company))
                .await
                .unwrap();

            assert!(next.id > previous.id);
            assert!(next.created_at >= previous.created_at);
            previous = next;
        }
    }

    #[test(tokio::test)]
    async fn empty_listing() {
        let repository = repository().await;
        assert!(repository.list_newest_first().await.unwrap().is_empty());
    }

    #[test(tokio::test)]
    async fn listing_is_newest_first() {
        let repository = repository().await;

        for company in ["First", "Second", "Third"] {
            repository
                .add_submission(&new_submission(company))
                .await
                .unwrap();
        }

        let companies = repository
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.company)
            .collect::<Vec<_>>();

        assert_eq!(companies, ["Third", "Second", "First"]);
    }

    #[test(tokio::test)]
    async fn stored_row_converts_both_ways() {
        let repository = repository().await;
        let submission = repository
            .add_submission(&new_submission("Acme"))
            .await
            .unwrap();

        let row = submission.to_db().unwrap();

        assert_eq!(row.id, submission.id.0 as i64);
        assert_eq!(row.collab_type, "developer");
        assert_eq!(Submission::from_db(&row).unwrap(), submission);
    }

    #[test(tokio::test)]
    async fn id_too_large_for_the_database() {
        let repository = repository().await;
        let mut submission = repository
            .add_submission(&new_submission("Acme"))
            .await
            .unwrap();
        submission.id = SubmissionId(u64::MAX);

        assert!(matches!(
            submission.to_db(),
            Err(DBToConversionError::NumberOutOfRange(u64::MAX))
        ));
    }

    #[test(tokio::test)]
    async fn insert_failure_is_reported() {
        let repository = repository().await;

        sqlx::query("DROP TABLE test_collaborate_requests")
            .execute(&repository.pool)
            .await
            .unwrap();

        assert!(repository
            .add_submission(&new_submission("Acme"))
            .await
            .is_err());
    }
}

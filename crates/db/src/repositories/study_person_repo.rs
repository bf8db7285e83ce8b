//! Repository for the `study_people` table.

use sqlx::PgPool;
use qiita_core::contact::NewContact;
use qiita_core::types::DbId;

use crate::models::study_person::StudyPerson;

const COLUMNS: &str = "id, name, email, affiliation, phone, address";

/// Provides CRUD operations for study contacts.
pub struct StudyPersonRepo;

impl StudyPersonRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StudyPerson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM study_people WHERE id = $1");
        sqlx::query_as::<_, StudyPerson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all contacts ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<StudyPerson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM study_people ORDER BY name, id");
        sqlx::query_as::<_, StudyPerson>(&query).fetch_all(pool).await
    }

    /// Insert a new contact, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewContact) -> Result<StudyPerson, sqlx::Error> {
        let query = format!(
            "INSERT INTO study_people (name, email, affiliation, phone, address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudyPerson>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.affiliation)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }
}

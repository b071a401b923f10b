//! `PostgreSQL` document store.
//!
//! # Table: `inkshelf.document`
//!
//! One row per document, keyed by `(collection, id)`, with the body in a
//! JSONB `data` column. Bodies are exchanged as text so that no JSON codec
//! feature is needed on the driver.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{
    CollectionPath, Document, DocumentStore, FieldUpdate, Fields, StoreError, apply_updates,
};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Parse a stored JSON body.
fn parse_body(id: &str, data: &str) -> Result<Fields, StoreError> {
    serde_json::from_str(data).map_err(|e| {
        StoreError::DataCorruption(format!("invalid document body for {id}: {e}"))
    })
}

fn encode_body(fields: &Fields) -> Result<String, StoreError> {
    serde_json::to_string(fields)
        .map_err(|e| StoreError::DataCorruption(format!("failed to serialize document: {e}")))
}

fn into_documents(rows: Vec<(String, String)>) -> Result<Vec<Document>, StoreError> {
    rows.into_iter()
        .map(|(id, data)| {
            let fields = parse_body(&id, &data)?;
            Ok(Document { id, fields })
        })
        .collect()
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn get(
        &self,
        collection: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let row: Option<(String, String)> = sqlx::query_as(
            r"
            SELECT id, data::text
            FROM inkshelf.document
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, data)| {
            let fields = parse_body(&id, &data)?;
            Ok(Document { id, fields })
        })
        .transpose()
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r"
            SELECT id, data::text
            FROM inkshelf.document
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        into_documents(rows)
    }

    async fn find_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<(String, String)> = sqlx::query_as(
            r"
            SELECT id, data::text
            FROM inkshelf.document
            WHERE collection = $1 AND data -> $2 = $3::jsonb
            ORDER BY created_at ASC, id ASC
            LIMIT $4
            ",
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(value.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_documents(rows)
    }

    async fn create(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let data = encode_body(&fields)?;

        sqlx::query(
            r"
            INSERT INTO inkshelf.document (collection, id, data)
            VALUES ($1, $2, $3::jsonb)
            ",
        )
        .bind(collection.as_str())
        .bind(&id)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Conflict("document already exists".to_owned());
            }
            StoreError::Database(e)
        })?;

        Ok(Document { id, fields })
    }

    async fn replace(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let data = encode_body(&fields)?;

        sqlx::query(
            r"
            INSERT INTO inkshelf.document (collection, id, data)
            VALUES ($1, $2, $3::jsonb)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        updates: &[FieldUpdate],
    ) -> Result<Document, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent read-modify-write cycles on this document
        let row: Option<(String,)> = sqlx::query_as(
            r"
            SELECT data::text
            FROM inkshelf.document
            WHERE collection = $1 AND id = $2
            FOR UPDATE
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((data,)) = row else {
            return Err(StoreError::NotFound);
        };

        let mut fields = parse_body(id, &data)?;
        apply_updates(&mut fields, updates)?;

        sqlx::query(
            r"
            UPDATE inkshelf.document
            SET data = $3::jsonb, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(encode_body(&fields)?)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Document {
            id: id.to_owned(),
            fields,
        })
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            DELETE FROM inkshelf.document
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

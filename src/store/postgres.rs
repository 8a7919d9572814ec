//! Postgres store backend.
//!
//! Each collection is a `(id uuid primary key, doc jsonb)` table. Unique
//! fields are enforced with expression indexes over `doc->>'field'`, so a
//! conflicting insert fails atomically inside the database. Tables and
//! indexes are created idempotently at connect time.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::filter::{Direction, Filter};
use super::{document_id, validate_identifier, CollectionSpec, DocumentStore, StoreError};

pub struct PgStore {
    pool: PgPool,
    unique_fields: HashMap<String, Vec<String>>,
}

impl PgStore {
    pub async fn connect(
        url: &str,
        max_connections: u32,
        specs: &[CollectionSpec],
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        let mut unique_fields = HashMap::new();
        for spec in specs {
            validate_identifier(spec.name)?;
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (id UUID PRIMARY KEY, doc JSONB NOT NULL)",
                spec.name
            ))
            .execute(&pool)
            .await?;

            for field in spec.unique_fields {
                validate_identifier(field)?;
                sqlx::query(&format!(
                    "CREATE UNIQUE INDEX IF NOT EXISTS \"{name}\" ON \"{table}\" ((doc->>'{field}'))",
                    name = unique_index_name(spec.name, field),
                    table = spec.name,
                    field = field,
                ))
                .execute(&pool)
                .await?;
            }

            unique_fields.insert(
                spec.name.to_string(),
                spec.unique_fields.iter().map(|f| f.to_string()).collect(),
            );
        }

        info!("connected to postgres and prepared {} collections", specs.len());
        Ok(Self {
            pool,
            unique_fields,
        })
    }

    /// Translate a unique-index violation into [`StoreError::Duplicate`]
    fn map_write_error(&self, collection: &str, err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let fields = self.unique_fields.get(collection);
                let field = fields
                    .and_then(|fields| {
                        let constraint = db_err.constraint()?;
                        fields
                            .iter()
                            .find(|f| unique_index_name(collection, f) == constraint)
                    })
                    .or_else(|| fields.and_then(|fields| fields.first()))
                    .cloned()
                    .unwrap_or_else(|| "value".to_string());
                return StoreError::Duplicate {
                    collection: collection.to_string(),
                    field,
                };
            }
        }
        StoreError::Sqlx(err)
    }

    fn build_select(collection: &str, filter: &Filter, limit_one: bool) -> Result<String, StoreError> {
        validate_identifier(collection)?;
        let mut sql = format!("SELECT doc FROM \"{}\"", collection);
        push_where_clause(&mut sql, filter)?;
        if let Some(order) = filter.order() {
            validate_identifier(&order.field)?;
            let direction = match order.direction {
                Direction::Ascending => "ASC",
                Direction::Descending => "DESC",
            };
            // Order fields are RFC 3339 timestamps; cast so sub-second
            // precision differences compare chronologically.
            sql.push_str(&format!(
                " ORDER BY (doc->>'{}')::timestamptz {}",
                order.field, direction
            ));
        }
        if limit_one {
            sql.push_str(" LIMIT 1");
        }
        Ok(sql)
    }
}

fn unique_index_name(collection: &str, field: &str) -> String {
    format!("{}_{}_key", collection, field)
}

fn push_where_clause(sql: &mut String, filter: &Filter) -> Result<(), StoreError> {
    for (i, (field, _)) in filter.conditions().iter().enumerate() {
        validate_identifier(field)?;
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        sql.push_str(&format!("doc->>'{}' = ${}", field, i + 1));
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: &str, doc: Value) -> Result<(), StoreError> {
        validate_identifier(collection)?;
        let id = document_id(&doc)?;
        sqlx::query(&format!(
            "INSERT INTO \"{}\" (id, doc) VALUES ($1, $2)",
            collection
        ))
        .bind(id)
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(|e| self.map_write_error(collection, e))?;
        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        validate_identifier(collection)?;
        let row = sqlx::query(&format!("SELECT doc FROM \"{}\" WHERE id = $1", collection))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get("doc")).transpose().map_err(Into::into)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let sql = Self::build_select(collection, filter, false)?;
        let mut query = sqlx::query(&sql);
        for (_, value) in filter.conditions() {
            query = query.bind(value.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|r| r.try_get("doc").map_err(Into::into))
            .collect()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        let sql = Self::build_select(collection, filter, true)?;
        let mut query = sqlx::query(&sql);
        for (_, value) in filter.conditions() {
            query = query.bind(value.clone());
        }
        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| r.try_get("doc")).transpose().map_err(Into::into)
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: Uuid,
        doc: Value,
    ) -> Result<bool, StoreError> {
        validate_identifier(collection)?;
        let result = sqlx::query(&format!(
            "UPDATE \"{}\" SET doc = $2 WHERE id = $1",
            collection
        ))
        .bind(id)
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(|e| self.map_write_error(collection, e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        validate_identifier(collection)?;
        let result = sqlx::query(&format!("DELETE FROM \"{}\" WHERE id = $1", collection))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        validate_identifier(collection)?;
        let mut sql = format!("DELETE FROM \"{}\"", collection);
        push_where_clause(&mut sql, filter)?;
        let mut query = sqlx::query(&sql);
        for (_, value) in filter.conditions() {
            query = query.bind(value.clone());
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

//! Document collections
//!
//! A collection is a table `(id TEXT PRIMARY KEY, doc JSONB NOT NULL)`.
//! Documents go in and come out as JSON text so no driver-side JSON
//! feature is required.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use crate::pool::DocStorePool;
use crate::types::FindOptions;
use crate::{DocStoreError, Result};

/// Handle to a named document collection
#[derive(Clone)]
pub struct Collection {
    pool: DocStorePool,
    name: String,
}

impl Collection {
    pub(crate) fn new(pool: DocStorePool, name: &str) -> Result<Self> {
        validate_identifier(name)?;
        Ok(Self {
            pool,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the backing table if it does not exist yet
    pub async fn ensure(&self) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .batch_execute(&format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (id TEXT PRIMARY KEY, doc JSONB NOT NULL)",
                self.name
            ))
            .await?;
        debug!(collection = %self.name, "Collection ensured");
        Ok(())
    }

    /// Create an expression index on a top-level document field, in the same
    /// byte-order collation `find` sorts with
    pub async fn ensure_index(&self, field: &str) -> Result<()> {
        validate_identifier(field)?;
        let client = self.pool.get().await?;
        client
            .batch_execute(&format!(
                "CREATE INDEX IF NOT EXISTS \"{table}_{field}_idx\" ON \"{table}\" (((doc->>'{field}') COLLATE \"C\"))",
                table = self.name,
                field = field
            ))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, doc), fields(collection = %self.name))]
    pub async fn insert_one<T: Serialize>(&self, id: &str, doc: &T) -> Result<()> {
        let json = serde_json::to_string(doc)?;
        let client = self.pool.get().await?;
        client
            .execute(
                &format!(
                    "INSERT INTO \"{}\" (id, doc) VALUES ($1, $2::text::jsonb)",
                    self.name
                ),
                &[&id, &json],
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %self.name))]
    pub async fn find<T: DeserializeOwned>(&self, options: &FindOptions) -> Result<Vec<T>> {
        let sql = find_sql(&self.name, options)?;
        let client = self.pool.get().await?;
        let rows = client.query(&sql, &[]).await?;

        rows.iter()
            .map(|row| -> Result<T> {
                let text: String = row.try_get(0)?;
                serde_json::from_str(&text).map_err(DocStoreError::from)
            })
            .collect()
    }

    /// Delete every document; returns the number removed
    #[instrument(skip(self), fields(collection = %self.name))]
    pub async fn delete_many(&self) -> Result<u64> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute(&format!("DELETE FROM \"{}\"", self.name), &[])
            .await?;
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<u64> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(&format!("SELECT COUNT(*) FROM \"{}\"", self.name), &[])
            .await?;
        let count: i64 = row.try_get(0)?;
        Ok(count as u64)
    }
}

/// Collection and field names end up inside SQL text, so only plain
/// identifiers are accepted.
fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid && name.len() <= 63 {
        Ok(())
    } else {
        Err(DocStoreError::InvalidIdentifier(name.to_string()))
    }
}

fn find_sql(table: &str, options: &FindOptions) -> Result<String> {
    let mut sql = format!("SELECT doc::text FROM \"{}\"", table);

    if let Some(sort) = &options.sort {
        validate_identifier(&sort.field)?;
        sql.push_str(&format!(
            " ORDER BY (doc->>'{}') COLLATE \"C\" {}",
            sort.field,
            sort.direction.as_sql()
        ));
    }

    if let Some(limit) = options.limit {
        if limit < 0 {
            return Err(DocStoreError::Configuration(format!(
                "Negative limit: {}",
                limit
            )));
        }
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    Ok(sql)
}

//! Item persistence.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, instrument};

use crate::model::{CreateItem, Item};

/// Reads and appends rows of the `items` table.
#[derive(Debug, Clone)]
pub struct ItemStore {
    pool: SqlitePool,
}

impl ItemStore {
    /// Create a store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All items in insertion order.
    pub async fn list(&self) -> Result<Vec<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>("SELECT id, name, created_at FROM items ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
    }

    /// Insert a new item, stamping it with the current time.
    #[instrument(skip(self, new), fields(name_len = new.name.chars().count()))]
    pub async fn create(&self, new: &CreateItem) -> Result<Item, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            "INSERT INTO items (name, created_at) VALUES (?, ?) \
             RETURNING id, name, created_at",
        )
        .bind(&new.name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        debug!(id = item.id, "Item stored");
        Ok(item)
    }
}

//! MySQL-backed catalog store.

use crate::domain::CatalogItem;
use crate::infra::config::validate_ident;
use crate::storage::{CatalogStore, StoreError};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{Executor, MySqlPool, Row};

pub const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS catalog (
    item_id INT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description VARCHAR(255) NOT NULL,
    price DOUBLE NOT NULL,
    image VARCHAR(255)
)";

const SELECT_ALL_SQL: &str = "SELECT item_id, name, description, price, image FROM catalog";
const SELECT_ONE_SQL: &str =
    "SELECT item_id, name, description, price, image FROM catalog WHERE item_id = ?";
const INSERT_SQL: &str =
    "INSERT INTO catalog (item_id, name, description, price, image) VALUES (?, ?, ?, ?, ?)";
const INSERT_IGNORE_SQL: &str =
    "INSERT IGNORE INTO catalog (item_id, name, description, price, image) VALUES (?, ?, ?, ?, ?)";
const UPDATE_SQL: &str =
    "UPDATE catalog SET name = ?, description = ?, price = ?, image = ? WHERE item_id = ?";
const DELETE_SQL: &str = "DELETE FROM catalog WHERE item_id = ?";

/// Opens a small pool with `options` and proves it with a round trip.
///
/// A pool handle alone does not guarantee the server is reachable.
pub async fn connect_verified(
    options: MySqlConnectOptions,
    target: &str,
) -> Result<MySqlPool, StoreError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|source| StoreError::Connect {
            target: target.to_string(),
            source,
        })?;
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|source| StoreError::Connect {
            target: target.to_string(),
            source,
        })?;
    Ok(pool)
}

/// `CREATE DATABASE IF NOT EXISTS` for `schema`, which must be a plain identifier.
pub async fn create_schema(pool: &MySqlPool, schema: &str) -> Result<(), StoreError> {
    if !validate_ident(schema) {
        return Err(StoreError::InvalidIdentifier(schema.to_string()));
    }
    // Identifiers cannot be bound as parameters; DDL goes over the text protocol.
    let sql = format!("CREATE DATABASE IF NOT EXISTS `{}`", schema);
    pool.execute(sql.as_str()).await?;
    Ok(())
}

#[derive(Clone)]
pub struct MySqlCatalogStore {
    pool: MySqlPool,
}

impl MySqlCatalogStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn create_table(&self) -> Result<(), StoreError> {
        self.pool.execute(CREATE_TABLE_SQL).await?;
        Ok(())
    }
}

fn row_to_item(row: &MySqlRow) -> Result<CatalogItem, sqlx::Error> {
    Ok(CatalogItem {
        item_id: row.try_get("item_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        image: row
            .try_get::<Option<String>, _>("image")?
            .unwrap_or_default(),
    })
}

#[async_trait]
impl CatalogStore for MySqlCatalogStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<CatalogItem>, StoreError> {
        let rows = sqlx::query(SELECT_ALL_SQL).fetch_all(&self.pool).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(row_to_item(row)?);
        }
        Ok(items)
    }

    async fn get_item(&self, item_id: i32) -> Result<Option<CatalogItem>, StoreError> {
        let row = sqlx::query(SELECT_ONE_SQL)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_item).transpose()?)
    }

    async fn insert_item(&self, item: &CatalogItem) -> Result<(), StoreError> {
        sqlx::query(INSERT_SQL)
            .bind(item.item_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(&item.image)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_item(&self, item: &CatalogItem) -> Result<u64, StoreError> {
        let result = sqlx::query(UPDATE_SQL)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(&item.image)
            .bind(item.item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_item(&self, item_id: i32) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_SQL)
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn import_items(&self, items: &[CatalogItem]) -> Result<u64, StoreError> {
        // Dropping `tx` without commit rolls the batch back.
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for item in items {
            // sqlx prepares the statement once per connection and reuses it per row.
            let result = sqlx::query(INSERT_IGNORE_SQL)
                .bind(item.item_id)
                .bind(&item.name)
                .bind(&item.description)
                .bind(item.price)
                .bind(&item.image)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

//! ResourceStore - typed create/get/delete for users and buckets over SQLite.
//!
//! Owns no business logic. Every call is a single statement, bounded by the
//! configured per-request deadline, and failures are reported as
//! store-agnostic [`StoreError`] kinds.

use crate::models::{bucket::Bucket, user::User};
use sqlx::SqlitePool;
use std::{future::Future, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::debug;

const MIGRATION_SQL: &str = include_str!("../../migrations/0001_init.sql");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no row matches `{0}`")]
    NotFound(String),
    #[error("`{0}` already exists")]
    DuplicateKey(String),
    #[error("store call exceeded {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to the backing store. Cheap to clone; the pool is shared and safe
/// for concurrent callers.
#[derive(Clone)]
pub struct ResourceStore {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,

    /// Upper bound on a single store round trip.
    pub request_timeout: Duration,
}

impl ResourceStore {
    pub fn new(db: Arc<SqlitePool>, request_timeout: Duration) -> Self {
        Self {
            db,
            request_timeout,
        }
    }

    /// Apply the embedded schema. Statements are idempotent.
    pub async fn migrate(&self) -> StoreResult<usize> {
        let statements = MIGRATION_SQL
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        for stmt in &statements {
            debug!("Executing migration SQL: {}", stmt);
            sqlx::query(stmt).execute(&*self.db).await?;
        }

        Ok(statements.len())
    }

    /// Run one store round trip under the request deadline.
    ///
    /// Expiry drops `call` mid-flight. SQLite may already have committed a
    /// write by then, so a create that reported `Timeout` can still have
    /// inserted its row and a retry of it answers `DuplicateKey`.
    async fn bounded<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        tokio::time::timeout(self.request_timeout, call)
            .await
            .unwrap_or_else(|_| Err(StoreError::Timeout(self.request_timeout)))
    }

    /// Insert a new user. Fails with `DuplicateKey` if the name is taken.
    pub async fn create_user(&self, user: &User) -> StoreResult<User> {
        self.bounded(async {
            sqlx::query_as::<_, User>(
                "INSERT INTO users (id, name, password_hash, api_key, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)
                 RETURNING id, name, password_hash, api_key, created_at, updated_at",
            )
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(&user.api_key)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&*self.db)
            .await
            .map_err(|err| classify(err, &user.name))
        })
        .await
    }

    pub async fn get_user_by_name(&self, name: &str) -> StoreResult<User> {
        self.bounded(async {
            sqlx::query_as::<_, User>(
                "SELECT id, name, password_hash, api_key, created_at, updated_at
                 FROM users WHERE name = ?",
            )
            .bind(name)
            .fetch_one(&*self.db)
            .await
            .map_err(|err| classify(err, name))
        })
        .await
    }

    /// Delete a user by name. `NotFound` if nothing was removed.
    pub async fn delete_user(&self, name: &str) -> StoreResult<()> {
        self.bounded(async {
            let result = sqlx::query("DELETE FROM users WHERE name = ?")
                .bind(name)
                .execute(&*self.db)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(name.to_string()));
            }
            Ok(())
        })
        .await
    }

    /// Insert a new bucket. Fails with `DuplicateKey` if the name is taken.
    pub async fn create_bucket(&self, bucket: &Bucket) -> StoreResult<Bucket> {
        self.bounded(async {
            sqlx::query_as::<_, Bucket>(
                "INSERT INTO buckets (id, bucket, tags, bucket_domain_name, created_at)
                 VALUES (?, ?, ?, ?, ?)
                 RETURNING id, bucket, tags, bucket_domain_name, created_at",
            )
            .bind(bucket.id)
            .bind(&bucket.bucket)
            .bind(&bucket.tags)
            .bind(&bucket.bucket_domain_name)
            .bind(bucket.created_at)
            .fetch_one(&*self.db)
            .await
            .map_err(|err| classify(err, &bucket.bucket))
        })
        .await
    }

    pub async fn get_bucket(&self, name: &str) -> StoreResult<Bucket> {
        self.bounded(async {
            sqlx::query_as::<_, Bucket>(
                "SELECT id, bucket, tags, bucket_domain_name, created_at
                 FROM buckets WHERE bucket = ?",
            )
            .bind(name)
            .fetch_one(&*self.db)
            .await
            .map_err(|err| classify(err, name))
        })
        .await
    }

    /// Delete a bucket by name. `NotFound` if nothing was removed.
    pub async fn delete_bucket(&self, name: &str) -> StoreResult<()> {
        self.bounded(async {
            let result = sqlx::query("DELETE FROM buckets WHERE bucket = ?")
                .bind(name)
                .execute(&*self.db)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(name.to_string()));
            }
            Ok(())
        })
        .await
    }
}

/// Translate driver errors into store-agnostic kinds.
fn classify(err: sqlx::Error, key: &str) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound(key.to_string()),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateKey(key.to_string())
        }
        other => StoreError::Sqlx(other),
    }
}

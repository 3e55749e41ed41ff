//! PostgreSQL/pgvector vector index
//!
//! Index metadata lives in a registry table; each index gets its own table
//! named after it. The pool connects lazily, so a bad connection string or an
//! unreachable server surfaces at the first operation rather than at startup.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::postgres::{PgExecutor, PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::debug;

use crate::domain::vector_index::{
    ChunkReference, IndexEntry, IndexError, IndexStats, RetrievalResult, ScoredChunk,
    SimilarityMetric, VectorIndex,
};

const REGISTRY_TABLE: &str = "vector_index_registry";

static INDEX_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]{0,54}$").unwrap());

/// pgvector operator for a metric
fn operator(metric: SimilarityMetric) -> &'static str {
    match metric {
        SimilarityMetric::Cosine => "<=>",
        SimilarityMetric::InnerProduct => "<#>",
    }
}

/// Convert a pgvector distance back to a similarity score
fn to_similarity(metric: SimilarityMetric, distance: f64) -> f32 {
    match metric {
        SimilarityMetric::Cosine => (1.0 - distance) as f32,
        // pgvector returns the negated inner product
        SimilarityMetric::InnerProduct => (-distance) as f32,
    }
}

/// Text form accepted by a `::vector` cast
fn vector_literal(vector: &[f32]) -> String {
    let values: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}

/// Table holding the entries of an index
fn table_name(index: &str) -> Result<String, IndexError> {
    if !INDEX_NAME_PATTERN.is_match(index) {
        return Err(IndexError::invalid_argument(format!(
            "Invalid index name '{}': lowercase alphanumeric, '-' and '_' only",
            index
        )));
    }
    Ok(format!("vectors_{}", index.replace('-', "_")))
}

fn storage_error(context: &str, e: sqlx::Error) -> IndexError {
    IndexError::storage(format!("{}: {}", context, e))
}

/// pgvector-backed vector index
#[derive(Debug, Clone)]
pub struct PgVectorIndex {
    pool: Result<PgPool, IndexError>,
}

impl PgVectorIndex {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Ok(pool) }
    }

    /// Build a pool that connects on first use; a malformed connection string
    /// is reported by every operation instead of here
    pub fn connect_lazy(connection_string: &str) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(connection_string)
            .map_err(|e| storage_error("Invalid vector store connection string", e));

        Self { pool }
    }

    fn pool(&self) -> Result<&PgPool, IndexError> {
        self.pool.as_ref().map_err(Clone::clone)
    }

    /// Dimension and metric of a registered index
    async fn lookup<'e, E>(executor: E, name: &str) -> Result<(usize, SimilarityMetric), IndexError>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT dimension, metric FROM {} WHERE name = $1", REGISTRY_TABLE);

        let row = sqlx::query(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
            .map_err(|e| storage_error("Failed to read index registry", e))?
            .ok_or_else(|| IndexError::index_not_found(name))?;

        let dimension: i32 = row
            .try_get("dimension")
            .map_err(|e| storage_error("Bad registry row", e))?;
        let metric: String = row
            .try_get("metric")
            .map_err(|e| storage_error("Bad registry row", e))?;
        let metric = metric.parse::<SimilarityMetric>().map_err(IndexError::storage)?;

        Ok((dimension as usize, metric))
    }
}

/// Shared schema DDL, preceded by the transaction-scoped advisory lock that
/// serializes concurrent `create_index` callers
fn schema_statements() -> [String; 3] {
    [
        format!("SELECT pg_advisory_xact_lock(hashtext('{}'))", REGISTRY_TABLE),
        "CREATE EXTENSION IF NOT EXISTS vector".to_string(),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                name TEXT PRIMARY KEY,
                dimension INTEGER NOT NULL,
                metric TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            REGISTRY_TABLE
        ),
    ]
}

fn entries_table_ddl(table: &str, dimension: usize) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            key TEXT PRIMARY KEY,
            seq BIGSERIAL,
            embedding vector({}) NOT NULL,
            chunk JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        table, dimension
    )
}

#[async_trait]
impl VectorIndex for PgVectorIndex {
    async fn create_index(
        &self,
        name: &str,
        dimension: usize,
        metric: SimilarityMetric,
    ) -> Result<(), IndexError> {
        if dimension == 0 {
            return Err(IndexError::invalid_argument("dimension must be greater than 0"));
        }
        let table = table_name(name)?;

        let mut tx = self
            .pool()?
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        for statement in schema_statements() {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| storage_error("Failed to prepare index schema", e))?;
        }

        let insert = format!(
            "INSERT INTO {} (name, dimension, metric) VALUES ($1, $2, $3) ON CONFLICT (name) DO NOTHING",
            REGISTRY_TABLE
        );
        sqlx::query(&insert)
            .bind(name)
            .bind(dimension as i32)
            .bind(metric.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("Failed to register index", e))?;

        // An earlier registration wins; the read-back decides
        let (existing_dimension, existing_metric) = Self::lookup(&mut *tx, name).await?;

        if existing_dimension != dimension {
            return Err(IndexError::dimension_conflict(name, existing_dimension, dimension));
        }
        if existing_metric != metric {
            return Err(IndexError::MetricConflict {
                index: name.to_string(),
                existing: existing_metric.to_string(),
                requested: metric.to_string(),
            });
        }

        sqlx::query(&entries_table_ddl(&table, dimension))
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("Failed to create index table", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit index creation", e))?;

        debug!(index = name, dimension, %metric, "pgvector index ready");

        Ok(())
    }

    async fn upsert(&self, name: &str, entries: Vec<IndexEntry>) -> Result<usize, IndexError> {
        let table = table_name(name)?;
        let (dimension, _) = Self::lookup(self.pool()?, name).await?;

        if let Some(bad) = entries.iter().find(|e| e.vector.len() != dimension) {
            return Err(IndexError::dimension_conflict(name, dimension, bad.vector.len()));
        }

        if entries.is_empty() {
            return Ok(0);
        }

        // seq is left untouched on conflict so replaced keys keep their original order
        let query = format!(
            r#"
            INSERT INTO {} (key, embedding, chunk)
            VALUES ($1, $2::vector, $3)
            ON CONFLICT (key) DO UPDATE SET
                embedding = EXCLUDED.embedding,
                chunk = EXCLUDED.chunk,
                updated_at = NOW()
            "#,
            table
        );

        let mut tx = self
            .pool()?
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        let count = entries.len();

        for entry in entries {
            let chunk = serde_json::to_value(&entry.chunk)
                .map_err(|e| IndexError::storage(format!("Failed to encode chunk: {}", e)))?;

            sqlx::query(&query)
                .bind(&entry.key)
                .bind(vector_literal(&entry.vector))
                .bind(chunk)
                .execute(&mut *tx)
                .await
                .map_err(|e| storage_error("Failed to upsert entry", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit upsert", e))?;

        debug!(index = name, count, "Upserted entries");

        Ok(count)
    }

    async fn query(
        &self,
        name: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<RetrievalResult, IndexError> {
        if top_k == 0 {
            return Err(IndexError::invalid_argument("top_k must be greater than 0"));
        }

        let table = table_name(name)?;
        let (dimension, metric) = Self::lookup(self.pool()?, name).await?;

        if vector.len() != dimension {
            return Err(IndexError::dimension_conflict(name, dimension, vector.len()));
        }

        let query = format!(
            "SELECT chunk, (embedding {} $1::vector)::float8 AS distance FROM {} ORDER BY distance, seq LIMIT $2",
            operator(metric),
            table
        );

        let rows = sqlx::query(&query)
            .bind(vector_literal(vector))
            .bind(top_k as i64)
            .fetch_all(self.pool()?)
            .await
            .map_err(|e| storage_error("Failed to query index", e))?;

        let mut results = Vec::with_capacity(rows.len());

        for row in rows {
            let chunk: serde_json::Value = row
                .try_get("chunk")
                .map_err(|e| storage_error("Bad result row", e))?;
            let distance: f64 = row
                .try_get("distance")
                .map_err(|e| storage_error("Bad result row", e))?;
            let chunk: ChunkReference = serde_json::from_value(chunk)
                .map_err(|e| IndexError::storage(format!("Failed to decode chunk: {}", e)))?;

            results.push(ScoredChunk::new(chunk, to_similarity(metric, distance)));
        }

        Ok(RetrievalResult::new(results))
    }

    async fn describe_index(&self, name: &str) -> Result<IndexStats, IndexError> {
        let table = table_name(name)?;
        let (dimension, metric) = Self::lookup(self.pool()?, name).await?;

        let row = sqlx::query(&format!("SELECT COUNT(*) AS count FROM {}", table))
            .fetch_one(self.pool()?)
            .await
            .map_err(|e| storage_error("Failed to count entries", e))?;
        let count: i64 = row
            .try_get("count")
            .map_err(|e| storage_error("Bad count row", e))?;

        Ok(IndexStats {
            name: name.to_string(),
            dimension,
            metric,
            count: count as usize,
        })
    }

    fn store_name(&self) -> &'static str {
        "pgvector"
    }
}

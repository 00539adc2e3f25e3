//! SQLite-backed result store.
//!
//! One `results` table keyed by a unique `content_hash`. Dedup relies on the
//! constraint: `INSERT ... ON CONFLICT(content_hash) DO NOTHING`, then a
//! re-fetch by hash. Several handles may open the same file; each one
//! serialises its own connection behind a mutex.

use chrono::{DateTime, Duration as TimeDelta, SecondsFormat, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, instrument};

use coherence_ir::{Circuit, GateRegistry, neutral};
use coherence_metrics::MetricsResult;

use crate::ResultStore;
use crate::error::{StoreError, StoreResult};
use crate::hash::ContentHash;
use crate::record::{Provenance, ResultSummary, StoreStats, StoredResult, clamp_page_size};

/// Busy timeout used by [`SqliteStore::open`].
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

const SELECT_RESULT: &str =
    "SELECT id, content_hash, circuit, metrics, source_format, notes, created_at FROM results";

/// SQLite-based result store.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    registry: Arc<GateRegistry>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) a store file with the default busy timeout.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with(path, DEFAULT_BUSY_TIMEOUT, GateRegistry::standard())
    }

    /// Open (or create) a store file.
    ///
    /// `registry` resolves gate names when stored circuits are read back.
    pub fn open_with(
        path: impl AsRef<Path>,
        busy_timeout: Duration,
        registry: GateRegistry,
    ) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        // WAL lets readers proceed while another handle writes.
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
        let store = Self::from_connection(conn, registry);
        store.init_schema()?;
        info!(path = %path.display(), "opened result store");
        Ok(store)
    }

    /// Create a private in-memory store.
    pub fn in_memory() -> StoreResult<Self> {
        let store = Self::from_connection(Connection::open_in_memory()?, GateRegistry::standard());
        store.init_schema()?;
        Ok(store)
    }

    fn from_connection(conn: Connection, registry: GateRegistry) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            registry: Arc::new(registry),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content_hash TEXT NOT NULL UNIQUE,
                circuit TEXT NOT NULL,
                metrics TEXT NOT NULL,
                num_qubits INTEGER NOT NULL,
                num_gates INTEGER NOT NULL,
                depth INTEGER NOT NULL,
                fidelity REAL NOT NULL,
                energy REAL NOT NULL,
                e1 REAL NOT NULL,
                qes REAL NOT NULL,
                source_format TEXT NOT NULL DEFAULT '',
                notes TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_results_created_at ON results(created_at);
            "#,
        )?;
        Self::add_provenance_columns(&conn)?;
        Ok(())
    }

    /// Files created before provenance was recorded lack its columns.
    fn add_provenance_columns(conn: &Connection) -> StoreResult<()> {
        let columns = {
            let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('results')")?;
            stmt.query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        if !columns.iter().any(|c| c == "source_format") {
            info!("adding provenance columns to result store");
            conn.execute_batch(
                r#"
                ALTER TABLE results ADD COLUMN source_format TEXT NOT NULL DEFAULT '';
                ALTER TABLE results ADD COLUMN notes TEXT;
                "#,
            )?;
        }
        Ok(())
    }

    fn fetch_by_hash(conn: &Connection, hash: &ContentHash) -> StoreResult<Option<RawRow>> {
        let sql = format!("{SELECT_RESULT} WHERE content_hash = ?1");
        Ok(conn
            .query_row(&sql, params![hash.as_str()], RawRow::from_row)
            .optional()?)
    }

    fn decode(&self, raw: RawRow) -> StoreResult<StoredResult> {
        let corrupt = |message: String| StoreError::Corrupt {
            id: raw.id,
            message,
        };
        let content_hash = raw
            .content_hash
            .parse()
            .map_err(|e: StoreError| corrupt(e.to_string()))?;
        let circuit = neutral::from_str(&raw.circuit, &self.registry)
            .map_err(|e| corrupt(format!("circuit: {e}")))?;
        let metrics = serde_json::from_str(&raw.metrics)
            .map_err(|e| corrupt(format!("metrics: {e}")))?;
        let created_at = DateTime::parse_from_rfc3339(&raw.created_at)
            .map_err(|e| corrupt(format!("created_at: {e}")))?
            .with_timezone(&Utc);
        Ok(StoredResult {
            id: raw.id,
            content_hash,
            circuit,
            metrics,
            source_format: raw.source_format,
            notes: raw.notes,
            created_at,
        })
    }
}

/// Undecoded columns of one row.
struct RawRow {
    id: i64,
    content_hash: String,
    circuit: String,
    metrics: String,
    source_format: String,
    notes: Option<String>,
    created_at: String,
}

impl RawRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content_hash: row.get(1)?,
            circuit: row.get(2)?,
            metrics: row.get(3)?,
            source_format: row.get(4)?,
            notes: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

impl ResultStore for SqliteStore {
    #[instrument(skip_all)]
    fn put(
        &self,
        circuit: &Circuit,
        metrics: &MetricsResult,
        provenance: &Provenance,
    ) -> StoreResult<StoredResult> {
        let canonical = neutral::to_string(circuit)?;
        let hash = ContentHash::of_bytes(canonical.as_bytes());
        let metrics_json = serde_json::to_string(metrics)
            .map_err(|e| StoreError::Unavailable(format!("cannot encode metrics: {e}")))?;

        let conn = self.lock()?;
        let inserted = conn.execute(
            r#"
            INSERT INTO results (content_hash, circuit, metrics, num_qubits, num_gates,
                                 depth, fidelity, energy, e1, qes, source_format,
                                 notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(content_hash) DO NOTHING
            "#,
            params![
                hash.as_str(),
                canonical,
                metrics_json,
                metrics.num_qubits,
                metrics.num_gates as i64,
                metrics.depth as i64,
                metrics.fidelity,
                metrics.energy,
                metrics.e1,
                metrics.qes,
                provenance.source_format,
                provenance.notes,
                timestamp(Utc::now()),
            ],
        );
        match inserted {
            Ok(0) => debug!(hash = %hash, "result already stored"),
            Ok(_) => debug!(hash = %hash, "stored new result"),
            // Another writer won the race between our statement and the constraint check.
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                debug!(hash = %hash, "insert lost a race; re-fetching");
            }
            Err(e) => return Err(e.into()),
        }

        let raw = Self::fetch_by_hash(&conn, &hash)?.ok_or_else(|| {
            StoreError::Unavailable(format!("row for {hash} vanished after insert"))
        })?;
        drop(conn);
        self.decode(raw)
    }

    fn get(&self, id: i64) -> StoreResult<StoredResult> {
        let raw = {
            let conn = self.lock()?;
            let sql = format!("{SELECT_RESULT} WHERE id = ?1");
            conn.query_row(&sql, params![id], RawRow::from_row)
                .optional()?
        };
        self.decode(raw.ok_or(StoreError::NotFound(id))?)
    }

    fn find_by_hash(&self, hash: &ContentHash) -> StoreResult<Option<StoredResult>> {
        let raw = Self::fetch_by_hash(&*self.lock()?, hash)?;
        raw.map(|r| self.decode(r)).transpose()
    }

    fn list(&self, page: usize, page_size: usize) -> StoreResult<Vec<ResultSummary>> {
        let page_size = clamp_page_size(page_size);
        let offset = i64::try_from(page.saturating_mul(page_size)).unwrap_or(i64::MAX);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, content_hash, num_qubits, num_gates, depth, qes, source_format,
                   created_at
            FROM results ORDER BY id LIMIT ?1 OFFSET ?2
            "#,
        )?;
        let mut rows = stmt.query(params![page_size as i64, offset])?;

        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            let corrupt = |message: String| StoreError::Corrupt { id, message };
            let hash: String = row.get(1)?;
            let created_at: String = row.get(7)?;
            summaries.push(ResultSummary {
                id,
                content_hash: hash.parse().map_err(|e: StoreError| corrupt(e.to_string()))?,
                num_qubits: row.get(2)?,
                num_gates: to_count(row.get(3)?),
                depth: to_count(row.get(4)?),
                qes: row.get(5)?,
                source_format: row.get(6)?,
                created_at: DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| corrupt(format!("created_at: {e}")))?
                    .with_timezone(&Utc),
            });
        }
        Ok(summaries)
    }

    #[instrument(skip_all)]
    fn clear(&self) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM results", [])?;
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'results'", [])?;
        tx.commit()?;
        info!(removed, "cleared result store");
        Ok(removed)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let cutoff = timestamp(Utc::now() - TimeDelta::hours(24));
        let conn = self.lock()?;
        let mut stats = conn.query_row(
            r#"
            SELECT COUNT(*), AVG(qes), AVG(fidelity), AVG(depth), MAX(depth),
                   COALESCE(SUM(created_at >= ?1), 0)
            FROM results
            "#,
            params![cutoff],
            |row| {
                Ok(StoreStats {
                    total_records: to_count(row.get(0)?),
                    average_qes: row.get(1)?,
                    average_fidelity: row.get(2)?,
                    average_depth: row.get(3)?,
                    max_depth: row.get::<_, Option<i64>>(4)?.map(to_count),
                    recent_24h: to_count(row.get(5)?),
                    format_distribution: BTreeMap::new(),
                })
            },
        )?;

        let mut stmt =
            conn.prepare("SELECT source_format, COUNT(*) FROM results GROUP BY source_format")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            stats
                .format_distribution
                .insert(row.get(0)?, to_count(row.get(1)?));
        }
        Ok(stats)
    }

    fn count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(to_count(n))
    }
}

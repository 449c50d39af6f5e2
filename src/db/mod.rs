// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! Database module for persistent storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::model::{BiometricReading, ProximityEvent};

/// Storage failures, split so callers can tell a dead store from a bad row
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A single query or write failed
    #[error("storage query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A persisted row could not be decoded
    #[error("malformed row in store: {0}")]
    Malformed(#[from] chrono::ParseError),
}

/// Append/query store for readings and pushed sensor events.
///
/// The engine and the API both talk to this trait, never to a concrete
/// backend, so tests can substitute an in-memory store.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Append one reading, returning its row id
    async fn save(&self, reading: &BiometricReading) -> Result<i64, StoreError>;

    /// Most recent reading by timestamp, `None` while the store is empty
    async fn latest(&self) -> Result<Option<BiometricReading>, StoreError>;

    /// Up to `limit` most recent readings, newest first
    async fn history(&self, limit: usize) -> Result<Vec<BiometricReading>, StoreError>;

    /// Append one externally pushed proximity event
    async fn save_sensor_event(&self, event: &ProximityEvent) -> Result<i64, StoreError>;
}

/// SQLite-backed store
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database.
    ///
    /// Any failure here is [`StoreError::Unavailable`]; the caller must not
    /// start the simulator against a store that never opened.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        // Create parent directories
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }

        let conn = Connection::open(&config.path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        // Configure SQLite for performance
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000;
            PRAGMA temp_store = MEMORY;
        "#,
        )
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.create_tables()?;

        info!("Database opened at {:?}", config.path);
        Ok(store)
    }

    /// Open a transient in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.create_tables()?;
        Ok(store)
    }

    /// Create database tables
    fn create_tables(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Generated biometric readings
            CREATE TABLE IF NOT EXISTS biometric_readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                heart_rate INTEGER NOT NULL,
                steps INTEGER NOT NULL,
                oxygen_saturation REAL NOT NULL,
                body_temperature REAL NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_readings_timestamp ON biometric_readings(timestamp);

            -- Externally pushed sensor events
            CREATE TABLE IF NOT EXISTS sensor_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sensor_id TEXT NOT NULL,
                distance_cm REAL NOT NULL,
                timestamp TEXT NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_events_sensor ON sensor_events(sensor_id);
        "#,
        )?;

        Ok(())
    }
}

type ReadingRow = (String, u16, i64, f64, f64);

fn decode_reading(row: ReadingRow) -> Result<BiometricReading, StoreError> {
    let (timestamp, heart_rate, steps, oxygen_saturation, body_temperature) = row;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)?.with_timezone(&Utc);

    Ok(BiometricReading {
        heart_rate,
        steps: steps as u64,
        oxygen_saturation,
        body_temperature,
        timestamp,
    })
}

#[async_trait]
impl ReadingStore for SqliteStore {
    async fn save(&self, reading: &BiometricReading) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO biometric_readings (timestamp, heart_rate, steps, oxygen_saturation, body_temperature)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                reading.timestamp.to_rfc3339(),
                reading.heart_rate,
                reading.steps as i64,
                reading.oxygen_saturation,
                reading.body_temperature
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    async fn latest(&self) -> Result<Option<BiometricReading>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT timestamp, heart_rate, steps, oxygen_saturation, body_temperature
             FROM biometric_readings ORDER BY timestamp DESC, id DESC LIMIT 1",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        );

        match result {
            Ok(row) => Ok(Some(decode_reading(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn history(&self, limit: usize) -> Result<Vec<BiometricReading>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT timestamp, heart_rate, steps, oxygen_saturation, body_temperature
             FROM biometric_readings ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?;

        let mut readings = Vec::new();
        for row in rows {
            readings.push(decode_reading(row?)?);
        }

        Ok(readings)
    }

    async fn save_sensor_event(&self, event: &ProximityEvent) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO sensor_events (sensor_id, distance_cm, timestamp) VALUES (?1, ?2, ?3)",
            params![
                event.sensor_id,
                event.distance_cm,
                event.timestamp.to_rfc3339()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(heart_rate: u16, steps: u64) -> BiometricReading {
        BiometricReading::new(heart_rate, steps, 98.2, 36.6)
    }

    #[tokio::test]
    async fn test_latest_on_empty_store_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_latest_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let saved = reading(72, 1200);

        let id = store.save(&saved).await.unwrap();
        assert!(id > 0);

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.heart_rate, 72);
        assert_eq!(latest.steps, 1200);
        assert_eq!(latest.oxygen_saturation, 98.2);
        assert_eq!(latest.body_temperature, 36.6);
        assert_eq!(latest.timestamp, saved.timestamp);
    }

    #[tokio::test]
    async fn test_history_newest_first_and_bounded() {
        let store = SqliteStore::open_in_memory().unwrap();

        for i in 0..5u64 {
            store.save(&reading(70 + i as u16, i * 10)).await.unwrap();
        }

        let history = store.history(3).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].heart_rate, 74);
        assert_eq!(history[1].heart_rate, 73);
        assert_eq!(history[2].heart_rate, 72);
    }

    #[tokio::test]
    async fn test_sensor_event_persists() {
        let store = SqliteStore::open_in_memory().unwrap();
        let event = ProximityEvent {
            sensor_id: "proximidad_01".to_string(),
            distance_cm: 17.3,
            timestamp: Utc::now(),
        };

        let id = store.save_sensor_event(&event).await.unwrap();
        assert!(id > 0);
    }
}

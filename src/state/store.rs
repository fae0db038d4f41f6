//! Reads and writes the two state files.
//!
//! Writes go through a temp file and rename so a crash mid-write never
//! leaves a truncated queue behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error::{MoltError, Result};
use crate::state::PendingQueue;

const QUEUE_FILE: &str = "pending.json";
const MARKER_FILE: &str = "last_run";

pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn queue_path(&self) -> PathBuf {
        self.dir.join(QUEUE_FILE)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.dir.join(MARKER_FILE)
    }

    /// Missing or blank file reads as an empty queue.
    pub fn load_queue(&self) -> Result<PendingQueue> {
        let path = self.queue_path();
        if !path.exists() {
            return Ok(PendingQueue::new());
        }
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(PendingQueue::new());
        }
        serde_json::from_str(&raw).map_err(|err| {
            MoltError::State(format!("pending queue parse {}: {err}", path.display()))
        })
    }

    pub fn save_queue(&self, queue: &PendingQueue) -> Result<()> {
        let json = serde_json::to_string_pretty(queue)?;
        self.write_atomic(&self.queue_path(), &json)
    }

    /// Missing or blank marker means the tool has never run.
    pub fn last_run(&self) -> Result<Option<DateTime<Utc>>> {
        let path = self.marker_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|err| {
                MoltError::State(format!("last-run marker parse {}: {err}", path.display()))
            })
    }

    pub fn last_run_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.last_run()?.map(|ts| ts.date_naive()))
    }

    pub fn stamp_last_run(&self, now: DateTime<Utc>) -> Result<()> {
        let line = now.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.write_atomic(&self.marker_path(), &line)
    }

    fn write_atomic(&self, path: &Path, payload: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, payload)?;
        match fs::rename(&temp_path, path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                fs::remove_file(path)?;
                if let Err(err) = fs::rename(&temp_path, path) {
                    let _ = fs::remove_file(&temp_path);
                    return Err(MoltError::Io(err));
                }
                Ok(())
            }
            Err(err) => Err(MoltError::Io(err)),
        }
    }
}

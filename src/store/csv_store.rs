use std::{
    future::Future,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, warn};

use crate::registry::HabitRegistry;

use super::entry::{HabitEntry, HabitRecord};

/// Interface for abstracting the habit log store.
pub trait RecordStore {
    /// Creates an empty log with a header row unless one already exists.
    fn ensure(&self) -> impl Future<Output = Result<()>> + Send;

    /// Appends a single entry. Existing rows are never touched, and an entry
    /// for an already logged date lands next to the old ones.
    fn append(&self, entry: &HabitEntry) -> impl Future<Output = Result<()>> + Send;

    /// Reads every stored row, sorted ascending by date string. Rows sharing
    /// a date keep their on-disk order.
    fn load_all(&self) -> impl Future<Output = Result<Vec<HabitRecord>>> + Send;
}

impl<T: Deref> RecordStore for T
where
    T::Target: RecordStore,
{
    fn ensure(&self) -> impl Future<Output = Result<()>> + Send {
        self.deref().ensure()
    }

    fn append(&self, entry: &HabitEntry) -> impl Future<Output = Result<()>> + Send {
        self.deref().append(entry)
    }

    fn load_all(&self) -> impl Future<Output = Result<Vec<HabitRecord>>> + Send {
        self.deref().load_all()
    }
}

/// The main realization of [RecordStore]. One UTF-8 CSV file, a fixed header
/// row, one data row per logged entry.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
    registry: HabitRegistry,
}

impl CsvRecordStore {
    pub fn new(path: PathBuf, registry: HabitRegistry) -> Self {
        Self { path, registry }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header row derived from the registry, `date` first.
    fn header(&self) -> String {
        let mut header = String::from("date");
        for def in self.registry.habits() {
            header.push(',');
            header.push_str(&def.key);
        }
        header
    }
}

impl RecordStore for CsvRecordStore {
    async fn ensure(&self) -> Result<()> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        debug!("creating habit log at {:?}", self.path);
        let mut file = File::create(&self.path)
            .await
            .with_context(|| format!("creating habit log {:?}", self.path))?;
        file.write_all(format!("{}\n", self.header()).as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }

    async fn append(&self, entry: &HabitEntry) -> Result<()> {
        self.ensure().await?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("opening habit log {:?} for append", self.path))?;
        file.write_all(format!("{}\n", entry.to_row()).as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<HabitRecord>> {
        self.ensure().await?;
        let file = File::open(&self.path)
            .await
            .with_context(|| format!("opening habit log {:?}", self.path))?;
        let mut lines = BufReader::new(file).lines();

        let header = lines.next_line().await?;
        if header.as_deref().map(str::trim) != Some(self.header().as_str()) {
            // The file is still read positionally against the registry order.
            warn!(
                "header of {:?} does not match the configured habits",
                self.path
            );
        }

        let mut records = Vec::new();
        while let Some(line) = lines.next_line().await? {
            if let Some(record) = HabitRecord::parse_row(&line, self.registry.len()) {
                records.push(record);
            }
        }

        // Stable sort keeps rows logged twice for one day in append order.
        records.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::registry::{HabitRegistry, HabitValue};
    use crate::store::entry::HabitEntry;

    use super::{CsvRecordStore, RecordStore};

    fn entry(date: &str, sleep: f64, steps: i64, water: i64) -> HabitEntry {
        HabitEntry::new(
            date,
            vec![
                HabitValue::Real(sleep),
                HabitValue::Integer(steps),
                HabitValue::Integer(water),
            ],
        )
    }

    #[tokio::test]
    async fn test_ensure_writes_header_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("habit_logs.csv");
        let store = CsvRecordStore::new(path.clone(), HabitRegistry::standard());

        store.ensure().await?;
        store.ensure().await?;

        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents, "date,sleep,steps,water\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_append_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvRecordStore::new(
            dir.path().join("habit_logs.csv"),
            HabitRegistry::standard(),
        );

        store.append(&entry("2025-08-18", 7.5, 9000, 6)).await?;
        store.append(&entry("2025-08-19", 9.0, 4000, 8)).await?;
        store.append(&entry("2025-08-20", 6.0, 12000, 5)).await?;

        let records = store.load_all().await?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, "2025-08-18");
        assert_eq!(records[0].values, vec![Some(7.5), Some(9000.0), Some(6.0)]);
        assert_eq!(records[2].values, vec![Some(6.0), Some(12000.0), Some(5.0)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_sorts_by_date_string() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("habit_logs.csv");
        std::fs::write(
            &path,
            "date,sleep,steps,water\n\
             2025-08-20,6,12000,5\n\
             2025-08-18,7.5,9000,6\n\
             2025-08-19,9,4000,8\n",
        )?;
        let store = CsvRecordStore::new(path, HabitRegistry::standard());

        let records = store.load_all().await?;
        let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-08-18", "2025-08-19", "2025-08-20"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_dates_are_all_kept_in_append_order() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvRecordStore::new(
            dir.path().join("habit_logs.csv"),
            HabitRegistry::standard(),
        );

        store.append(&entry("2025-08-20", 6.0, 4000, 4)).await?;
        store.append(&entry("2025-08-20", 8.0, 9000, 8)).await?;

        let records = store.load_all().await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].values[0], Some(6.0));
        assert_eq!(records[1].values[0], Some(8.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_rows_degrade_to_missing_values() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("habit_logs.csv");
        std::fs::write(
            &path,
            "date,sleep,steps,water\n\
             2025-08-18,oops,9000,\n\
             \n\
             2025-08-19,8\n",
        )?;
        let store = CsvRecordStore::new(path, HabitRegistry::standard());

        let records = store.load_all().await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].values, vec![None, Some(9000.0), None]);
        assert_eq!(records[1].values, vec![Some(8.0), None, None]);
        Ok(())
    }

    #[tokio::test]
    async fn test_fresh_store_loads_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvRecordStore::new(
            dir.path().join("fresh").join("habit_logs.csv"),
            HabitRegistry::standard(),
        );

        let records = store.load_all().await?;
        assert!(records.is_empty());
        Ok(())
    }
}

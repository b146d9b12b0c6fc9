//! Persistence Layer for Registry State
//!
//! Uses sled to persist the frenzy registry across restarts. State is saved
//! periodically and on shutdown; completed frenzies stay queryable forever,
//! so records are only ever added or overwritten, never deleted.

use std::path::Path;

use frenzy_program::{Frenzy, FrenzyRegistry};
use serde::{Deserialize, Serialize};
use sled::Db;

/// Metadata about the chain state
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChainMetadata {
    /// Current slot (block height)
    pub slot: u64,
    /// Current blockhash
    pub blockhash: [u8; 32],
    /// Number of frenzies ever created
    pub frenzy_count: u64,
    /// Last save timestamp
    pub last_save_ts: i64,
}

/// Persistent storage for the frenzy chain
pub struct PersistentStore {
    /// Sled database instance
    db: Db,
    /// Frenzy records tree
    frenzies: sled::Tree,
    /// Metadata tree
    metadata: sled::Tree,
}

impl PersistentStore {
    /// Open or create a persistent store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let db = sled::open(&path)?;
        let frenzies = db.open_tree("frenzies")?;
        let metadata = db.open_tree("metadata")?;

        tracing::info!("Opened persistent store at {:?}", path.as_ref());

        Ok(Self {
            db,
            frenzies,
            metadata,
        })
    }

    /// Store one frenzy record
    pub fn store_frenzy(&self, frenzy: &Frenzy) -> anyhow::Result<()> {
        let bytes = bincode::serialize(frenzy)?;
        // Big-endian keys keep sled iteration in id order.
        self.frenzies.insert(frenzy.id.to_be_bytes(), bytes)?;
        Ok(())
    }

    /// Get one frenzy record
    pub fn get_frenzy(&self, id: u64) -> anyhow::Result<Option<Frenzy>> {
        match self.frenzies.get(id.to_be_bytes())? {
            Some(bytes) => {
                let frenzy: Frenzy = bincode::deserialize(&bytes)?;
                Ok(Some(frenzy))
            }
            None => Ok(None),
        }
    }

    /// Get all frenzy records, in id order
    pub fn get_all_frenzies(&self) -> anyhow::Result<Vec<Frenzy>> {
        let mut records = Vec::new();
        for result in self.frenzies.iter() {
            let (_, value) = result?;
            records.push(bincode::deserialize(&value)?);
        }
        Ok(records)
    }

    /// Save chain metadata
    pub fn save_metadata(&self, metadata: &ChainMetadata) -> anyhow::Result<()> {
        let bytes = bincode::serialize(metadata)?;
        self.metadata.insert("chain", bytes)?;
        Ok(())
    }

    /// Load chain metadata
    pub fn load_metadata(&self) -> anyhow::Result<Option<ChainMetadata>> {
        match self.metadata.get("chain")? {
            Some(bytes) => {
                let metadata: ChainMetadata = bincode::deserialize(&bytes)?;
                Ok(Some(metadata))
            }
            None => Ok(None),
        }
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> anyhow::Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Number of stored frenzy records
    pub fn frenzy_record_count(&self) -> usize {
        self.frenzies.len()
    }

    /// Clear all data (for testing)
    pub fn clear(&self) -> anyhow::Result<()> {
        self.frenzies.clear()?;
        self.metadata.clear()?;
        Ok(())
    }
}

/// Extension trait to add persistence to the registry store
pub trait RegistryPersistence {
    /// Save the registry to persistent storage
    fn save_to_disk(&self, store: &PersistentStore) -> anyhow::Result<usize>;

    /// Load the registry from persistent storage
    fn load_from_disk(&self, store: &PersistentStore) -> anyhow::Result<usize>;
}

impl RegistryPersistence for crate::RegistryStore {
    fn save_to_disk(&self, store: &PersistentStore) -> anyhow::Result<usize> {
        let snapshot = self.snapshot();
        let mut count = 0;

        for frenzy in snapshot.all_frenzies() {
            store.store_frenzy(frenzy)?;
            count += 1;
        }

        store.flush()?;
        tracing::info!("Saved {} frenzies to disk", count);

        Ok(count)
    }

    fn load_from_disk(&self, store: &PersistentStore) -> anyhow::Result<usize> {
        let records = store.get_all_frenzies()?;
        let count = records.len();

        // The counter equals the number of records: frenzies are never
        // destroyed. Metadata wins if present (it is saved atomically with
        // the records).
        let frenzy_count = match store.load_metadata()? {
            Some(metadata) => metadata.frenzy_count,
            None => count as u64,
        };

        self.restore(FrenzyRegistry::from_records(records, frenzy_count));
        tracing::info!("Loaded {} frenzies from disk", count);

        Ok(count)
    }
}

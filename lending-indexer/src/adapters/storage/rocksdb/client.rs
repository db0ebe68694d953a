//! RocksDB client implementation

use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use tracing::{debug, info};

use crate::config::RocksDBConfig;
use crate::core::{
    Entity, EntityKind, IndexerError, IndexerResult, StorageError, StorageHealth, StoragePort,
};

/// RocksDB-backed entity store, one column family per entity kind.
/// Values are JSON so arbitrary-precision decimals survive unchanged.
pub struct RocksDBStore {
    db: DB,
}

impl RocksDBStore {
    /// Open RocksDB with the specified configuration
    pub async fn open(config: &RocksDBConfig) -> IndexerResult<Self> {
        let path = &config.path;

        // Create directory if it doesn't exist
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(config.max_open_files);
        opts.set_write_buffer_size(config.write_buffer_size_mb * 1024 * 1024);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);

        if config.enable_compression {
            opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        }

        let cache = rocksdb::Cache::new_lru_cache(config.block_cache_size_mb * 1024 * 1024);
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_block_cache(&cache);
        opts.set_block_based_table_factory(&block_opts);

        let cfs: Vec<ColumnFamilyDescriptor> = EntityKind::ALL
            .iter()
            .map(|kind| {
                let mut cf_opts = Options::default();
                cf_opts.set_max_write_buffer_number(config.max_write_buffer_number);
                ColumnFamilyDescriptor::new(kind.as_str(), cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        info!("RocksDB opened successfully at: {:?}", path);

        Ok(Self { db })
    }

    fn cf(&self, kind: EntityKind) -> IndexerResult<&ColumnFamily> {
        self.db
            .cf_handle(kind.as_str())
            .ok_or_else(|| IndexerError::Storage(StorageError::MissingColumnFamily(kind.to_string())))
    }

    /// Exact number of entities stored for `kind`. Scans the whole column family.
    pub fn count(&self, kind: EntityKind) -> IndexerResult<usize> {
        let cf = self.cf(kind)?;
        let mut total = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item?;
            total += 1;
        }
        Ok(total)
    }

    /// RocksDB's own key estimate for `kind`, read from table properties
    /// without iterating. Overwrites still in the memtable count twice.
    pub fn approximate_count(&self, kind: EntityKind) -> IndexerResult<u64> {
        let cf = self.cf(kind)?;
        Ok(self
            .db
            .property_int_value_cf(cf, "rocksdb.estimate-num-keys")?
            .unwrap_or(0))
    }

    /// Check if database is healthy (can perform basic operations)
    pub fn check_stats(&self) -> IndexerResult<()> {
        self.db.property_value("rocksdb.stats")?;
        Ok(())
    }
}

#[async_trait]
impl StoragePort for RocksDBStore {
    async fn load<E>(&self, id: &str) -> IndexerResult<Option<E>>
    where
        E: Entity,
    {
        let cf = self.cf(E::KIND)?;
        match self.db.get_cf(cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save<E>(&self, entity: &E) -> IndexerResult<()>
    where
        E: Entity,
    {
        let cf = self.cf(E::KIND)?;
        let serialized = serde_json::to_vec(entity)?;
        self.db.put_cf(cf, entity.id().as_bytes(), serialized)?;

        debug!("Put {} in CF {}", entity.id(), E::KIND);
        Ok(())
    }

    async fn save_pair<A, B>(&self, first: &A, second: &B) -> IndexerResult<()>
    where
        A: Entity,
        B: Entity,
    {
        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(A::KIND)?, first.id().as_bytes(), serde_json::to_vec(first)?);
        batch.put_cf(self.cf(B::KIND)?, second.id().as_bytes(), serde_json::to_vec(second)?);
        self.db.write(batch)?;

        debug!("Put {} in CF {} with {} in CF {}", first.id(), A::KIND, second.id(), B::KIND);
        Ok(())
    }

    async fn health_check(&self) -> IndexerResult<StorageHealth> {
        self.check_stats()?;
        Ok(StorageHealth::healthy("rocksdb"))
    }
}

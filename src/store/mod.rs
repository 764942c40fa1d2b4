//! Record stores - concurrent CRUD over identity → record.
//!
//! [`RecordStore`] is the contract every façade programs against;
//! [`InMemoryStore`] is the process-local implementation, a cheap `Clone`
//! handle around one reader-writer lock.
//!
//! ## Deleted records
//!
//! `delete` is a soft delete: it stamps `deleted_at` and leaves the record
//! in the map. Deleted records are hidden from `get`, `get_all`, `update`,
//! `delete`, `find` and `len`, all of which treat them as `NotFound` or skip
//! them. Use [`RecordStore::list`] with `include_deleted` or
//! [`RecordStore::get_with_deleted`] to read tombstones.
//!
//! ## Example
//!
//! ```ignore
//! use skywatch::{Field, InMemoryStore, RecordStore, Weather, WeatherPatch};
//!
//! let store = InMemoryStore::<Weather>::new();
//! let id = store.create(Weather::new("Oslo", 5.0))?;
//! store.update(&id, WeatherPatch { temperature: Field::Present(6.0), ..Default::default() })?;
//! assert_eq!(store.get(&id)?.payload.temperature, 6.0);
//! store.delete(&id)?;
//! assert!(store.get(&id).unwrap_err().is_not_found());
//! ```

mod error;
mod in_memory;

pub use error::StoreError;
pub use in_memory::InMemoryStore;

use crate::record::{Payload, Record, RecordId};

/// Options for [`RecordStore::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Also return soft-deleted records.
    pub include_deleted: bool,
}

impl ListQuery {
    pub fn with_deleted() -> Self {
        Self {
            include_deleted: true,
        }
    }
}

/// Outcome of [`RecordStore::upsert_where`].
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert<P> {
    Created(Record<P>),
    Updated(Record<P>),
}

impl<P> Upsert<P> {
    pub fn record(&self) -> &Record<P> {
        match self {
            Upsert::Created(record) | Upsert::Updated(record) => record,
        }
    }

    pub fn into_record(self) -> Record<P> {
        match self {
            Upsert::Created(record) | Upsert::Updated(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }
}

/// Thread-safe CRUD over records of one payload type.
///
/// Every operation is synchronous and atomic with respect to the store
/// lock. Nothing retries internally; errors go straight back to the caller.
pub trait RecordStore<P: Payload>: Send + Sync {
    /// Validate and insert a new record. Returns its freshly assigned id.
    fn create(&self, payload: P) -> Result<RecordId, StoreError>;

    /// Fetch a live record.
    fn get(&self, id: &RecordId) -> Result<Record<P>, StoreError>;

    /// Fetch a record whether or not it has been deleted.
    fn get_with_deleted(&self, id: &RecordId) -> Result<Record<P>, StoreError>;

    /// Snapshot of records matching `query`, in no particular order.
    fn list(&self, query: &ListQuery) -> Result<Vec<Record<P>>, StoreError>;

    /// Snapshot of all live records, in no particular order.
    fn get_all(&self) -> Result<Vec<Record<P>>, StoreError> {
        self.list(&ListQuery::default())
    }

    /// Merge the present fields of `patch` into a live record and refresh
    /// `updated_at`. An empty patch is rejected.
    fn update(&self, id: &RecordId, patch: P::Patch) -> Result<Record<P>, StoreError>;

    /// Soft delete: stamp `deleted_at`, keep the record.
    fn delete(&self, id: &RecordId) -> Result<Record<P>, StoreError>;

    /// First live record whose payload matches `predicate`.
    fn find(&self, predicate: &dyn Fn(&P) -> bool) -> Result<Option<Record<P>>, StoreError>;

    /// Under a single write lock, apply `patch` to the first live record
    /// matching `predicate`, or create a record from `payload` if none does.
    fn upsert_where(
        &self,
        predicate: &dyn Fn(&P) -> bool,
        patch: P::Patch,
        payload: P,
    ) -> Result<Upsert<P>, StoreError>;

    /// Number of live records.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

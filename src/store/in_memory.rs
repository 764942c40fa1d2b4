//! InMemoryStore - HashMap-backed record store shared by every façade.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use super::{ListQuery, RecordStore, StoreError, Upsert};
use crate::clock::{Clock, SystemClock};
use crate::record::{Patch, Payload, Record, RecordId};

/// In-memory record store backed by a HashMap behind one `RwLock`.
///
/// Reads take the shared lock, writes the exclusive lock; there is no
/// per-record locking. Clone-friendly via Arc: clones are handles onto the
/// same map.
pub struct InMemoryStore<P, C = SystemClock> {
    storage: Arc<RwLock<HashMap<RecordId, Record<P>>>>,
    clock: Arc<C>,
}

impl<P, C> Clone for InMemoryStore<P, C> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<P, C> fmt::Debug for InMemoryStore<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.storage.read().map(|s| s.len()).ok();
        f.debug_struct("InMemoryStore").field("records", &len).finish()
    }
}

impl<P: Payload> Default for InMemoryStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> InMemoryStore<P> {
    /// Create a new empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<P: Payload, C: Clock> InMemoryStore<P, C> {
    /// Create a new empty store that reads time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            clock: Arc::new(clock),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<RecordId, Record<P>>>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<RecordId, Record<P>>>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))
    }
}

fn live<'a, P: Payload>(
    storage: &'a mut HashMap<RecordId, Record<P>>,
    id: &RecordId,
) -> Result<&'a mut Record<P>, StoreError> {
    storage
        .get_mut(id)
        .filter(|record| !record.is_deleted())
        .ok_or_else(|| StoreError::not_found(P::KIND, *id))
}

fn replace<P: Payload>(record: &mut Record<P>, payload: P, now: chrono::DateTime<chrono::Utc>) {
    record.payload = payload;
    record.updated_at = now;
}

/// Fails when another live record already holds `payload`'s unique key.
fn check_unique<P: Payload>(
    storage: &HashMap<RecordId, Record<P>>,
    payload: &P,
    except: Option<RecordId>,
) -> Result<(), StoreError> {
    let Some(key) = payload.unique_key() else {
        return Ok(());
    };
    let taken = storage.values().any(|record| {
        Some(record.id) != except
            && !record.is_deleted()
            && record.payload.unique_key() == Some(key)
    });
    if taken {
        return Err(StoreError::conflict(P::KIND, key));
    }
    Ok(())
}

/// Merge `patch` into a copy of the live record `id`, checking the result
/// against the unique key before anything is written.
fn patched<P: Payload>(
    storage: &HashMap<RecordId, Record<P>>,
    id: &RecordId,
    patch: P::Patch,
) -> Result<P, StoreError> {
    let mut payload = storage
        .get(id)
        .filter(|record| !record.is_deleted())
        .map(|record| record.payload.clone())
        .ok_or_else(|| StoreError::not_found(P::KIND, *id))?;
    check_patch::<P>(id, &patch)?;
    patch.apply(&mut payload);
    check_unique(storage, &payload, Some(*id))?;
    Ok(payload)
}

fn check_patch<P: Payload>(id: &RecordId, patch: &P::Patch) -> Result<(), StoreError> {
    if patch.is_empty() {
        return Err(StoreError::invalid_argument(format!(
            "update for {} {} carries no fields",
            P::KIND,
            id
        )));
    }
    patch.validate().map_err(StoreError::InvalidArgument)
}

impl<P: Payload, C: Clock> RecordStore<P> for InMemoryStore<P, C> {
    fn create(&self, payload: P) -> Result<RecordId, StoreError> {
        payload.validate().map_err(StoreError::InvalidArgument)?;

        let id = RecordId::new();
        {
            let mut storage = self.write()?;
            check_unique(&*storage, &payload, None)?;
            let record = Record::new(id, payload, self.clock.now());
            storage.insert(id, record);
        }

        info!(kind = P::KIND, %id, "record created");
        Ok(id)
    }

    fn get(&self, id: &RecordId) -> Result<Record<P>, StoreError> {
        let storage = self.read()?;
        storage
            .get(id)
            .filter(|record| !record.is_deleted())
            .cloned()
            .ok_or_else(|| StoreError::not_found(P::KIND, *id))
    }

    fn get_with_deleted(&self, id: &RecordId) -> Result<Record<P>, StoreError> {
        let storage = self.read()?;
        storage
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(P::KIND, *id))
    }

    fn list(&self, query: &ListQuery) -> Result<Vec<Record<P>>, StoreError> {
        let storage = self.read()?;
        let records: Vec<Record<P>> = storage
            .values()
            .filter(|record| query.include_deleted || !record.is_deleted())
            .cloned()
            .collect();
        debug!(kind = P::KIND, count = records.len(), ?query, "records listed");
        Ok(records)
    }

    fn update(&self, id: &RecordId, patch: P::Patch) -> Result<Record<P>, StoreError> {
        let updated = {
            let mut storage = self.write()?;
            let payload = patched(&*storage, id, patch)?;
            let record = live(&mut storage, id)?;
            replace(record, payload, self.clock.now());
            record.clone()
        };

        info!(kind = P::KIND, %id, "record updated");
        Ok(updated)
    }

    fn delete(&self, id: &RecordId) -> Result<Record<P>, StoreError> {
        let deleted = {
            let mut storage = self.write()?;
            let record = live(&mut storage, id)?;
            record.deleted_at = Some(self.clock.now());
            record.clone()
        };

        info!(kind = P::KIND, %id, "record deleted");
        Ok(deleted)
    }

    fn find(&self, predicate: &dyn Fn(&P) -> bool) -> Result<Option<Record<P>>, StoreError> {
        let storage = self.read()?;
        Ok(storage
            .values()
            .find(|record| !record.is_deleted() && predicate(&record.payload))
            .cloned())
    }

    fn upsert_where(
        &self,
        predicate: &dyn Fn(&P) -> bool,
        patch: P::Patch,
        payload: P,
    ) -> Result<Upsert<P>, StoreError> {
        let mut storage = self.write()?;
        let now = self.clock.now();

        let existing = storage
            .values()
            .find(|record| !record.is_deleted() && predicate(&record.payload))
            .map(|record| record.id);

        if let Some(id) = existing {
            let payload = patched(&*storage, &id, patch)?;
            let record = live(&mut storage, &id)?;
            replace(record, payload, now);
            info!(kind = P::KIND, %id, "record updated");
            return Ok(Upsert::Updated(record.clone()));
        }

        payload.validate().map_err(StoreError::InvalidArgument)?;
        check_unique(&*storage, &payload, None)?;
        let id = RecordId::new();
        let record = Record::new(id, payload, now);
        storage.insert(id, record.clone());
        info!(kind = P::KIND, %id, "record created");
        Ok(Upsert::Created(record))
    }

    fn len(&self) -> Result<usize, StoreError> {
        let storage = self.read()?;
        Ok(storage.values().filter(|record| !record.is_deleted()).count())
    }
}

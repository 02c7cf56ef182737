//! Needs catalog (cupboard) persistence.

use std::collections::BTreeMap;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::domain::Need;
use crate::errors::AppResult;
use crate::infra::snapshot;

/// Cupboard repository trait for dependency injection.
#[cfg_attr(test, mockall::automock)]
pub trait CupboardRepository: Send + Sync {
    /// Create a need with the next sequential id; the candidate's own id
    /// is discarded.
    fn create_need(&self, need: Need) -> AppResult<Need>;

    /// Store the need under the given id, forcing the record's id field to
    /// match. The write is unconditional; the existence check belongs to
    /// the caller.
    fn update_need(&self, id: u32, need: Need) -> AppResult<Need>;

    /// Delete a need by id; false if the id was absent.
    fn delete_need(&self, id: u32) -> AppResult<bool>;

    /// Get a need by id.
    fn get_need(&self, id: u32) -> AppResult<Option<Need>>;

    /// Get all needs, ordered by id.
    fn get_all_needs(&self) -> AppResult<Vec<Need>>;

    /// Needs whose name contains the text, compared case-insensitively.
    fn search_needs(&self, contains_text: &str) -> AppResult<Vec<Need>>;

    /// Needs whose name contains the text, compared case-sensitively.
    /// Deliberately distinct from [`CupboardRepository::search_needs`]:
    /// the two entry points disagree on case handling and both behaviors
    /// are part of the contract.
    fn find_needs(&self, contains_text: &str) -> AppResult<Vec<Need>>;

    /// Whether a need with the candidate's id exists. Only the id is
    /// compared; the name plays no part.
    fn need_exists(&self, need: &Need) -> AppResult<bool>;

    /// Whether a need with the given id exists.
    fn need_exists_by_id(&self, id: u32) -> AppResult<bool>;
}

/// Interior state of the cupboard store: the record map plus the id
/// sequence.
struct CupboardTable {
    needs: BTreeMap<u32, Need>,
    next_id: u32,
}

impl CupboardTable {
    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// File-backed needs catalog.
pub struct CupboardFileStore {
    path: PathBuf,
    inner: Mutex<CupboardTable>,
}

impl CupboardFileStore {
    /// Open the store, loading all needs from the snapshot file. The id
    /// sequence resumes one past the largest loaded id.
    pub fn new(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let records: Vec<Need> = snapshot::load(&path)?;
        let next_id = records.iter().map(|need| need.id).max().unwrap_or(0) + 1;
        let needs = records.into_iter().map(|need| (need.id, need)).collect();

        Ok(Self {
            path,
            inner: Mutex::new(CupboardTable { needs, next_id }),
        })
    }

    fn persist(&self, table: &CupboardTable) -> AppResult<()> {
        let records: Vec<Need> = table.needs.values().cloned().collect();
        snapshot::save(&self.path, &records)
    }
}

impl CupboardRepository for CupboardFileStore {
    fn create_need(&self, need: Need) -> AppResult<Need> {
        let mut table = self.inner.lock();
        let id = table.allocate_id();
        let created = Need::new(
            id,
            need.name,
            need.cost,
            need.quantity,
            need.kind,
            need.description,
        );

        table.needs.insert(id, created.clone());
        self.persist(&table)?;
        Ok(created)
    }

    fn update_need(&self, id: u32, need: Need) -> AppResult<Need> {
        let mut table = self.inner.lock();
        let updated = Need { id, ..need };

        table.needs.insert(id, updated.clone());
        self.persist(&table)?;
        Ok(updated)
    }

    fn delete_need(&self, id: u32) -> AppResult<bool> {
        let mut table = self.inner.lock();
        if table.needs.remove(&id).is_none() {
            return Ok(false);
        }

        self.persist(&table)?;
        Ok(true)
    }

    fn get_need(&self, id: u32) -> AppResult<Option<Need>> {
        Ok(self.inner.lock().needs.get(&id).cloned())
    }

    fn get_all_needs(&self) -> AppResult<Vec<Need>> {
        Ok(self.inner.lock().needs.values().cloned().collect())
    }

    fn search_needs(&self, contains_text: &str) -> AppResult<Vec<Need>> {
        let needle = contains_text.to_lowercase();
        let table = self.inner.lock();
        Ok(table
            .needs
            .values()
            .filter(|need| need.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn find_needs(&self, contains_text: &str) -> AppResult<Vec<Need>> {
        let table = self.inner.lock();
        Ok(table
            .needs
            .values()
            .filter(|need| need.name.contains(contains_text))
            .cloned()
            .collect())
    }

    fn need_exists(&self, need: &Need) -> AppResult<bool> {
        self.need_exists_by_id(need.id)
    }

    fn need_exists_by_id(&self, id: u32) -> AppResult<bool> {
        Ok(self.inner.lock().needs.contains_key(&id))
    }
}

//! User persistence and the basket operations.

use std::collections::BTreeMap;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::domain::{BasketNeed, CreateUser, Need, Password, UpdateUser, User};
use crate::errors::AppResult;
use crate::infra::snapshot;

/// User repository trait for dependency injection.
///
/// Creation does not check uniqueness itself; callers consult
/// [`UserRepository::user_exists`] first. The check and the insert are
/// separate lock acquisitions, so two racing create requests can slip
/// past the guard — a known limitation of the observed design.
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Create a user with the next sequential id, a hashed password and an
    /// empty basket.
    fn create_user(&self, candidate: CreateUser) -> AppResult<User>;

    /// Get a user by id.
    fn get_user(&self, id: u32) -> AppResult<Option<User>>;

    /// Get a user by name.
    fn get_user_by_name(&self, user_name: &str) -> AppResult<Option<User>>;

    /// Get all users, ordered by id.
    fn get_all_users(&self) -> AppResult<Vec<User>>;

    /// Replace the user with the given id; `None` if the id is absent.
    /// An empty incoming password keeps the stored hash; anything else is
    /// hashed anew. The role is recomputed from the incoming user name.
    fn update_user(&self, id: u32, data: UpdateUser) -> AppResult<Option<User>>;

    /// Delete a user by id; false if the id was absent.
    fn delete_user(&self, id: u32) -> AppResult<bool>;

    /// Duplicate guard: whether either the user name or the id collides
    /// with an existing record.
    fn user_exists(&self, user_name: &str, id: u32) -> AppResult<bool>;

    /// The user's basket; `None` if the user is absent.
    fn get_basket(&self, id: u32) -> AppResult<Option<Vec<BasketNeed>>>;

    /// Whether the user's basket holds a line for the given need id.
    fn need_in_basket(&self, user_id: u32, need_id: u32) -> AppResult<bool>;

    /// Append a basket line for the need with a count of one. No merge
    /// takes place; duplicate protection is the caller's pre-check via
    /// [`UserRepository::need_in_basket`].
    fn add_need(&self, user_id: u32, need: Need) -> AppResult<Option<User>>;

    /// Remove every basket line matching the need id.
    fn remove_need(&self, user_id: u32, need_id: u32) -> AppResult<Option<User>>;

    /// Edit the count of the matching basket line; `None` if the user or
    /// the line is absent. See [`BasketNeed::edit_count`] for the accept
    /// rule; a rejected edit still persists and returns the user.
    fn edit_count(&self, user_id: u32, need_id: u32, count: i32) -> AppResult<Option<User>>;
}

/// Interior state of the user store: the record map plus the id sequence.
struct UserTable {
    users: BTreeMap<u32, User>,
    next_id: u32,
}

impl UserTable {
    /// Hand out the next id. Runs under the store lock together with the
    /// map insert, so two creations can never share an id.
    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// File-backed user store.
pub struct UserFileStore {
    path: PathBuf,
    inner: Mutex<UserTable>,
}

impl UserFileStore {
    /// Open the store, loading all users from the snapshot file. The id
    /// sequence resumes one past the largest loaded id.
    pub fn new(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let records: Vec<User> = snapshot::load(&path)?;
        let next_id = records.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        let users = records.into_iter().map(|user| (user.id, user)).collect();

        Ok(Self {
            path,
            inner: Mutex::new(UserTable { users, next_id }),
        })
    }

    fn persist(&self, table: &UserTable) -> AppResult<()> {
        let records: Vec<User> = table.users.values().cloned().collect();
        snapshot::save(&self.path, &records)
    }
}

impl UserRepository for UserFileStore {
    fn create_user(&self, candidate: CreateUser) -> AppResult<User> {
        let mut table = self.inner.lock();
        let id = table.allocate_id();
        let user = User::new(
            id,
            candidate.user_name,
            Password::new(&candidate.password).into_string(),
            candidate.security,
        );

        table.users.insert(id, user.clone());
        self.persist(&table)?;
        Ok(user)
    }

    fn get_user(&self, id: u32) -> AppResult<Option<User>> {
        Ok(self.inner.lock().users.get(&id).cloned())
    }

    fn get_user_by_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let table = self.inner.lock();
        Ok(table
            .users
            .values()
            .find(|user| user.user_name == user_name)
            .cloned())
    }

    fn get_all_users(&self) -> AppResult<Vec<User>> {
        Ok(self.inner.lock().users.values().cloned().collect())
    }

    fn update_user(&self, id: u32, data: UpdateUser) -> AppResult<Option<User>> {
        let mut table = self.inner.lock();
        let Some(existing) = table.users.get(&id) else {
            return Ok(None);
        };

        let password_hash = if data.password.is_empty() {
            existing.password_hash.clone()
        } else {
            Password::new(&data.password).into_string()
        };

        let updated = User::from_parts(
            id,
            data.user_name,
            password_hash,
            data.restricted,
            data.basket,
            data.security,
        );
        table.users.insert(id, updated.clone());
        self.persist(&table)?;
        Ok(Some(updated))
    }

    fn delete_user(&self, id: u32) -> AppResult<bool> {
        let mut table = self.inner.lock();
        if table.users.remove(&id).is_none() {
            return Ok(false);
        }

        self.persist(&table)?;
        Ok(true)
    }

    fn user_exists(&self, user_name: &str, id: u32) -> AppResult<bool> {
        Ok(self.get_user_by_name(user_name)?.is_some() || self.get_user(id)?.is_some())
    }

    fn get_basket(&self, id: u32) -> AppResult<Option<Vec<BasketNeed>>> {
        let table = self.inner.lock();
        Ok(table.users.get(&id).map(|user| user.basket.clone()))
    }

    fn need_in_basket(&self, user_id: u32, need_id: u32) -> AppResult<bool> {
        let table = self.inner.lock();
        Ok(table
            .users
            .get(&user_id)
            .is_some_and(|user| user.has_need(need_id)))
    }

    fn add_need(&self, user_id: u32, need: Need) -> AppResult<Option<User>> {
        let mut table = self.inner.lock();
        let Some(user) = table.users.get_mut(&user_id) else {
            return Ok(None);
        };

        user.add_need(need);
        let updated = user.clone();
        self.persist(&table)?;
        Ok(Some(updated))
    }

    fn remove_need(&self, user_id: u32, need_id: u32) -> AppResult<Option<User>> {
        let mut table = self.inner.lock();
        let Some(user) = table.users.get_mut(&user_id) else {
            return Ok(None);
        };

        user.remove_need(need_id);
        let updated = user.clone();
        self.persist(&table)?;
        Ok(Some(updated))
    }

    fn edit_count(&self, user_id: u32, need_id: u32, count: i32) -> AppResult<Option<User>> {
        let mut table = self.inner.lock();
        let Some(user) = table.users.get_mut(&user_id) else {
            return Ok(None);
        };
        let Some(line) = user.basket_need_mut(need_id) else {
            return Ok(None);
        };

        // A rejected edit leaves the count alone; the user is still
        // persisted and returned, so callers cannot tell the two apart.
        line.edit_count(count);
        let updated = user.clone();
        self.persist(&table)?;
        Ok(Some(updated))
    }
}

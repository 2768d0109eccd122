//! In-memory pro account store backed by one YAML file.
//!
//! Every loaded record is normalized: `feature_status` is backfilled
//! with a `not_attached` default for every feature the content store
//! knows, and the weekly plan falls back to the standard template. All
//! mutations follow read-modify-write with the full account list
//! persisted before the call returns.

use std::path::PathBuf;

use crate::error::StorageError;
use crate::storage::{self, load_catalog};

use super::model::{ProAccount, ProAccountPatch};

const PROS_FILE: &str = "pros.yaml";

/// Single in-memory source of truth for pro accounts.
pub struct AccountStore {
    path: PathBuf,
    /// Feature ids known at load/create time, used to backfill status maps.
    feature_ids: Vec<String>,
    pros: Vec<ProAccount>,
}

impl AccountStore {
    /// Load accounts from `<data_dir>/pros.yaml`.
    ///
    /// A missing or malformed file yields zero accounts, logged as a
    /// warning; it never fails startup.
    pub fn load(data_dir: impl Into<PathBuf>, feature_ids: Vec<String>) -> Self {
        let path = data_dir.into().join(PROS_FILE);
        let mut pros: Vec<ProAccount> = load_catalog(&path, "pro accounts");
        for pro in &mut pros {
            pro.backfill_feature_status(&feature_ids);
        }

        tracing::info!(accounts = pros.len(), "Account store loaded");
        Self {
            path,
            feature_ids,
            pros,
        }
    }

    pub fn all(&self) -> &[ProAccount] {
        &self.pros
    }

    pub fn find(&self, id: &str) -> Option<&ProAccount> {
        self.pros.iter().find(|p| p.id == id)
    }

    /// Insert a new account (normalized like loaded records) and persist.
    pub fn create(&mut self, mut pro: ProAccount) -> Result<ProAccount, StorageError> {
        pro.backfill_feature_status(&self.feature_ids);
        match self.pros.iter_mut().find(|p| p.id == pro.id) {
            Some(existing) => *existing = pro.clone(),
            None => self.pros.push(pro.clone()),
        }
        self.persist()?;
        Ok(pro)
    }

    /// Shallow-merge `patch` onto the account, persist, and return the
    /// merged record. `None` when the id is unknown.
    pub fn update(
        &mut self,
        id: &str,
        patch: ProAccountPatch,
    ) -> Result<Option<ProAccount>, StorageError> {
        let Some(pro) = self.pros.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply_to(pro);
        pro.backfill_feature_status(&self.feature_ids);
        let updated = pro.clone();
        self.persist()?;
        Ok(Some(updated))
    }

    /// Remove an account and persist. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.pros.len();
        self.pros.retain(|p| p.id != id);
        if self.pros.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Idempotently append `item_id` to the pro's completed list.
    ///
    /// Completing an already-complete item is a no-op success. `None`
    /// only when the pro id is unknown.
    pub fn complete_item(
        &mut self,
        pro_id: &str,
        item_id: &str,
    ) -> Result<Option<ProAccount>, StorageError> {
        let Some(pro) = self.pros.iter_mut().find(|p| p.id == pro_id) else {
            return Ok(None);
        };
        if !pro.completed_items.iter().any(|id| id == item_id) {
            pro.completed_items.push(item_id.to_string());
            let updated = pro.clone();
            self.persist()?;
            return Ok(Some(updated));
        }
        Ok(Some(pro.clone()))
    }

    /// Remove `item_id` from the completed list if present. Removing an
    /// absent item is a no-op success.
    pub fn uncomplete_item(
        &mut self,
        pro_id: &str,
        item_id: &str,
    ) -> Result<Option<ProAccount>, StorageError> {
        let Some(pro) = self.pros.iter_mut().find(|p| p.id == pro_id) else {
            return Ok(None);
        };
        let before = pro.completed_items.len();
        pro.completed_items.retain(|id| id != item_id);
        if pro.completed_items.len() != before {
            let updated = pro.clone();
            self.persist()?;
            return Ok(Some(updated));
        }
        Ok(Some(pro.clone()))
    }

    fn persist(&self) -> Result<(), StorageError> {
        storage::save_yaml(&self.path, &self.pros)
    }
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("path", &self.path)
            .field("accounts", &self.pros.len())
            .finish()
    }
}

//! Fixed-capacity account arena.
//!
//! Accounts are addressed by [`AccountHandle`]s equal to their slot index.
//! Slots are allocated monotonically and never freed, so a handle returned by
//! [`AccountStore::register`] stays valid for the life of the store.

use crate::account::{Account, AccountHandle};
use crate::alias_index::AliasSource;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::history::TxRing;

/// Rejects empty values and values longer than `max_len` bytes.
pub(crate) fn validate_field(field: &'static str, value: &str, max_len: usize) -> Result<()> {
    if value.is_empty() {
        return Err(LedgerError::validation(format!("{} must not be empty", field)));
    }
    if value.len() > max_len {
        return Err(LedgerError::validation(format!(
            "{} must be at most {} bytes",
            field, max_len
        )));
    }
    Ok(())
}

/// Owns every account and hands out their handles.
#[derive(Debug, Clone)]
pub struct AccountStore {
    accounts: Vec<Account>,
    config: LedgerConfig,
}

impl AccountStore {
    pub fn new(config: LedgerConfig) -> Self {
        AccountStore {
            accounts: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Creates a new account and returns its handle.
    ///
    /// Fails with [`LedgerError::Validation`] for empty or over-long fields,
    /// [`LedgerError::Conflict`] if the username is taken, and
    /// [`LedgerError::Capacity`] when the store is full.
    pub fn register(&mut self, username: &str, password: &str, agency: &str) -> Result<AccountHandle> {
        validate_field("username", username, self.config.max_username_len)?;
        validate_field("password", password, self.config.max_password_len)?;
        validate_field("agency", agency, self.config.max_agency_len)?;

        if self.find_by_username(username).is_some() {
            return Err(LedgerError::conflict("username", username));
        }
        if self.accounts.len() >= self.config.max_accounts {
            return Err(LedgerError::Capacity {
                resource: "account store",
                capacity: self.config.max_accounts,
            });
        }

        let handle = AccountHandle::from_index(self.accounts.len()).ok_or(
            LedgerError::Capacity {
                resource: "account handles",
                capacity: self.accounts.len(),
            },
        )?;
        self.accounts.push(Account::new(
            handle,
            username,
            password,
            agency,
            self.config.default_credit_limit,
            TxRing::new(self.config.history_capacity, self.config.max_note_len),
        ));
        Ok(handle)
    }

    /// Checks credentials and returns the matching handle.
    ///
    /// Unknown usernames yield [`LedgerError::NotFound`]; a wrong password
    /// yields [`LedgerError::Auth`].
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AccountHandle> {
        let handle = self
            .find_by_username(username)
            .ok_or_else(|| LedgerError::not_found("account", username))?;
        let account = &self.accounts[handle.index()];
        if !account.password_matches(password) {
            return Err(LedgerError::Auth("invalid credentials".to_string()));
        }
        Ok(handle)
    }

    /// Linear scan by exact username.
    pub fn find_by_username(&self, username: &str) -> Option<AccountHandle> {
        self.accounts
            .iter()
            .find(|a| a.username() == username)
            .map(Account::handle)
    }

    pub fn get(&self, handle: AccountHandle) -> Option<&Account> {
        self.accounts.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: AccountHandle) -> Option<&mut Account> {
        self.accounts.get_mut(handle.index())
    }

    /// Borrows two distinct accounts mutably at once.
    pub(crate) fn get_pair_mut(
        &mut self,
        a: AccountHandle,
        b: AccountHandle,
    ) -> Option<(&mut Account, &mut Account)> {
        let (i, j) = (a.index(), b.index());
        let len = self.accounts.len();
        if i == j || i >= len || j >= len {
            return None;
        }
        if i < j {
            let (left, right) = self.accounts.split_at_mut(j);
            Some((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.accounts.split_at_mut(i);
            Some((&mut right[0], &mut left[j]))
        }
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Maximum number of accounts.
    pub fn capacity(&self) -> usize {
        self.config.max_accounts
    }

    /// Accounts in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }
}

impl AliasSource for AccountStore {
    fn alias_of(&self, handle: AccountHandle) -> Option<&str> {
        self.get(handle).and_then(Account::alias)
    }
}

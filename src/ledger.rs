//! Ledger operations over the account store and alias index.
//!
//! The [`Ledger`] is the single context object owning all state. Every
//! mutating operation takes `&mut self`, so callers get exclusive access for
//! the whole call; a transfer therefore holds both accounts for its duration.
//! Each operation validates everything it needs before its first mutation and
//! either applies fully or returns an error with no state changed.

use crate::account::{Account, AccountHandle};
use crate::alias_index::AliasIndex;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::history;
use crate::money::Money;
use crate::store::{validate_field, AccountStore};
use crate::transaction::TxKind;
use log::{debug, info};
use serde::Serialize;

/// Result of a [`Ledger::transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Funds moved to another account.
    Transferred {
        /// Sender's balance after the transfer.
        balance: Money,
        recipient: AccountHandle,
    },

    /// The target was the sender's own alias, so the amount was drawn from
    /// the credit line instead.
    CreditAdvance { balance: Money, credit_used: Money },
}

/// Read-only snapshot of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    pub username: String,
    pub agency: String,
    pub balance: Money,
    pub credit_used: Money,
    pub credit_limit: Money,
    pub alias: Option<String>,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        AccountInfo {
            username: account.username().to_string(),
            agency: account.agency().to_string(),
            balance: account.balance(),
            credit_used: account.credit_used(),
            credit_limit: account.credit_limit(),
            alias: account.alias().map(str::to_string),
        }
    }
}

fn require_positive(amount: Money, operation: &str) -> Result<()> {
    if !amount.is_positive() {
        return Err(LedgerError::validation(format!(
            "{} amount must be positive, got {}",
            operation, amount
        )));
    }
    Ok(())
}

/// In-memory account ledger keyed by PIX aliases.
///
/// # Example
///
/// ```
/// use pix_ledger::{Ledger, Money};
///
/// let mut ledger = Ledger::new();
/// let alice = ledger.register("alice", "pw", "0001").unwrap();
/// let bob = ledger.register("bob", "pw", "0001").unwrap();
/// ledger.set_alias(bob, "bob@pix").unwrap();
/// ledger.set_alias(alice, "alice@pix").unwrap();
///
/// ledger.deposit(alice, Money::from_cents(1000)).unwrap();
/// ledger.transfer(alice, Money::from_cents(300), "bob@pix").unwrap();
///
/// assert_eq!(ledger.account_info(bob).unwrap().balance.to_string(), "3.00");
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    store: AccountStore,
    aliases: AliasIndex,
}

impl Ledger {
    /// Creates an empty ledger with default capacities.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let aliases = AliasIndex::with_capacity(config.alias_table_size);
        Ledger {
            store: AccountStore::new(config),
            aliases,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        self.store.config()
    }

    /// Registers a new account.
    pub fn register(&mut self, username: &str, password: &str, agency: &str) -> Result<AccountHandle> {
        let handle = self.store.register(username, password, agency)?;
        info!("Registered account {} for '{}'", handle, username);
        Ok(handle)
    }

    /// Checks credentials and returns the account handle.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AccountHandle> {
        let handle = self.store.authenticate(username, password)?;
        debug!("Authenticated '{}' as {}", username, handle);
        Ok(handle)
    }

    /// Returns the account behind `handle`.
    pub fn account(&self, handle: AccountHandle) -> Result<&Account> {
        self.store
            .get(handle)
            .ok_or_else(|| LedgerError::not_found("account", handle.to_string()))
    }

    fn account_mut(&mut self, handle: AccountHandle) -> Result<&mut Account> {
        self.store
            .get_mut(handle)
            .ok_or_else(|| LedgerError::not_found("account", handle.to_string()))
    }

    /// Accounts in registration order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.store.iter()
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Resolves an alias to its account.
    pub fn find_by_alias(&self, alias: &str) -> Option<AccountHandle> {
        self.aliases.find(alias, &self.store)
    }

    /// Credits a positive amount. Returns the new balance.
    pub fn deposit(&mut self, handle: AccountHandle, amount: Money) -> Result<Money> {
        require_positive(amount, "deposit")?;
        let account = self.account_mut(handle)?;
        let balance = account.deposit(amount)?;
        account
            .history_mut()
            .push(TxKind::Deposit, amount, &format!("Deposited {}", amount));
        debug!("Deposited {} to {}, balance {}", amount, handle, balance);
        Ok(balance)
    }

    /// Debits a positive amount no larger than the balance. Returns the new
    /// balance.
    pub fn withdraw(&mut self, handle: AccountHandle, amount: Money) -> Result<Money> {
        require_positive(amount, "withdrawal")?;
        let account = self.account_mut(handle)?;
        let balance = account.withdraw(amount)?;
        account
            .history_mut()
            .push(TxKind::Withdraw, amount, &format!("Withdrew {}", amount));
        debug!("Withdrew {} from {}, balance {}", amount, handle, balance);
        Ok(balance)
    }

    /// Sends `amount` to the account holding `target_alias`.
    ///
    /// The sender must have an alias of its own. When `target_alias` is that
    /// alias, the call becomes a credit advance: the amount is drawn from the
    /// sender's credit line into its balance.
    pub fn transfer(
        &mut self,
        handle: AccountHandle,
        amount: Money,
        target_alias: &str,
    ) -> Result<TransferOutcome> {
        let sender = self.account(handle)?;
        let own_alias = sender.alias().ok_or_else(|| {
            LedgerError::validation("a PIX key must be set before making transfers")
        })?;
        require_positive(amount, "transfer")?;

        if own_alias == target_alias {
            return self.credit_advance(handle, amount);
        }

        let recipient = self
            .aliases
            .find(target_alias, &self.store)
            .ok_or_else(|| LedgerError::not_found("alias", target_alias))?;

        let (from, to) = self
            .store
            .get_pair_mut(handle, recipient)
            .ok_or_else(|| LedgerError::not_found("account", recipient.to_string()))?;

        from.ensure_funds(amount)?;
        if to.balance().checked_add(amount).is_none() {
            return Err(LedgerError::validation("recipient balance would overflow"));
        }

        // Both checks passed; neither step below can fail.
        let balance = from.withdraw(amount)?;
        to.deposit(amount)?;

        let note_out = format!("Transferred {} to {}", amount, to.username());
        let note_in = format!("Received {} from {}", amount, from.username());
        from.history_mut().push(TxKind::TransferOut, amount, &note_out);
        to.history_mut().push(TxKind::TransferIn, amount, &note_in);

        debug!(
            "Transferred {} from {} to {} via '{}'",
            amount, handle, recipient, target_alias
        );
        Ok(TransferOutcome::Transferred { balance, recipient })
    }

    fn credit_advance(&mut self, handle: AccountHandle, amount: Money) -> Result<TransferOutcome> {
        let account = self.account_mut(handle)?;
        let balance = account.draw_credit(amount)?;
        let credit_used = account.credit_used();
        account
            .history_mut()
            .push(TxKind::CreditAdvance, amount, &format!("Credit advance {}", amount));
        debug!(
            "Credit advance of {} for {}, credit used {}",
            amount, handle, credit_used
        );
        Ok(TransferOutcome::CreditAdvance {
            balance,
            credit_used,
        })
    }

    /// Sets or replaces the account's alias.
    ///
    /// Setting the alias the account already holds is a no-op. An alias held
    /// by another account is a [`LedgerError::Conflict`].
    pub fn set_alias(&mut self, handle: AccountHandle, alias: &str) -> Result<()> {
        if self.assign_alias(handle, alias)? {
            self.account_mut(handle)?
                .history_mut()
                .push(TxKind::Misc, Money::ZERO, "PIX key set/updated");
        }
        Ok(())
    }

    /// Binds `alias` to the account in both the account field and the index,
    /// without touching history. Returns `false` if the account already held
    /// `alias`.
    fn assign_alias(&mut self, handle: AccountHandle, alias: &str) -> Result<bool> {
        validate_field("alias", alias, self.config().max_alias_len)?;
        let account = self.account(handle)?;
        if account.alias() == Some(alias) {
            debug!("Account {} already holds alias '{}'", handle, alias);
            return Ok(false);
        }
        if let Some(owner) = self.aliases.find(alias, &self.store) {
            if owner != handle {
                return Err(LedgerError::conflict("alias", alias));
            }
        }

        let previous = account.alias().map(str::to_string);
        if previous.is_none() && !self.aliases.has_room() {
            return Err(LedgerError::Capacity {
                resource: "alias table",
                capacity: self.aliases.capacity(),
            });
        }

        // The old key must leave the index while the account still reports it.
        if let Some(old) = &previous {
            self.aliases.remove(old, &self.store);
        }
        self.account_mut(handle)?.set_alias(Some(alias.to_string()));
        self.aliases.insert(alias, handle, &self.store)?;

        info!(
            "Account {} alias changed from {:?} to '{}'",
            handle, previous, alias
        );
        Ok(true)
    }

    /// Removes the account's alias.
    pub fn clear_alias(&mut self, handle: AccountHandle) -> Result<()> {
        let account = self.account(handle)?;
        let previous = account
            .alias()
            .map(str::to_string)
            .ok_or_else(|| LedgerError::not_found("alias", account.username()))?;

        self.aliases.remove(&previous, &self.store);
        let account = self.account_mut(handle)?;
        account.set_alias(None);
        account
            .history_mut()
            .push(TxKind::Misc, Money::ZERO, "PIX key cleared");
        info!("Account {} alias '{}' cleared", handle, previous);
        Ok(())
    }

    /// Replaces the credit limit. Returns the new limit.
    pub fn change_credit_limit(&mut self, handle: AccountHandle, limit: Money) -> Result<Money> {
        let account = self.account_mut(handle)?;
        let limit = account.set_credit_limit(limit)?;
        account.history_mut().push(
            TxKind::Misc,
            Money::ZERO,
            &format!("Credit limit set to {}", limit),
        );
        debug!("Credit limit of {} set to {}", handle, limit);
        Ok(limit)
    }

    /// Replaces the password after checking the current one.
    pub fn change_password(&mut self, handle: AccountHandle, old: &str, new: &str) -> Result<()> {
        let max_len = self.config().max_password_len;
        let account = self.account_mut(handle)?;
        if !account.password_matches(old) {
            return Err(LedgerError::Auth("incorrect current password".to_string()));
        }
        validate_field("new password", new, max_len)?;

        account.set_password(new);
        account
            .history_mut()
            .push(TxKind::Misc, Money::ZERO, "Password changed");
        debug!("Password changed for {}", handle);
        Ok(())
    }

    pub fn account_info(&self, handle: AccountHandle) -> Result<AccountInfo> {
        self.account(handle).map(AccountInfo::from)
    }

    /// The account's history, oldest first.
    pub fn history(&self, handle: AccountHandle) -> Result<history::Iter<'_>> {
        Ok(self.account(handle)?.history().iter())
    }

    /// Registers the two demo accounts `user1` and `user2` (password `pass`,
    /// agency `DF`) with aliases `user1pix` and `user2pix`.
    ///
    /// Seeded accounts start with an empty history.
    pub fn seed_sample_accounts(&mut self) -> Result<()> {
        for name in ["user1", "user2"] {
            let handle = self.register(name, "pass", "DF")?;
            self.assign_alias(handle, &format!("{}pix", name))?;
        }
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

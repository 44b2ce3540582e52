//! Account model and balance operations.
//!
//! Maintains the invariants `balance >= 0` and
//! `0 <= credit_used <= credit_limit` at all times.

use crate::error::{LedgerError, Result};
use crate::history::TxRing;
use crate::money::Money;
use std::fmt;

/// Stable identity of an account slot in the [`AccountStore`](crate::AccountStore).
///
/// Handles are allocated in registration order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountHandle(u32);

impl AccountHandle {
    /// Returns `None` if `index` does not fit in a handle.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(AccountHandle)
    }

    /// Slot index in the store.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A ledger account.
///
/// # Invariants
///
/// - `balance >= 0`: every debit checks funds before mutating
/// - `0 <= credit_used <= credit_limit`
/// - `alias`, when set, is non-empty and indexed to this account
///
/// Identity fields are fixed at registration; only the password may change
/// afterwards. The alias is changed exclusively through the
/// [`Ledger`](crate::Ledger) so it stays in step with the alias index.
#[derive(Debug, Clone)]
pub struct Account {
    handle: AccountHandle,
    username: String,
    password: String,
    agency: String,
    balance: Money,
    credit_limit: Money,
    credit_used: Money,
    alias: Option<String>,
    history: TxRing,
}

impl Account {
    /// Creates an account with zero balance and no alias.
    pub(crate) fn new(
        handle: AccountHandle,
        username: &str,
        password: &str,
        agency: &str,
        credit_limit: Money,
        history: TxRing,
    ) -> Self {
        Account {
            handle,
            username: username.to_string(),
            password: password.to_string(),
            agency: agency.to_string(),
            balance: Money::ZERO,
            credit_limit,
            credit_used: Money::ZERO,
            alias: None,
            history,
        }
    }

    pub fn handle(&self) -> AccountHandle {
        self.handle
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn agency(&self) -> &str {
        &self.agency
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn credit_limit(&self) -> Money {
        self.credit_limit
    }

    pub fn credit_used(&self) -> Money {
        self.credit_used
    }

    /// Credit still available for advances.
    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.credit_used
    }

    /// The account's PIX key, if one is set.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn history(&self) -> &TxRing {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut TxRing {
        &mut self.history
    }

    /// Plain equality check; no hardening is attempted.
    pub(crate) fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    pub(crate) fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    pub(crate) fn set_alias(&mut self, alias: Option<String>) {
        self.alias = alias;
    }

    /// Credits `amount` to the balance and returns the new balance.
    ///
    /// Fails without mutating if the balance would overflow.
    pub(crate) fn deposit(&mut self, amount: Money) -> Result<Money> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::validation("balance would overflow"))?;
        Ok(self.balance)
    }

    /// Fails with [`LedgerError::InsufficientFunds`] if `amount` exceeds the
    /// balance.
    pub(crate) fn ensure_funds(&self, amount: Money) -> Result<()> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    /// Debits `amount` from the balance and returns the new balance.
    pub(crate) fn withdraw(&mut self, amount: Money) -> Result<Money> {
        self.ensure_funds(amount)?;
        self.balance = self.balance - amount;
        Ok(self.balance)
    }

    /// Draws `amount` from the credit line into the balance.
    ///
    /// Returns the new balance. Fails with [`LedgerError::InsufficientCredit`]
    /// if the advance exceeds the remaining credit.
    pub(crate) fn draw_credit(&mut self, amount: Money) -> Result<Money> {
        let available = self.available_credit();
        if amount > available {
            return Err(LedgerError::InsufficientCredit {
                needed: amount,
                available,
            });
        }
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::validation("balance would overflow"))?;
        self.credit_used = self.credit_used + amount;
        self.balance = balance;
        Ok(self.balance)
    }

    /// Replaces the credit limit. It may not drop below credit already used.
    pub(crate) fn set_credit_limit(&mut self, limit: Money) -> Result<Money> {
        if limit.is_negative() {
            return Err(LedgerError::validation("credit limit must not be negative"));
        }
        if limit < self.credit_used {
            return Err(LedgerError::validation(format!(
                "credit limit {} is below credit already used {}",
                limit, self.credit_used
            )));
        }
        self.credit_limit = limit;
        Ok(self.credit_limit)
    }

    /// Verifies the balance and credit invariants.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self) -> bool {
        !self.balance.is_negative()
            && !self.credit_used.is_negative()
            && self.credit_used <= self.credit_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    fn account() -> Account {
        Account::new(
            AccountHandle::from_index(0).unwrap(),
            "alice",
            "secret",
            "0001",
            money("100.00"),
            TxRing::new(8, 40),
        )
    }

    #[test]
    fn test_new_account_has_zero_balances() {
        let account = account();
        assert_eq!(account.username(), "alice");
        assert_eq!(account.agency(), "0001");
        assert_eq!(account.balance(), Money::ZERO);
        assert_eq!(account.credit_used(), Money::ZERO);
        assert_eq!(account.credit_limit(), money("100"));
        assert!(account.alias().is_none());
        assert!(account.history().is_empty());
        assert!(account.check_invariant());
    }

    #[test]
    fn test_deposit_then_withdraw() {
        let mut account = account();
        assert_eq!(account.deposit(money("10.00")).unwrap(), money("10"));
        assert_eq!(account.withdraw(money("3.50")).unwrap(), money("6.50"));
        assert!(account.check_invariant());
    }

    #[test]
    fn test_withdraw_fails_with_insufficient_funds() {
        let mut account = account();
        account.deposit(money("10.00")).unwrap();

        let err = account.withdraw(money("15.00")).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(account.balance(), money("10"));
    }

    #[test]
    fn test_deposit_overflow_leaves_balance() {
        let mut account = account();
        account.deposit(Money::from_cents(i64::MAX)).unwrap();
        assert!(account.deposit(Money::from_cents(1)).is_err());
        assert_eq!(account.balance(), Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_draw_credit_within_limit() {
        let mut account = account();
        assert_eq!(account.draw_credit(money("40")).unwrap(), money("40"));
        assert_eq!(account.credit_used(), money("40"));
        assert_eq!(account.available_credit(), money("60"));
        assert!(account.check_invariant());

        let err = account.draw_credit(money("60.01")).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientCredit { .. }));
        assert_eq!(account.credit_used(), money("40"));
        assert_eq!(account.balance(), money("40"));
    }

    #[test]
    fn test_credit_limit_cannot_drop_below_usage() {
        let mut account = account();
        account.draw_credit(money("30")).unwrap();

        assert!(account.set_credit_limit(money("29.99")).is_err());
        assert!(account.set_credit_limit(money("-1")).is_err());
        assert_eq!(account.credit_limit(), money("100"));

        assert_eq!(account.set_credit_limit(money("30")).unwrap(), money("30"));
        assert!(account.check_invariant());
    }

    #[test]
    fn test_handle_rejects_indices_beyond_u32() {
        let last = AccountHandle::from_index(u32::MAX as usize).unwrap();
        assert_eq!(last.index(), u32::MAX as usize);
        if let Ok(too_big) = usize::try_from(u64::from(u32::MAX) + 1) {
            assert!(AccountHandle::from_index(too_big).is_none());
        }
    }

    #[test]
    fn test_password_matching_is_exact() {
        let mut account = account();
        assert!(account.password_matches("secret"));
        assert!(!account.password_matches("Secret"));
        account.set_password("hunter2");
        assert!(account.password_matches("hunter2"));
    }
}

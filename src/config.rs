//! Capacities and field bounds for a [`Ledger`](crate::Ledger).

use crate::money::Money;

/// Sizing and validation limits applied by the ledger.
///
/// All string bounds are in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Maximum number of accounts the store will ever hold.
    pub max_accounts: usize,

    /// Number of slots in the alias table. Rounded up to a power of two.
    pub alias_table_size: usize,

    /// Number of history records kept per account.
    pub history_capacity: usize,

    /// Credit limit granted to newly registered accounts.
    pub default_credit_limit: Money,

    pub max_username_len: usize,
    pub max_password_len: usize,
    pub max_agency_len: usize,
    pub max_alias_len: usize,

    /// History notes longer than this are truncated.
    pub max_note_len: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            max_accounts: 1024,
            alias_table_size: 2048,
            history_capacity: 256,
            default_credit_limit: Money::from_cents(100 * 100),
            max_username_len: 32,
            max_password_len: 64,
            max_agency_len: 8,
            max_alias_len: 64,
            max_note_len: 39,
        }
    }
}

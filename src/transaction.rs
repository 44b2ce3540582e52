//! Transaction history records.

use crate::money::Money;
use serde::Serialize;
use std::fmt;

/// Kind of event recorded in an account's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxKind {
    /// Funds credited by the account holder.
    Deposit,

    /// Funds debited by the account holder.
    Withdraw,

    /// Funds sent to another account's alias.
    TransferOut,

    /// Funds received from another account.
    TransferIn,

    /// Funds drawn from the account's own credit line.
    CreditAdvance,

    /// Administrative change (alias, credit limit, password). Amount is zero.
    Misc,
}

impl TxKind {
    /// Short uppercase label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            TxKind::Deposit => "DEPOSIT",
            TxKind::Withdraw => "WITHDRAW",
            TxKind::TransferOut => "XFER_OUT",
            TxKind::TransferIn => "XFER_IN",
            TxKind::CreditAdvance => "CREDIT",
            TxKind::Misc => "MISC",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single history entry. Immutable once written.
///
/// Money-moving records carry the positive amount moved; the kind gives the
/// direction. [`TxKind::Misc`] entries carry zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxRecord {
    kind: TxKind,
    amount: Money,
    note: String,
}

impl TxRecord {
    /// Creates a record, truncating `note` to at most `max_note_len` bytes.
    pub fn new(kind: TxKind, amount: Money, note: &str, max_note_len: usize) -> Self {
        TxRecord {
            kind,
            amount,
            note: truncate_on_char_boundary(note, max_note_len).to_string(),
        }
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn note(&self) -> &str {
        &self.note
    }
}

/// Returns the longest prefix of `s` that fits in `max` bytes without
/// splitting a UTF-8 sequence.
pub(crate) fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

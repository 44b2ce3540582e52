//! # PIX Ledger
//!
//! An in-memory account ledger where accounts are addressed by PIX aliases.
//! Supports registration, authentication, deposits, withdrawals, alias
//! transfers, a revolving credit line and a bounded per-account history.
//!
//! ## Design Principles
//!
//! - **Integer cents**: [`Money`] is an `i64` count of cents, no floats
//! - **Open addressing**: aliases resolve through a linear-probing table
//!   whose deletion re-seats the rest of the probe cluster
//! - **Bounded history**: each account keeps its latest records in a ring
//! - **All-or-nothing operations**: a failed call leaves no state changed
//! - **Deterministic output**: accounts listed in registration order
//!
//! ## Example
//!
//! ```no_run
//! use pix_ledger::Ledger;
//! use std::io::Cursor;
//!
//! let csv = "op,user,secret,amount,target\n\
//!            register,alice,pw,,0001\n\
//!            deposit,alice,pw,100.0,\n";
//! let mut ledger = Ledger::new();
//! ledger.process_csv(Cursor::new(csv)).unwrap();
//! ledger.write_output(std::io::stdout()).unwrap();
//! ```

pub mod account;
pub mod alias_index;
pub mod batch;
pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod ledger;
pub mod money;
pub mod store;
pub mod transaction;

pub use account::{Account, AccountHandle};
pub use alias_index::{AliasIndex, AliasSource};
pub use batch::BatchSummary;
pub use command::{AccountAction, CommandRecord, ParsedCommand};
pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use history::TxRing;
pub use ledger::{AccountInfo, Ledger, TransferOutcome};
pub use money::{Money, MoneyParseError};
pub use store::AccountStore;
pub use transaction::{TxKind, TxRecord};

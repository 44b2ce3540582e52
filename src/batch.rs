//! CSV batch processing for the ledger.
//!
//! Replays a script of command rows against a [`Ledger`] and writes the
//! resulting account states (or histories) back out as CSV. Rows that fail
//! to parse or are rejected by the ledger are logged and skipped; they never
//! abort the run.

use crate::command::{AccountAction, CommandRecord, ParsedCommand};
use crate::error::{LedgerError, Result};
use crate::ledger::{Ledger, TransferOutcome};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::io::{Read, Write};

/// Counts of rows handled by [`Ledger::process_csv`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows applied successfully.
    pub applied: usize,

    /// Rows skipped because they were malformed or rejected.
    pub rejected: usize,
}

impl Ledger {
    /// Processes commands from a CSV reader in streaming fashion.
    ///
    /// Expects the header `op,user,secret,amount,target`. Invalid or rejected
    /// rows are logged at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<BatchSummary> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut summary = BatchSummary::default();

        for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let outcome = result
                .map_err(LedgerError::from)
                .and_then(|record| {
                    record
                        .parse()
                        .map_err(|message| LedgerError::InvalidRecord { row: row_num, message })
                })
                .and_then(|command| self.apply(command, row_num));

            match outcome {
                Ok(()) => summary.applied += 1,
                Err(e) => {
                    warn!("Row {}: {}", row_num, e);
                    summary.rejected += 1;
                }
            }
        }

        info!(
            "Processed {} rows: {} applied, {} rejected",
            summary.applied + summary.rejected,
            summary.applied,
            summary.rejected
        );
        Ok(summary)
    }

    /// Applies a single parsed command.
    pub fn apply(&mut self, command: ParsedCommand, row: usize) -> Result<()> {
        let (user, secret, action) = match command {
            ParsedCommand::Register {
                user,
                password,
                agency,
            } => {
                let handle = self.register(&user, &password, &agency)?;
                debug!("Row {}: Registered '{}' as {}", row, user, handle);
                return Ok(());
            }
            ParsedCommand::Account {
                user,
                secret,
                action,
            } => (user, secret, action),
        };

        let handle = self.authenticate(&user, &secret)?;

        match action {
            AccountAction::Deposit(amount) => {
                let balance = self.deposit(handle, amount)?;
                debug!("Row {}: '{}' deposited {}, balance {}", row, user, amount, balance);
            }
            AccountAction::Withdraw(amount) => {
                let balance = self.withdraw(handle, amount)?;
                debug!("Row {}: '{}' withdrew {}, balance {}", row, user, amount, balance);
            }
            AccountAction::Transfer { amount, alias } => {
                match self.transfer(handle, amount, &alias)? {
                    TransferOutcome::Transferred { balance, recipient } => debug!(
                        "Row {}: '{}' sent {} to {} ('{}'), balance {}",
                        row, user, amount, recipient, alias, balance
                    ),
                    TransferOutcome::CreditAdvance {
                        balance,
                        credit_used,
                    } => debug!(
                        "Row {}: '{}' drew {} of credit, balance {}, credit used {}",
                        row, user, amount, balance, credit_used
                    ),
                }
            }
            AccountAction::SetAlias(alias) => {
                self.set_alias(handle, &alias)?;
                debug!("Row {}: '{}' alias is now '{}'", row, user, alias);
            }
            AccountAction::ClearAlias => {
                self.clear_alias(handle)?;
                debug!("Row {}: '{}' alias cleared", row, user);
            }
            AccountAction::CreditLimit(limit) => {
                let limit = self.change_credit_limit(handle, limit)?;
                debug!("Row {}: '{}' credit limit set to {}", row, user, limit);
            }
            AccountAction::ChangePassword { new_password } => {
                self.change_password(handle, &secret, &new_password)?;
                debug!("Row {}: '{}' changed password", row, user);
            }
        }

        Ok(())
    }

    /// Writes final account states to CSV, in registration order.
    ///
    /// All monetary values are formatted with exactly 2 decimal places.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "username",
            "agency",
            "alias",
            "balance",
            "credit_used",
            "credit_limit",
            "transactions",
        ])?;

        for account in self.accounts() {
            csv_writer.write_record([
                account.username().to_string(),
                account.agency().to_string(),
                account.alias().unwrap_or_default().to_string(),
                account.balance().to_string(),
                account.credit_used().to_string(),
                account.credit_limit().to_string(),
                account.history().len().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes every account's history to CSV, oldest record first.
    pub fn write_history<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["username", "kind", "amount", "note"])?;

        for account in self.accounts() {
            for record in account.history() {
                csv_writer.write_record([
                    account.username().to_string(),
                    record.kind().to_string(),
                    record.amount().to_string(),
                    record.note().to_string(),
                ])?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}

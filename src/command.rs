//! Command records for CSV batch scripts.

use crate::money::Money;
use serde::Deserialize;

/// Raw command record as read from CSV.
///
/// Column meaning depends on `op`; unused columns may be empty or absent.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    /// Operation: register, deposit, withdraw, transfer, set_alias,
    /// clear_alias, credit_limit, password
    pub op: String,

    /// Username the command acts as
    pub user: String,

    /// Password (current password for `password`)
    #[serde(default)]
    pub secret: Option<String>,

    /// Amount for money-moving operations and `credit_limit`
    #[serde(default)]
    pub amount: Option<String>,

    /// Agency for `register`, alias for `transfer`/`set_alias`, new password
    /// for `password`
    #[serde(default)]
    pub target: Option<String>,
}

impl CommandRecord {
    /// Parses the raw CSV record into a typed command.
    ///
    /// Returns a description of the problem if the record is invalid
    /// (unknown op, missing or malformed field).
    pub fn parse(&self) -> Result<ParsedCommand, String> {
        let op = self.op.trim().to_lowercase();
        let user = self.user.trim().to_string();
        let secret = field(&self.secret).unwrap_or_default();

        if op == "register" {
            return Ok(ParsedCommand::Register {
                user,
                password: secret,
                agency: self.require_target("agency")?,
            });
        }

        let action = match op.as_str() {
            "deposit" => AccountAction::Deposit(self.parse_amount()?),
            "withdraw" | "withdrawal" => AccountAction::Withdraw(self.parse_amount()?),
            "transfer" => AccountAction::Transfer {
                amount: self.parse_amount()?,
                alias: self.require_target("target alias")?,
            },
            "set_alias" => AccountAction::SetAlias(self.require_target("alias")?),
            "clear_alias" => AccountAction::ClearAlias,
            "credit_limit" => AccountAction::CreditLimit(self.parse_amount()?),
            "password" => AccountAction::ChangePassword {
                new_password: field(&self.target).unwrap_or_default(),
            },
            other => return Err(format!("unknown operation '{}'", other)),
        };

        Ok(ParsedCommand::Account {
            user,
            secret,
            action,
        })
    }

    /// Parses the amount field into `Money`.
    fn parse_amount(&self) -> Result<Money, String> {
        let raw = field(&self.amount).ok_or_else(|| "missing amount".to_string())?;
        Money::parse(&raw).map_err(|e| e.to_string())
    }

    fn require_target(&self, what: &str) -> Result<String, String> {
        field(&self.target).ok_or_else(|| format!("missing {}", what))
    }
}

/// Trimmed, non-empty field contents.
fn field(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A parsed command ready to apply to a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Create a new account.
    Register {
        user: String,
        password: String,
        agency: String,
    },

    /// Authenticate as `user` and perform `action`.
    Account {
        user: String,
        secret: String,
        action: AccountAction,
    },
}

/// Operations performed on an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAction {
    Deposit(Money),
    Withdraw(Money),

    /// Send to another alias, or draw credit when the alias is one's own.
    Transfer { amount: Money, alias: String },

    SetAlias(String),
    ClearAlias,
    CreditLimit(Money),

    /// The current password travels in the command's `secret`.
    ChangePassword { new_password: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(op: &str, user: &str, secret: &str, amount: &str, target: &str) -> CommandRecord {
        let opt = |s: &str| Some(s.to_string());
        CommandRecord {
            op: op.to_string(),
            user: user.to_string(),
            secret: opt(secret),
            amount: opt(amount),
            target: opt(target),
        }
    }

    #[test]
    fn test_parse_register() {
        let parsed = record("register", "alice", "pw", "", "0001").parse().unwrap();
        assert_eq!(
            parsed,
            ParsedCommand::Register {
                user: "alice".into(),
                password: "pw".into(),
                agency: "0001".into()
            }
        );
    }

    #[test]
    fn test_parse_transfer() {
        let parsed = record("transfer", "alice", "pw", "12.5", "bob@pix").parse().unwrap();
        match parsed {
            ParsedCommand::Account { user, secret, action } => {
                assert_eq!(user, "alice");
                assert_eq!(secret, "pw");
                assert_eq!(
                    action,
                    AccountAction::Transfer {
                        amount: Money::from_cents(1250),
                        alias: "bob@pix".into()
                    }
                );
            }
            _ => panic!("Expected account command"),
        }
    }

    #[test]
    fn test_parse_handles_whitespace_and_case() {
        let parsed = record("  DEPOSIT ", " alice ", "pw", " 10.00 ", "").parse().unwrap();
        match parsed {
            ParsedCommand::Account { user, action, .. } => {
                assert_eq!(user, "alice");
                assert_eq!(action, AccountAction::Deposit(Money::from_cents(1000)));
            }
            _ => panic!("Expected account command"),
        }
    }

    #[test]
    fn test_parse_password_change_allows_empty_new_password() {
        // Rejecting an empty password is the ledger's job.
        let parsed = record("password", "alice", "old", "", "").parse().unwrap();
        assert!(matches!(
            parsed,
            ParsedCommand::Account {
                action: AccountAction::ChangePassword { ref new_password },
                ..
            } if new_password.is_empty()
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_op() {
        let err = record("refund", "alice", "pw", "", "").parse().unwrap_err();
        assert!(err.contains("unknown operation"));
    }

    #[test]
    fn test_parse_rejects_missing_or_bad_amount() {
        assert!(record("deposit", "alice", "pw", "", "").parse().is_err());
        assert!(record("withdraw", "alice", "pw", "abc", "").parse().is_err());
        assert!(record("transfer", "alice", "pw", "1.00", "").parse().is_err());
    }

    #[test]
    fn test_parse_register_requires_agency() {
        let err = record("register", "alice", "pw", "", " ").parse().unwrap_err();
        assert_eq!(err, "missing agency");
    }
}

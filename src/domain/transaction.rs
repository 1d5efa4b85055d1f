use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Money movement through the shop's books. `amount` is always positive;
/// direction is carried by `txn_type`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: i32,
    pub txn_type: TxnType,
    pub category: TxnCategory,
    pub amount: i64,
    pub description: String,
    pub party: String,
    /// Linked client row for client-category entries.
    pub client_id: Option<i32>,
    /// Linked karigar row for karigar-category entries.
    pub karigar_id: Option<i32>,
    pub method: PaymentMethod,
    pub txn_date: NaiveDateTime,
    pub status: TxnStatus,
    pub reference: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// Signed effect of this transaction on a linked client's balance.
    ///
    /// Positive client balance is credit the shop owes the client. Money
    /// received from the client raises it, money paid out lowers it.
    #[must_use]
    pub fn balance_effect(&self) -> i64 {
        match self.txn_type {
            TxnType::Receipt => self.amount,
            TxnType::Payment => -self.amount,
        }
    }

    #[must_use]
    pub fn occurred_on(&self) -> NaiveDate {
        self.txn_date.date()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxnType {
    #[serde(rename = "receipt")]
    Receipt,
    #[serde(rename = "payment")]
    Payment,
}

impl Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnType::Receipt => write!(f, "receipt"),
            TxnType::Payment => write!(f, "payment"),
        }
    }
}

impl FromStr for TxnType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receipt" => Ok(TxnType::Receipt),
            "payment" => Ok(TxnType::Payment),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxnCategory {
    #[serde(rename = "vendor")]
    Vendor,
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "karigar")]
    Karigar,
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "asset")]
    Asset,
}

impl Display for TxnCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnCategory::Vendor => write!(f, "vendor"),
            TxnCategory::Client => write!(f, "client"),
            TxnCategory::Karigar => write!(f, "karigar"),
            TxnCategory::Expense => write!(f, "expense"),
            TxnCategory::Asset => write!(f, "asset"),
        }
    }
}

impl FromStr for TxnCategory {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendor" => Ok(TxnCategory::Vendor),
            "client" => Ok(TxnCategory::Client),
            "karigar" => Ok(TxnCategory::Karigar),
            "expense" => Ok(TxnCategory::Expense),
            "asset" => Ok(TxnCategory::Asset),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "cash")]
    Cash,
    #[serde(rename = "rtgs")]
    Rtgs,
    #[serde(rename = "cheque")]
    Cheque,
    #[serde(rename = "upi")]
    Upi,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Rtgs => write!(f, "rtgs"),
            PaymentMethod::Cheque => write!(f, "cheque"),
            PaymentMethod::Upi => write!(f, "upi"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "rtgs" => Ok(PaymentMethod::Rtgs),
            "cheque" => Ok(PaymentMethod::Cheque),
            "upi" => Ok(PaymentMethod::Upi),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxnStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "failed")]
    Failed,
}

impl Display for TxnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnStatus::Completed => write!(f, "completed"),
            TxnStatus::Pending => write!(f, "pending"),
            TxnStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TxnStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(TxnStatus::Completed),
            "pending" => Ok(TxnStatus::Pending),
            "failed" => Ok(TxnStatus::Failed),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTransaction {
    pub txn_type: TxnType,
    pub category: TxnCategory,
    pub amount: i64,
    pub description: String,
    pub party: String,
    pub client_id: Option<i32>,
    pub karigar_id: Option<i32>,
    pub method: PaymentMethod,
    pub txn_date: NaiveDateTime,
    pub status: TxnStatus,
    pub reference: Option<String>,
}

impl NewTransaction {
    /// Amounts must be positive; direction comes from the type.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        txn_type: TxnType,
        category: TxnCategory,
        amount: i64,
        description: String,
        party: String,
        client_id: Option<i32>,
        karigar_id: Option<i32>,
        method: PaymentMethod,
        txn_date: NaiveDateTime,
        status: TxnStatus,
        reference: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        if amount <= 0 {
            return Err(TypeConstraintError::NonPositiveAmount);
        }
        Ok(Self {
            txn_type,
            category,
            amount,
            description: description.trim().to_string(),
            party: party.trim().to_string(),
            client_id: client_id.filter(|_| category == TxnCategory::Client),
            karigar_id: karigar_id.filter(|_| category == TxnCategory::Karigar),
            method,
            txn_date,
            status,
            reference: reference.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        })
    }

    /// Signed effect on a linked client's balance, mirroring
    /// [`Transaction::balance_effect`].
    #[must_use]
    pub fn balance_effect(&self) -> i64 {
        match self.txn_type {
            TxnType::Receipt => self.amount,
            TxnType::Payment => -self.amount,
        }
    }
}

pub type UpdateTransaction = NewTransaction;

/// Till figures for one calendar day.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DailyTotals {
    /// Rupees received today.
    pub receipts: i64,
    /// Rupees paid out today.
    pub payments: i64,
    pub count: usize,
}

/// Cash or bank account balance shown on the banking tab.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BankAccount {
    pub id: i32,
    pub name: String,
    /// Masked to the trailing four digits.
    pub account_number: String,
    pub balance: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewBankAccount {
    pub name: String,
    pub account_number: String,
    pub balance: i64,
}

impl NewBankAccount {
    #[must_use]
    pub fn new(name: String, account_number: String, balance: i64) -> Self {
        Self {
            name: name.trim().to_string(),
            account_number: mask_account_number(account_number.trim()),
            balance,
        }
    }
}

/// Keep only the last four digits of an account number.
#[must_use]
pub fn mask_account_number(number: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    let tail: String = digits
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{tail}")
}

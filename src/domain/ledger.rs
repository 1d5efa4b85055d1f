use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// One line in a karigar's material ledger.
///
/// Weights are only meaningful for their matching category; a gold entry
/// carries `gold_weight`, a diamond entry `diamond_weight`, a labour entry
/// `labour_charges`. Missing numeric fields count as zero when aggregating.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: i32,
    pub karigar_id: i32,
    pub entry_date: NaiveDate,
    pub entry_type: EntryType,
    pub category: EntryCategory,
    pub description: String,
    pub item_name: Option<String>,
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<String>,
    pub labour_charges: Option<i64>,
    pub amount: i64,
    /// Whether the labour billed on this entry has been paid out.
    pub settled: bool,
    pub reference: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryType {
    #[serde(rename = "issue")]
    Issue,
    #[serde(rename = "receive")]
    Receive,
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Issue => write!(f, "issue"),
            EntryType::Receive => write!(f, "receive"),
        }
    }
}

impl FromStr for EntryType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(EntryType::Issue),
            "receive" => Ok(EntryType::Receive),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryCategory {
    #[serde(rename = "gold")]
    Gold,
    #[serde(rename = "diamond")]
    Diamond,
    #[serde(rename = "labour")]
    Labour,
    #[serde(rename = "other")]
    Other,
}

impl Display for EntryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryCategory::Gold => write!(f, "gold"),
            EntryCategory::Diamond => write!(f, "diamond"),
            EntryCategory::Labour => write!(f, "labour"),
            EntryCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for EntryCategory {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(EntryCategory::Gold),
            "diamond" => Ok(EntryCategory::Diamond),
            "labour" => Ok(EntryCategory::Labour),
            "other" => Ok(EntryCategory::Other),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewLedgerEntry {
    pub karigar_id: i32,
    pub entry_date: NaiveDate,
    pub entry_type: EntryType,
    pub category: EntryCategory,
    pub description: String,
    pub item_name: Option<String>,
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<String>,
    pub labour_charges: Option<i64>,
    pub amount: i64,
    pub settled: bool,
    pub reference: Option<String>,
}

impl NewLedgerEntry {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        karigar_id: i32,
        entry_date: NaiveDate,
        entry_type: EntryType,
        category: EntryCategory,
        description: String,
        item_name: Option<String>,
        gold_weight: Option<f64>,
        gold_karat: Option<i32>,
        diamond_weight: Option<f64>,
        diamond_quality: Option<String>,
        labour_charges: Option<i64>,
        amount: i64,
        reference: Option<String>,
    ) -> Self {
        Self {
            karigar_id,
            entry_date,
            entry_type,
            category,
            description: description.trim().to_string(),
            item_name: item_name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            gold_weight: gold_weight.filter(|_| category == EntryCategory::Gold),
            gold_karat: gold_karat.filter(|_| category == EntryCategory::Gold),
            diamond_weight: diamond_weight.filter(|_| category == EntryCategory::Diamond),
            diamond_quality: diamond_quality
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .filter(|_| category == EntryCategory::Diamond),
            labour_charges: labour_charges.filter(|_| category == EntryCategory::Labour),
            amount,
            // labour starts unpaid; material entries have nothing to settle
            settled: false,
            reference: reference.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        }
    }

    /// Signed effect of this entry on the karigar's stored material balances,
    /// as `(gold grams, diamond carats)`. Issues hand material out, receives
    /// bring it back.
    #[must_use]
    pub fn material_delta(&self) -> (f64, f64) {
        let sign = match self.entry_type {
            EntryType::Issue => 1.0,
            EntryType::Receive => -1.0,
        };
        match self.category {
            EntryCategory::Gold => (sign * self.gold_weight.unwrap_or(0.0), 0.0),
            EntryCategory::Diamond => (0.0, sign * self.diamond_weight.unwrap_or(0.0)),
            EntryCategory::Labour | EntryCategory::Other => (0.0, 0.0),
        }
    }
}

/// Aggregates the ledger screen displays for one karigar.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
pub struct LedgerSummary {
    /// Grams of gold still with the karigar.
    pub gold_balance: f64,
    /// Carats of diamond still with the karigar.
    pub diamond_balance: f64,
    /// Total labour billed on receive entries, in rupees.
    pub total_labour: i64,
    pub labour_settled: i64,
    pub labour_pending: i64,
}

impl LedgerSummary {
    /// Label for a material balance. A positive balance means the karigar
    /// still holds material; zero or negative reads as returned.
    #[must_use]
    pub fn disposition(balance: f64) -> MaterialDisposition {
        if balance > 0.0 {
            MaterialDisposition::WithKarigar
        } else {
            MaterialDisposition::Returned
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum MaterialDisposition {
    #[serde(rename = "With Karigar")]
    WithKarigar,
    #[serde(rename = "Returned")]
    Returned,
}

impl Display for MaterialDisposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialDisposition::WithKarigar => write!(f, "With Karigar"),
            MaterialDisposition::Returned => write!(f, "Returned"),
        }
    }
}

/// Stored material balances of a karigar next to the ones re-derived from
/// the full ledger. Reconciliation overwrites the stored pair with the
/// derived one and hands this back so the caller can see what moved.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct LedgerReconciliation {
    pub stored_gold: f64,
    pub stored_diamond: f64,
    pub derived_gold: f64,
    pub derived_diamond: f64,
}

impl LedgerReconciliation {
    /// Whether the stored balances had drifted from the ledger.
    #[must_use]
    pub fn drifted(&self) -> bool {
        (self.stored_gold - self.derived_gold).abs() > 1e-6
            || (self.stored_diamond - self.derived_diamond).abs() > 1e-6
    }
}

/// Fold a karigar's entries into balances and labour totals.
///
/// The fold is a plain sum, so the result does not depend on entry order,
/// and an empty ledger yields all zeroes.
#[must_use]
pub fn summarize(entries: &[LedgerEntry]) -> LedgerSummary {
    entries.iter().fold(LedgerSummary::default(), |mut acc, entry| {
        match (entry.entry_type, entry.category) {
            (EntryType::Issue, EntryCategory::Gold) => {
                acc.gold_balance += entry.gold_weight.unwrap_or(0.0);
            }
            (EntryType::Receive, EntryCategory::Gold) => {
                acc.gold_balance -= entry.gold_weight.unwrap_or(0.0);
            }
            (EntryType::Issue, EntryCategory::Diamond) => {
                acc.diamond_balance += entry.diamond_weight.unwrap_or(0.0);
            }
            (EntryType::Receive, EntryCategory::Diamond) => {
                acc.diamond_balance -= entry.diamond_weight.unwrap_or(0.0);
            }
            (EntryType::Receive, EntryCategory::Labour) => {
                let charged = entry.labour_charges.unwrap_or(0);
                acc.total_labour += charged;
                if entry.settled {
                    acc.labour_settled += charged;
                } else {
                    acc.labour_pending += charged;
                }
            }
            _ => {}
        }
        acc
    })
}

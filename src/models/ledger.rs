//! Diesel models for the karigar material ledger.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::ledger::{
    LedgerEntry as DomainLedgerEntry, NewLedgerEntry as DomainNewLedgerEntry,
};
use crate::domain::types::TypeConstraintError;
use crate::models::karigar::Karigar;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Karigar))]
#[diesel(table_name = crate::schema::karigar_ledger)]
/// Diesel model for [`crate::domain::ledger::LedgerEntry`].
pub struct LedgerEntry {
    pub id: i32,
    pub karigar_id: i32,
    pub entry_date: NaiveDate,
    pub entry_type: String,
    pub category: String,
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
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::karigar_ledger)]
/// Insertable form of [`LedgerEntry`].
pub struct NewLedgerEntry<'a> {
    pub karigar_id: i32,
    pub entry_date: NaiveDate,
    pub entry_type: String,
    pub category: String,
    pub description: &'a str,
    pub item_name: Option<&'a str>,
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<&'a str>,
    pub labour_charges: Option<i64>,
    pub amount: i64,
    pub settled: bool,
    pub reference: Option<&'a str>,
}

impl TryFrom<LedgerEntry> for DomainLedgerEntry {
    type Error = TypeConstraintError;

    fn try_from(entry: LedgerEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entry.id,
            karigar_id: entry.karigar_id,
            entry_date: entry.entry_date,
            entry_type: entry.entry_type.parse()?,
            category: entry.category.parse()?,
            description: entry.description,
            item_name: entry.item_name,
            gold_weight: entry.gold_weight,
            gold_karat: entry.gold_karat,
            diamond_weight: entry.diamond_weight,
            diamond_quality: entry.diamond_quality,
            labour_charges: entry.labour_charges,
            amount: entry.amount,
            settled: entry.settled,
            reference: entry.reference,
            created_at: entry.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewLedgerEntry> for NewLedgerEntry<'a> {
    fn from(entry: &'a DomainNewLedgerEntry) -> Self {
        Self {
            karigar_id: entry.karigar_id,
            entry_date: entry.entry_date,
            entry_type: entry.entry_type.to_string(),
            category: entry.category.to_string(),
            description: &entry.description,
            item_name: entry.item_name.as_deref(),
            gold_weight: entry.gold_weight,
            gold_karat: entry.gold_karat,
            diamond_weight: entry.diamond_weight,
            diamond_quality: entry.diamond_quality.as_deref(),
            labour_charges: entry.labour_charges,
            amount: entry.amount,
            settled: entry.settled,
            reference: entry.reference.as_deref(),
        }
    }
}

//! Diesel models for money transactions and bank accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::transaction::{
    BankAccount as DomainBankAccount, NewBankAccount as DomainNewBankAccount,
    NewTransaction as DomainNewTransaction, Transaction as DomainTransaction,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::transactions)]
/// Diesel model for [`crate::domain::transaction::Transaction`].
pub struct Transaction {
    pub id: i32,
    pub txn_type: String,
    pub category: String,
    pub amount: i64,
    pub description: String,
    pub party: String,
    pub client_id: Option<i32>,
    pub karigar_id: Option<i32>,
    pub method: String,
    pub txn_date: NaiveDateTime,
    pub status: String,
    pub reference: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::transactions)]
/// Insertable form of [`Transaction`].
pub struct NewTransaction<'a> {
    pub txn_type: String,
    pub category: String,
    pub amount: i64,
    pub description: &'a str,
    pub party: &'a str,
    pub client_id: Option<i32>,
    pub karigar_id: Option<i32>,
    pub method: String,
    pub txn_date: NaiveDateTime,
    pub status: String,
    pub reference: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::transactions)]
/// Replacement values for an edited transaction. Edits rewrite the full row
/// apart from id and creation time.
pub struct UpdateTransaction<'a> {
    pub txn_type: String,
    pub category: String,
    pub amount: i64,
    pub description: &'a str,
    pub party: &'a str,
    pub client_id: Option<Option<i32>>,
    pub karigar_id: Option<Option<i32>>,
    pub method: String,
    pub txn_date: NaiveDateTime,
    pub status: String,
    pub reference: Option<Option<&'a str>>,
}

impl TryFrom<Transaction> for DomainTransaction {
    type Error = TypeConstraintError;

    fn try_from(txn: Transaction) -> Result<Self, Self::Error> {
        Ok(Self {
            id: txn.id,
            txn_type: txn.txn_type.parse()?,
            category: txn.category.parse()?,
            amount: txn.amount,
            description: txn.description,
            party: txn.party,
            client_id: txn.client_id,
            karigar_id: txn.karigar_id,
            method: txn.method.parse()?,
            txn_date: txn.txn_date,
            status: txn.status.parse()?,
            reference: txn.reference,
            created_at: txn.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewTransaction> for NewTransaction<'a> {
    fn from(txn: &'a DomainNewTransaction) -> Self {
        Self {
            txn_type: txn.txn_type.to_string(),
            category: txn.category.to_string(),
            amount: txn.amount,
            description: &txn.description,
            party: &txn.party,
            client_id: txn.client_id,
            karigar_id: txn.karigar_id,
            method: txn.method.to_string(),
            txn_date: txn.txn_date,
            status: txn.status.to_string(),
            reference: txn.reference.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainNewTransaction> for UpdateTransaction<'a> {
    fn from(txn: &'a DomainNewTransaction) -> Self {
        Self {
            txn_type: txn.txn_type.to_string(),
            category: txn.category.to_string(),
            amount: txn.amount,
            description: &txn.description,
            party: &txn.party,
            client_id: Some(txn.client_id),
            karigar_id: Some(txn.karigar_id),
            method: txn.method.to_string(),
            txn_date: txn.txn_date,
            status: txn.status.to_string(),
            reference: Some(txn.reference.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::bank_accounts)]
/// Diesel model for [`crate::domain::transaction::BankAccount`].
pub struct BankAccount {
    pub id: i32,
    pub name: String,
    pub account_number: String,
    pub balance: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bank_accounts)]
/// Insertable form of [`BankAccount`]. The account number arrives already
/// masked from the domain constructor.
pub struct NewBankAccount<'a> {
    pub name: &'a str,
    pub account_number: &'a str,
    pub balance: i64,
}

impl From<BankAccount> for DomainBankAccount {
    fn from(account: BankAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_number: account.account_number,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewBankAccount> for NewBankAccount<'a> {
    fn from(account: &'a DomainNewBankAccount) -> Self {
        Self {
            name: &account.name,
            account_number: &account.account_number,
            balance: account.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::transaction::{PaymentMethod, TxnCategory, TxnStatus, TxnType};

    fn row() -> Transaction {
        let ts = NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        Transaction {
            id: 1,
            txn_type: "receipt".to_string(),
            category: "client".to_string(),
            amount: 245_000,
            description: "Diamond necklace set payment".to_string(),
            party: "Mrs. Sharma".to_string(),
            client_id: Some(1),
            karigar_id: None,
            method: "rtgs".to_string(),
            txn_date: ts,
            status: "completed".to_string(),
            reference: Some("REF123456".to_string()),
            created_at: ts,
        }
    }

    #[test]
    fn transaction_row_parses_into_domain() {
        let domain = DomainTransaction::try_from(row()).unwrap();
        assert_eq!(domain.txn_type, TxnType::Receipt);
        assert_eq!(domain.category, TxnCategory::Client);
        assert_eq!(domain.method, PaymentMethod::Rtgs);
        assert_eq!(domain.status, TxnStatus::Completed);
        assert_eq!(domain.balance_effect(), 245_000);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut bad = row();
        bad.method = "barter".to_string();
        assert!(DomainTransaction::try_from(bad).is_err());
    }

    #[test]
    fn update_changeset_overwrites_party_links() {
        let ts = NaiveDate::from_ymd_opt(2024, 12, 2)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        let domain = DomainNewTransaction::new(
            TxnType::Payment,
            TxnCategory::Expense,
            15_000,
            "Shop rent for December".to_string(),
            "Property Owner".to_string(),
            Some(1),
            None,
            PaymentMethod::Cheque,
            ts,
            TxnStatus::Pending,
            Some("CHQ001".to_string()),
        )
        .unwrap();
        let update: UpdateTransaction = (&domain).into();
        // the expense category drops the client link, and the changeset
        // writes that NULL rather than skipping the column
        assert_eq!(update.client_id, Some(None));
        assert_eq!(update.status, "pending");
    }
}

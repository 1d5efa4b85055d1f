use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::transaction::{
    NewBankAccount, NewTransaction, PaymentMethod, TxnCategory, TxnStatus, TxnType,
};
use crate::forms::{
    FormError, optional_text, parse_amount, parse_optional_date, parse_optional_int,
};

#[derive(Deserialize, Validate)]
/// Form data for recording a money movement.
pub struct AddTransactionForm {
    pub txn_type: String,
    pub category: String,
    pub amount: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub party: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub karigar_id: String,
    pub method: String,
    #[serde(default)]
    pub txn_date: String,
    pub status: String,
    #[serde(default)]
    pub reference: String,
}

impl TryFrom<&AddTransactionForm> for NewTransaction {
    type Error = FormError;

    fn try_from(form: &AddTransactionForm) -> Result<Self, Self::Error> {
        Ok(NewTransaction::new(
            TxnType::from_str(&form.txn_type)?,
            TxnCategory::from_str(&form.category)?,
            parse_amount(&form.amount)?,
            form.description.clone(),
            form.party.clone(),
            parse_optional_int(&form.client_id)?,
            parse_optional_int(&form.karigar_id)?,
            PaymentMethod::from_str(&form.method)?,
            parse_txn_date(&form.txn_date)?,
            TxnStatus::from_str(&form.status)?,
            optional_text(&form.reference),
        )?)
    }
}

#[derive(Deserialize, Validate)]
/// Form data for correcting a recorded transaction.
pub struct SaveTransactionForm {
    /// Transaction identifier.
    pub id: i32,
    pub txn_type: String,
    pub category: String,
    pub amount: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub party: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub karigar_id: String,
    pub method: String,
    #[serde(default)]
    pub txn_date: String,
    pub status: String,
    #[serde(default)]
    pub reference: String,
}

impl TryFrom<&SaveTransactionForm> for NewTransaction {
    type Error = FormError;

    fn try_from(form: &SaveTransactionForm) -> Result<Self, Self::Error> {
        Ok(NewTransaction::new(
            TxnType::from_str(&form.txn_type)?,
            TxnCategory::from_str(&form.category)?,
            parse_amount(&form.amount)?,
            form.description.clone(),
            form.party.clone(),
            parse_optional_int(&form.client_id)?,
            parse_optional_int(&form.karigar_id)?,
            PaymentMethod::from_str(&form.method)?,
            parse_txn_date(&form.txn_date)?,
            TxnStatus::from_str(&form.status)?,
            optional_text(&form.reference),
        )?)
    }
}

/// The form carries a date-only input; the till report buckets by day, so a
/// given date books at midnight and an empty one books right now.
fn parse_txn_date(value: &str) -> Result<NaiveDateTime, FormError> {
    match parse_optional_date(value)? {
        Some(date) => Ok(date.and_time(NaiveTime::MIN)),
        None => Ok(Utc::now().naive_utc()),
    }
}

#[derive(Deserialize, Validate)]
/// Form data for registering a cash or bank account.
pub struct AddBankAccountForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub account_number: String,
    #[serde(default)]
    pub balance: String,
}

impl TryFrom<&AddBankAccountForm> for NewBankAccount {
    type Error = FormError;

    fn try_from(form: &AddBankAccountForm) -> Result<Self, Self::Error> {
        let balance = match form.balance.trim() {
            "" => 0,
            value => parse_amount(value)?,
        };
        Ok(NewBankAccount::new(
            form.name.clone(),
            form.account_number.clone(),
            balance,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn add_form() -> AddTransactionForm {
        AddTransactionForm {
            txn_type: "receipt".to_string(),
            category: "client".to_string(),
            amount: "245000".to_string(),
            description: "Diamond necklace set payment".to_string(),
            party: "Mrs. Priya Sharma".to_string(),
            client_id: "1".to_string(),
            karigar_id: "".to_string(),
            method: "rtgs".to_string(),
            txn_date: "2024-12-08".to_string(),
            status: "completed".to_string(),
            reference: "REF123456".to_string(),
        }
    }

    #[test]
    fn add_transaction_form_links_the_client() {
        let txn = NewTransaction::try_from(&add_form()).unwrap();

        assert_eq!(txn.client_id, Some(1));
        assert_eq!(txn.karigar_id, None);
        assert_eq!(
            txn.txn_date.date(),
            NaiveDate::from_ymd_opt(2024, 12, 8).unwrap()
        );
        assert_eq!(txn.reference.as_deref(), Some("REF123456"));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut form = add_form();
        form.amount = "-500".to_string();

        assert!(matches!(
            NewTransaction::try_from(&form),
            Err(FormError::InvalidAmount)
        ));
    }

    #[test]
    fn bank_account_form_masks_the_number() {
        let form = AddBankAccountForm {
            name: "HDFC Bank".to_string(),
            account_number: "50100123451234".to_string(),
            balance: "5500000".to_string(),
        };

        let account = NewBankAccount::try_from(&form).unwrap();

        assert_eq!(account.account_number, "****1234");
        assert_eq!(account.balance, 5_500_000);
    }
}

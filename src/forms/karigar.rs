//! Forms for the karigar screens: artisan onboarding, work orders and the
//! material ledger actions (issue gold, issue diamonds, receive jewelry).

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::karigar::{NewKarigar, NewKarigarOrder, OrderStatus, UpdateKarigarOrder};
use crate::domain::types::PhoneNumber;
use crate::forms::{
    FormError, optional_text, parse_optional_amount, parse_optional_date, parse_optional_int,
    parse_optional_weight,
};

#[derive(Deserialize, Validate)]
/// Form data for onboarding a karigar. Specializations arrive as one
/// comma-separated field.
pub struct AddKarigarForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub rating: String,
}

impl TryFrom<&AddKarigarForm> for NewKarigar {
    type Error = FormError;

    fn try_from(form: &AddKarigarForm) -> Result<Self, Self::Error> {
        let phone = PhoneNumber::new(form.phone.clone())?;
        let specialization = form
            .specialization
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<String>>();
        let rating = match form.rating.trim() {
            "" => 0.0,
            value => value
                .parse::<f64>()
                .map_err(|_| FormError::InvalidValue(format!("not a rating: {value}")))?,
        };
        Ok(NewKarigar::new(
            form.name.clone(),
            phone.into_inner(),
            specialization,
            rating,
        ))
    }
}

#[derive(Deserialize, Validate)]
/// Form data for placing a work order with a karigar.
pub struct AddOrderForm {
    pub karigar_id: i32,
    #[validate(length(min = 1))]
    pub item_type: String,
    #[serde(default)]
    pub gold_weight: String,
    #[serde(default)]
    pub diamond_count: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub notes: String,
}

impl TryFrom<&AddOrderForm> for NewKarigarOrder {
    type Error = FormError;

    fn try_from(form: &AddOrderForm) -> Result<Self, Self::Error> {
        Ok(NewKarigarOrder::new(
            form.karigar_id,
            form.item_type.clone(),
            parse_optional_weight(&form.gold_weight)?,
            parse_optional_int(&form.diamond_count)?,
            parse_optional_date(&form.due_date)?,
            optional_text(&form.notes),
        ))
    }
}

#[derive(Deserialize, Validate)]
/// Status advance or delivery scheduling for an existing order.
pub struct ScheduleOrderForm {
    /// Order identifier.
    pub id: i32,
    pub status: String,
    #[serde(default)]
    pub expected_delivery: String,
    #[serde(default)]
    pub notes: String,
}

impl TryFrom<&ScheduleOrderForm> for UpdateKarigarOrder {
    type Error = FormError;

    fn try_from(form: &ScheduleOrderForm) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_str(&form.status)?;
        Ok(UpdateKarigarOrder::new(
            status,
            parse_optional_date(&form.expected_delivery)?,
            optional_text(&form.notes),
        ))
    }
}

#[derive(Deserialize, Validate)]
/// Form data for handing gold out to a karigar.
pub struct IssueGoldForm {
    pub karigar_id: i32,
    #[serde(default)]
    pub entry_date: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub item_name: String,
    pub gold_weight: String,
    pub gold_karat: String,
    /// Valuation rate in rupees per gram. Empty falls back to the shop rate.
    #[serde(default)]
    pub rate: String,
    #[serde(default)]
    pub reference: String,
}

/// Parsed issue-gold request. The rupee valuation is computed by the service
/// from the weight and rate.
pub struct IssueGoldPayload {
    pub karigar_id: i32,
    pub entry_date: Option<NaiveDate>,
    pub description: String,
    pub item_name: Option<String>,
    pub gold_weight: f64,
    pub gold_karat: i32,
    pub rate: Option<i64>,
    pub reference: Option<String>,
}

impl TryFrom<&IssueGoldForm> for IssueGoldPayload {
    type Error = FormError;

    fn try_from(form: &IssueGoldForm) -> Result<Self, Self::Error> {
        let gold_weight = parse_optional_weight(&form.gold_weight)?
            .filter(|w| *w > 0.0)
            .ok_or_else(|| FormError::InvalidValue("gold weight is required".to_string()))?;
        let gold_karat = parse_optional_int(&form.gold_karat)?
            .ok_or_else(|| FormError::InvalidValue("gold karat is required".to_string()))?;
        Ok(Self {
            karigar_id: form.karigar_id,
            entry_date: parse_optional_date(&form.entry_date)?,
            description: form.description.clone(),
            item_name: optional_text(&form.item_name),
            gold_weight,
            gold_karat,
            rate: parse_optional_amount(&form.rate)?,
            reference: optional_text(&form.reference),
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for handing diamonds out to a karigar.
pub struct IssueDiamondForm {
    pub karigar_id: i32,
    #[serde(default)]
    pub entry_date: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub item_name: String,
    pub diamond_weight: String,
    #[serde(default)]
    pub diamond_quality: String,
    /// Valuation rate in rupees per carat. Empty falls back to the shop rate.
    #[serde(default)]
    pub rate: String,
    #[serde(default)]
    pub reference: String,
}

/// Parsed issue-diamond request.
pub struct IssueDiamondPayload {
    pub karigar_id: i32,
    pub entry_date: Option<NaiveDate>,
    pub description: String,
    pub item_name: Option<String>,
    pub diamond_weight: f64,
    pub diamond_quality: Option<String>,
    pub rate: Option<i64>,
    pub reference: Option<String>,
}

impl TryFrom<&IssueDiamondForm> for IssueDiamondPayload {
    type Error = FormError;

    fn try_from(form: &IssueDiamondForm) -> Result<Self, Self::Error> {
        let diamond_weight = parse_optional_weight(&form.diamond_weight)?
            .filter(|w| *w > 0.0)
            .ok_or_else(|| FormError::InvalidValue("diamond weight is required".to_string()))?;
        Ok(Self {
            karigar_id: form.karigar_id,
            entry_date: parse_optional_date(&form.entry_date)?,
            description: form.description.clone(),
            item_name: optional_text(&form.item_name),
            diamond_weight,
            diamond_quality: optional_text(&form.diamond_quality),
            rate: parse_optional_amount(&form.rate)?,
            reference: optional_text(&form.reference),
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for booking a finished piece back in. One submission may carry
/// gold, diamonds and labour charges together.
pub struct ReceiveJewelryForm {
    pub karigar_id: i32,
    #[serde(default)]
    pub entry_date: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub item_name: String,
    #[serde(default)]
    pub gold_weight: String,
    #[serde(default)]
    pub gold_karat: String,
    #[serde(default)]
    pub diamond_weight: String,
    #[serde(default)]
    pub diamond_quality: String,
    #[serde(default)]
    pub labour_charges: String,
    #[serde(default)]
    pub reference: String,
}

/// Parsed receive-jewelry request. The service splits it into one ledger
/// entry per material plus a labour entry.
pub struct ReceiveJewelryPayload {
    pub karigar_id: i32,
    pub entry_date: Option<NaiveDate>,
    pub description: String,
    pub item_name: String,
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<String>,
    pub labour_charges: Option<i64>,
    pub reference: Option<String>,
}

impl TryFrom<&ReceiveJewelryForm> for ReceiveJewelryPayload {
    type Error = FormError;

    fn try_from(form: &ReceiveJewelryForm) -> Result<Self, Self::Error> {
        let payload = Self {
            karigar_id: form.karigar_id,
            entry_date: parse_optional_date(&form.entry_date)?,
            description: form.description.clone(),
            item_name: form.item_name.trim().to_string(),
            gold_weight: parse_optional_weight(&form.gold_weight)?.filter(|w| *w > 0.0),
            gold_karat: parse_optional_int(&form.gold_karat)?,
            diamond_weight: parse_optional_weight(&form.diamond_weight)?.filter(|w| *w > 0.0),
            diamond_quality: optional_text(&form.diamond_quality),
            labour_charges: parse_optional_amount(&form.labour_charges)?.filter(|c| *c > 0),
            reference: optional_text(&form.reference),
        };
        if payload.gold_weight.is_none()
            && payload.diamond_weight.is_none()
            && payload.labour_charges.is_none()
        {
            return Err(FormError::InvalidValue(
                "nothing to receive: enter gold, diamonds or labour".to_string(),
            ));
        }
        Ok(payload)
    }
}

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::harvest::{NewHarvestPlan, PlanStatus, PlanType, UpdateHarvestPlan};
use crate::domain::transaction::PaymentMethod;
use crate::forms::{FormError, parse_amount, parse_date, parse_optional_date};

#[derive(Deserialize, Validate)]
/// Form data for enrolling a client into a savings group.
pub struct AddPlanForm {
    pub client_id: i32,
    pub plan_type: String,
    pub group_no: i32,
    pub monthly_amount: String,
    pub start_date: String,
}

impl TryFrom<&AddPlanForm> for NewHarvestPlan {
    type Error = FormError;

    fn try_from(form: &AddPlanForm) -> Result<Self, Self::Error> {
        let plan_type = PlanType::from_str(&form.plan_type)?;
        let monthly_amount = parse_amount(&form.monthly_amount)?;
        if monthly_amount <= 0 {
            return Err(FormError::InvalidAmount);
        }
        Ok(NewHarvestPlan::new(
            form.client_id,
            plan_type,
            form.group_no,
            monthly_amount,
            parse_date(&form.start_date)?,
        ))
    }
}

#[derive(Deserialize, Validate)]
/// Form data for editing a plan. Only the plan type and the monthly amount
/// are editable after enrolment.
pub struct SavePlanForm {
    /// Plan identifier.
    pub id: i32,
    pub plan_type: String,
    pub monthly_amount: String,
}

impl TryFrom<&SavePlanForm> for UpdateHarvestPlan {
    type Error = FormError;

    fn try_from(form: &SavePlanForm) -> Result<Self, Self::Error> {
        let plan_type = PlanType::from_str(&form.plan_type)?;
        let monthly_amount = parse_amount(&form.monthly_amount)?;
        if monthly_amount <= 0 {
            return Err(FormError::InvalidAmount);
        }
        Ok(UpdateHarvestPlan {
            plan_type,
            monthly_amount,
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for booking one instalment as paid.
pub struct PayInstalmentForm {
    pub plan_id: i32,
    /// Zero-based instalment slot.
    pub seq: i32,
    #[serde(default)]
    pub paid_date: String,
    pub method: String,
}

/// Parsed instalment payment. An absent date means "today".
pub struct PayInstalmentPayload {
    pub plan_id: i32,
    pub seq: i32,
    pub paid_date: Option<NaiveDate>,
    pub method: PaymentMethod,
}

impl TryFrom<&PayInstalmentForm> for PayInstalmentPayload {
    type Error = FormError;

    fn try_from(form: &PayInstalmentForm) -> Result<Self, Self::Error> {
        let method = PaymentMethod::from_str(&form.method)?;
        Ok(Self {
            plan_id: form.plan_id,
            seq: form.seq,
            paid_date: parse_optional_date(&form.paid_date)?,
            method,
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for closing a plan out: full redemption or an early exit.
pub struct RedeemPlanForm {
    /// Plan identifier.
    pub id: i32,
    pub status: String,
}

impl RedeemPlanForm {
    pub fn target_status(&self) -> Result<PlanStatus, FormError> {
        Ok(PlanStatus::from_str(&self.status)?)
    }
}

#[derive(Deserialize, Validate)]
/// Form data for running a lucky draw over one group.
pub struct DrawForm {
    pub group_no: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_plan_form_derives_the_end_date() {
        let form = AddPlanForm {
            client_id: 1,
            plan_type: "diamond".to_string(),
            group_no: 10,
            monthly_amount: "25000".to_string(),
            start_date: "2024-01-01".to_string(),
        };

        let plan = NewHarvestPlan::try_from(&form).unwrap();

        assert_eq!(plan.plan_type, PlanType::Diamond);
        assert_eq!(plan.end_date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn pay_instalment_form_rejects_unknown_method() {
        let form = PayInstalmentForm {
            plan_id: 1,
            seq: 3,
            paid_date: "".to_string(),
            method: "barter".to_string(),
        };

        assert!(matches!(
            PayInstalmentPayload::try_from(&form),
            Err(FormError::InvalidValue(_))
        ));
    }

    #[test]
    fn zero_monthly_amount_is_rejected() {
        let form = AddPlanForm {
            client_id: 1,
            plan_type: "gold".to_string(),
            group_no: 11,
            monthly_amount: "0".to_string(),
            start_date: "2024-01-01".to_string(),
        };

        assert!(matches!(
            NewHarvestPlan::try_from(&form),
            Err(FormError::InvalidAmount)
        ));
    }
}

//! Diesel models for harvest savings plans, their instalment slots and
//! recorded lucky draws.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::harvest::{
    HarvestPlan as DomainHarvestPlan, LuckyDraw as DomainLuckyDraw,
    NewHarvestPlan as DomainNewHarvestPlan, NewLuckyDraw as DomainNewLuckyDraw,
    Payment as DomainPayment,
};
use crate::domain::types::TypeConstraintError;
use crate::models::client::Client;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Client))]
#[diesel(table_name = crate::schema::harvest_plans)]
/// Diesel model for [`crate::domain::harvest::HarvestPlan`].
pub struct HarvestPlan {
    pub id: i32,
    pub client_id: i32,
    pub plan_type: String,
    pub group_no: i32,
    pub registration_no: i32,
    pub monthly_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::harvest_plans)]
/// Insertable form of [`HarvestPlan`]. The registration number is assigned
/// by the store when the plan row is written, never by callers.
pub struct NewHarvestPlan {
    pub client_id: i32,
    pub plan_type: String,
    pub group_no: i32,
    pub registration_no: i32,
    pub monthly_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewHarvestPlan {
    #[must_use]
    pub fn new(plan: &DomainNewHarvestPlan, registration_no: i32) -> Self {
        Self {
            client_id: plan.client_id,
            plan_type: plan.plan_type.to_string(),
            group_no: plan.group_no,
            registration_no,
            monthly_amount: plan.monthly_amount,
            start_date: plan.start_date,
            end_date: plan.end_date,
        }
    }
}

impl TryFrom<HarvestPlan> for DomainHarvestPlan {
    type Error = TypeConstraintError;

    fn try_from(plan: HarvestPlan) -> Result<Self, Self::Error> {
        Ok(Self {
            id: plan.id,
            client_id: plan.client_id,
            plan_type: plan.plan_type.parse()?,
            group_no: plan.group_no,
            registration_no: plan.registration_no,
            monthly_amount: plan.monthly_amount,
            start_date: plan.start_date,
            end_date: plan.end_date,
            status: plan.status.parse()?,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(HarvestPlan, foreign_key = plan_id))]
#[diesel(table_name = crate::schema::harvest_payments)]
/// Diesel model for [`crate::domain::harvest::Payment`].
pub struct Payment {
    pub id: i32,
    pub plan_id: i32,
    pub seq: i32,
    pub month_label: String,
    pub paid_date: Option<NaiveDate>,
    pub amount: i64,
    pub method: Option<String>,
    pub status: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::harvest_payments)]
/// One pending instalment slot, written in a batch of twelve alongside the
/// plan row.
pub struct NewPayment<'a> {
    pub plan_id: i32,
    pub seq: i32,
    pub month_label: &'a str,
    pub amount: i64,
}

impl TryFrom<Payment> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(payment: Payment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: payment.id,
            plan_id: payment.plan_id,
            seq: payment.seq,
            month_label: payment.month_label,
            paid_date: payment.paid_date,
            amount: payment.amount,
            method: payment.method.as_deref().map(str::parse).transpose()?,
            status: payment.status.parse()?,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::lucky_draws)]
/// Diesel model for [`crate::domain::harvest::LuckyDraw`].
pub struct LuckyDraw {
    pub id: i32,
    pub group_no: i32,
    pub seed: i64,
    pub winner_no: i32,
    pub plan_id: Option<i32>,
    pub drawn_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::lucky_draws)]
/// Insertable form of [`LuckyDraw`].
pub struct NewLuckyDraw {
    pub group_no: i32,
    pub seed: i64,
    pub winner_no: i32,
    pub plan_id: Option<i32>,
}

impl From<LuckyDraw> for DomainLuckyDraw {
    fn from(draw: LuckyDraw) -> Self {
        Self {
            id: draw.id,
            group_no: draw.group_no,
            seed: draw.seed,
            winner_no: draw.winner_no,
            plan_id: draw.plan_id,
            drawn_at: draw.drawn_at,
        }
    }
}

impl From<&DomainNewLuckyDraw> for NewLuckyDraw {
    fn from(draw: &DomainNewLuckyDraw) -> Self {
        Self {
            group_no: draw.group_no,
            seed: draw.seed,
            winner_no: draw.winner_no,
            plan_id: draw.plan_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::harvest::{PaymentStatus, PlanStatus, PlanType};
    use crate::domain::transaction::PaymentMethod;

    #[test]
    fn plan_row_parses_into_domain() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let plan = HarvestPlan {
            id: 1,
            client_id: 1,
            plan_type: "diamond".to_string(),
            group_no: 10,
            registration_no: 15,
            monthly_amount: 25_000,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            status: "active".to_string(),
            created_at: ts,
            updated_at: ts,
        };
        let domain = DomainHarvestPlan::try_from(plan).unwrap();
        assert_eq!(domain.plan_type, PlanType::Diamond);
        assert_eq!(domain.status, PlanStatus::Active);
        assert_eq!(domain.registration_no, 15);
    }

    #[test]
    fn new_plan_takes_assigned_registration() {
        let domain = DomainNewHarvestPlan::new(
            2,
            PlanType::Gold,
            11,
            15_000,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let row = NewHarvestPlan::new(&domain, 8);
        assert_eq!(row.registration_no, 8);
        assert_eq!(row.plan_type, "gold");
        assert_eq!(row.end_date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn payment_row_parses_method_and_status() {
        let paid = Payment {
            id: 1,
            plan_id: 1,
            seq: 0,
            month_label: "Jan 2024".to_string(),
            paid_date: NaiveDate::from_ymd_opt(2024, 1, 5),
            amount: 25_000,
            method: Some("rtgs".to_string()),
            status: "paid".to_string(),
        };
        let domain = DomainPayment::try_from(paid).unwrap();
        assert_eq!(domain.method, Some(PaymentMethod::Rtgs));
        assert_eq!(domain.status, PaymentStatus::Paid);

        let pending = Payment {
            id: 2,
            plan_id: 1,
            seq: 1,
            month_label: "Feb 2024".to_string(),
            paid_date: None,
            amount: 25_000,
            method: None,
            status: "pending".to_string(),
        };
        let domain = DomainPayment::try_from(pending).unwrap();
        assert_eq!(domain.method, None);
        assert_eq!(domain.status, PaymentStatus::Pending);
    }
}

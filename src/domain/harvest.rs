use std::fmt::Display;
use std::str::FromStr;

use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::transaction::PaymentMethod;
use crate::domain::types::TypeConstraintError;

/// Number of monthly instalments in every savings plan.
pub const PLAN_MONTHS: usize = 12;

/// Registration numbers run 1 through 75 within a group; the number doubles
/// as the holder's lucky-draw ticket.
pub const GROUP_CAPACITY: i32 = 75;

/// Twelve-month jewelry savings scheme ("harvest plan").
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HarvestPlan {
    pub id: i32,
    pub client_id: i32,
    pub plan_type: PlanType,
    pub group_no: i32,
    pub registration_no: i32,
    pub monthly_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PlanStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanType {
    #[serde(rename = "gold")]
    Gold,
    #[serde(rename = "diamond")]
    Diamond,
}

impl Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanType::Gold => write!(f, "gold"),
            PlanType::Diamond => write!(f, "diamond"),
        }
    }
}

impl FromStr for PlanType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(PlanType::Gold),
            "diamond" => Ok(PlanType::Diamond),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "redeemed")]
    Redeemed,
    #[serde(rename = "early-redeemed")]
    EarlyRedeemed,
}

impl Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::Active => write!(f, "active"),
            PlanStatus::Completed => write!(f, "completed"),
            PlanStatus::Redeemed => write!(f, "redeemed"),
            PlanStatus::EarlyRedeemed => write!(f, "early-redeemed"),
        }
    }
}

impl FromStr for PlanStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PlanStatus::Active),
            "completed" => Ok(PlanStatus::Completed),
            "redeemed" => Ok(PlanStatus::Redeemed),
            "early-redeemed" => Ok(PlanStatus::EarlyRedeemed),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

impl PlanStatus {
    /// Redemption is only offered once saving has finished; an active plan
    /// can still be closed out early.
    #[must_use]
    pub fn can_transition_to(self, next: PlanStatus) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Active, PlanStatus::Completed)
                | (PlanStatus::Active, PlanStatus::EarlyRedeemed)
                | (PlanStatus::Completed, PlanStatus::Redeemed)
        )
    }
}

/// One instalment slot of a plan. Twelve are created with the plan and only
/// their status/date/method ever change.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i32,
    pub plan_id: i32,
    /// Zero-based slot index, 0 through 11.
    pub seq: i32,
    pub month_label: String,
    pub paid_date: Option<NaiveDate>,
    pub amount: i64,
    pub method: Option<PaymentMethod>,
    pub status: PaymentStatus,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    #[serde(rename = "paid")]
    Paid,
    #[serde(rename = "pending")]
    Pending,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Pending => write!(f, "pending"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewHarvestPlan {
    pub client_id: i32,
    pub plan_type: PlanType,
    pub group_no: i32,
    pub monthly_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewHarvestPlan {
    /// A plan spans exactly twelve months from its start date.
    #[must_use]
    pub fn new(
        client_id: i32,
        plan_type: PlanType,
        group_no: i32,
        monthly_amount: i64,
        start_date: NaiveDate,
    ) -> Self {
        let end_date = (start_date + Months::new(PLAN_MONTHS as u32))
            .pred_opt()
            .unwrap_or(start_date);
        Self {
            client_id,
            plan_type,
            group_no,
            monthly_amount,
            start_date,
            end_date,
        }
    }
}

/// Edit applied to an existing plan. Identity fields (group, registration,
/// holder, dates) never change; a new monthly amount retargets the pending
/// instalment slots while paid ones keep their historical amount.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UpdateHarvestPlan {
    pub plan_type: PlanType,
    pub monthly_amount: i64,
}

/// Month labels for the twelve instalment slots, starting at the plan's
/// first month ("Jan 2024", "Feb 2024", ...).
#[must_use]
pub fn month_labels(start_date: NaiveDate) -> Vec<String> {
    (0..PLAN_MONTHS as u32)
        .map(|offset| (start_date + Months::new(offset)).format("%b %Y").to_string())
        .collect()
}

/// Progress figures derived from a plan's instalment slots.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct PlanProgress {
    pub paid_count: usize,
    pub total_paid: i64,
    pub remaining: i64,
}

/// Derive paid/remaining figures from the instalments. Totals are never
/// stored on the plan row, so they cannot drift from the slot states.
#[must_use]
pub fn plan_progress(monthly_amount: i64, payments: &[Payment]) -> PlanProgress {
    let (paid_count, total_paid) = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Paid)
        .fold((0usize, 0i64), |(count, sum), p| (count + 1, sum + p.amount));
    PlanProgress {
        paid_count,
        total_paid,
        remaining: monthly_amount * PLAN_MONTHS as i64 - total_paid,
    }
}

/// Recorded outcome of a lucky draw, persisted before the winner is shown.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LuckyDraw {
    pub id: i32,
    pub group_no: i32,
    /// RNG seed the winning number was derived from.
    pub seed: i64,
    pub winner_no: i32,
    /// Plan holding the winning registration, when one matched.
    pub plan_id: Option<i32>,
    pub drawn_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewLuckyDraw {
    pub group_no: i32,
    pub seed: i64,
    pub winner_no: i32,
    pub plan_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn slot(seq: i32, amount: i64, status: PaymentStatus) -> Payment {
        Payment {
            id: seq + 1,
            plan_id: 1,
            seq,
            month_label: format!("slot {seq}"),
            paid_date: (status == PaymentStatus::Paid).then(|| date(2024, 1, 5)),
            amount,
            method: Some(PaymentMethod::Rtgs),
            status,
        }
    }

    #[test]
    fn plan_spans_twelve_months() {
        let plan = NewHarvestPlan::new(1, PlanType::Diamond, 10, 25_000, date(2024, 1, 1));
        assert_eq!(plan.end_date, date(2024, 12, 31));

        let mid_month = NewHarvestPlan::new(1, PlanType::Gold, 11, 15_000, date(2024, 3, 15));
        assert_eq!(mid_month.end_date, date(2025, 3, 14));
    }

    #[test]
    fn month_labels_follow_start_month() {
        let labels = month_labels(date(2024, 1, 1));
        assert_eq!(labels.len(), PLAN_MONTHS);
        assert_eq!(labels.first().map(String::as_str), Some("Jan 2024"));
        assert_eq!(labels.last().map(String::as_str), Some("Dec 2024"));

        let from_november = month_labels(date(2024, 11, 1));
        assert_eq!(from_november[0], "Nov 2024");
        assert_eq!(from_november[2], "Jan 2025");
    }

    #[test]
    fn progress_follows_paid_slots() {
        let mut payments: Vec<Payment> = (0..12)
            .map(|seq| slot(seq, 25_000, if seq < 10 { PaymentStatus::Paid } else { PaymentStatus::Pending }))
            .collect();
        let progress = plan_progress(25_000, &payments);
        assert_eq!(progress.paid_count, 10);
        assert_eq!(progress.total_paid, 250_000);
        assert_eq!(progress.remaining, 50_000);

        for payment in &mut payments {
            payment.status = PaymentStatus::Paid;
        }
        let done = plan_progress(25_000, &payments);
        assert_eq!(done.paid_count, 12);
        assert_eq!(done.remaining, 0);
    }

    #[test]
    fn progress_of_fresh_plan_is_full_outstanding() {
        let payments: Vec<Payment> = (0..12).map(|seq| slot(seq, 15_000, PaymentStatus::Pending)).collect();
        let progress = plan_progress(15_000, &payments);
        assert_eq!(progress.paid_count, 0);
        assert_eq!(progress.total_paid, 0);
        assert_eq!(progress.remaining, 180_000);
    }

    #[test]
    fn status_transitions_gate_redemption() {
        assert!(PlanStatus::Active.can_transition_to(PlanStatus::Completed));
        assert!(PlanStatus::Active.can_transition_to(PlanStatus::EarlyRedeemed));
        assert!(PlanStatus::Completed.can_transition_to(PlanStatus::Redeemed));
        assert!(!PlanStatus::Active.can_transition_to(PlanStatus::Redeemed));
        assert!(!PlanStatus::Redeemed.can_transition_to(PlanStatus::Active));
        assert!(!PlanStatus::Completed.can_transition_to(PlanStatus::EarlyRedeemed));
    }
}

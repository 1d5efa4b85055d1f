use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Subcontracted artisan who works shop material into finished pieces.
///
/// `gold_balance`/`diamond_balance` track material currently with the
/// karigar. They are kept in step with the ledger on every write and can be
/// re-derived from the full entry history to detect drift.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Karigar {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub specialization: Vec<String>,
    /// Workmanship rating on a 0 to 5 scale.
    pub rating: f64,
    /// Grams of gold owed back to the shop.
    pub gold_balance: f64,
    /// Carats of diamond owed back to the shop.
    pub diamond_balance: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewKarigar {
    pub name: String,
    pub phone: String,
    pub specialization: Vec<String>,
    pub rating: f64,
}

impl NewKarigar {
    #[must_use]
    pub fn new(name: String, phone: String, specialization: Vec<String>, rating: f64) -> Self {
        Self {
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            specialization: normalize_specialization(specialization),
            rating: rating.clamp(0.0, 5.0),
        }
    }
}

fn normalize_specialization(values: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = values
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    cleaned.dedup();
    cleaned
}

/// Work order placed with a karigar.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KarigarOrder {
    pub id: i32,
    pub karigar_id: i32,
    pub item_type: String,
    pub gold_weight: Option<f64>,
    pub diamond_count: Option<i32>,
    pub status: OrderStatus,
    pub due_date: Option<NaiveDate>,
    pub expected_delivery: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl KarigarOrder {
    /// Orders still on the karigar's bench.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status != OrderStatus::Completed
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "issued")]
    Issued,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "qc-pending")]
    QcPending,
    #[serde(rename = "completed")]
    Completed,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Issued => write!(f, "issued"),
            OrderStatus::InProgress => write!(f, "in-progress"),
            OrderStatus::QcPending => write!(f, "qc-pending"),
            OrderStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "issued" => Ok(OrderStatus::Issued),
            "in-progress" => Ok(OrderStatus::InProgress),
            "qc-pending" => Ok(OrderStatus::QcPending),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewKarigarOrder {
    pub karigar_id: i32,
    pub item_type: String,
    pub gold_weight: Option<f64>,
    pub diamond_count: Option<i32>,
    pub status: OrderStatus,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewKarigarOrder {
    #[must_use]
    pub fn new(
        karigar_id: i32,
        item_type: String,
        gold_weight: Option<f64>,
        diamond_count: Option<i32>,
        due_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Self {
        Self {
            karigar_id,
            item_type: item_type.trim().to_string(),
            gold_weight,
            diamond_count,
            status: OrderStatus::Pending,
            due_date,
            notes: notes.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        }
    }
}

/// Status advance or delivery scheduling applied to an existing order.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateKarigarOrder {
    pub status: OrderStatus,
    pub expected_delivery: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl UpdateKarigarOrder {
    #[must_use]
    pub fn new(status: OrderStatus, expected_delivery: Option<NaiveDate>, notes: Option<String>) -> Self {
        Self {
            status,
            expected_delivery,
            notes: notes.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialization_is_trimmed_and_deduped() {
        let karigar = NewKarigar::new(
            " Rajesh Kumar ".to_string(),
            "+91-9876543210".to_string(),
            vec![
                " Gold Jewelry ".to_string(),
                "Gold Jewelry".to_string(),
                String::new(),
                "Diamond Setting".to_string(),
            ],
            4.8,
        );
        assert_eq!(karigar.name, "Rajesh Kumar");
        assert_eq!(
            karigar.specialization,
            vec!["Gold Jewelry".to_string(), "Diamond Setting".to_string()]
        );
    }

    #[test]
    fn rating_is_clamped_to_scale() {
        assert_eq!(
            NewKarigar::new("A".into(), "B".into(), vec![], 7.2).rating,
            5.0
        );
        assert_eq!(
            NewKarigar::new("A".into(), "B".into(), vec![], -1.0).rating,
            0.0
        );
    }

    #[test]
    fn completed_orders_are_not_open() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut order = KarigarOrder {
            id: 1,
            karigar_id: 1,
            item_type: "Ring".to_string(),
            gold_weight: Some(5.2),
            diamond_count: Some(1),
            status: OrderStatus::InProgress,
            due_date: None,
            expected_delivery: None,
            notes: None,
            created_at: ts,
            updated_at: ts,
        };
        assert!(order.is_open());
        order.status = OrderStatus::Completed;
        assert!(!order.is_open());
    }

    #[test]
    fn order_status_round_trips_through_str() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Issued,
            OrderStatus::InProgress,
            OrderStatus::QcPending,
            OrderStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}

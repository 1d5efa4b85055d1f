//! Diesel models for karigars and their work orders.
//!
//! `specialization` is stored as a comma separated list and split back into
//! a `Vec<String>` on the way out.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::karigar::{
    Karigar as DomainKarigar, KarigarOrder as DomainKarigarOrder,
    NewKarigar as DomainNewKarigar, NewKarigarOrder as DomainNewKarigarOrder,
    UpdateKarigarOrder as DomainUpdateKarigarOrder,
};
use crate::domain::types::TypeConstraintError;

pub(crate) fn join_specialization(values: &[String]) -> String {
    values.join(", ")
}

pub(crate) fn split_specialization(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::karigars)]
/// Diesel model for [`crate::domain::karigar::Karigar`].
pub struct Karigar {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub specialization: String,
    pub rating: f64,
    pub gold_balance: f64,
    pub diamond_balance: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::karigars)]
/// Insertable form of [`Karigar`]. Material balances start at the column
/// defaults and only move through ledger writes.
pub struct NewKarigar<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub specialization: String,
    pub rating: f64,
}

impl From<Karigar> for DomainKarigar {
    fn from(karigar: Karigar) -> Self {
        Self {
            id: karigar.id,
            name: karigar.name,
            phone: karigar.phone,
            specialization: split_specialization(&karigar.specialization),
            rating: karigar.rating,
            gold_balance: karigar.gold_balance,
            diamond_balance: karigar.diamond_balance,
            created_at: karigar.created_at,
            updated_at: karigar.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewKarigar> for NewKarigar<'a> {
    fn from(karigar: &'a DomainNewKarigar) -> Self {
        Self {
            name: &karigar.name,
            phone: &karigar.phone,
            specialization: join_specialization(&karigar.specialization),
            rating: karigar.rating,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Karigar))]
#[diesel(table_name = crate::schema::karigar_orders)]
/// Diesel model for [`crate::domain::karigar::KarigarOrder`].
pub struct KarigarOrder {
    pub id: i32,
    pub karigar_id: i32,
    pub item_type: String,
    pub gold_weight: Option<f64>,
    pub diamond_count: Option<i32>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub expected_delivery: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::karigar_orders)]
/// Insertable form of [`KarigarOrder`].
pub struct NewKarigarOrder<'a> {
    pub karigar_id: i32,
    pub item_type: &'a str,
    pub gold_weight: Option<f64>,
    pub diamond_count: Option<i32>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::karigar_orders)]
/// Status advance applied to a [`KarigarOrder`].
pub struct UpdateKarigarOrder<'a> {
    pub status: String,
    pub expected_delivery: Option<Option<NaiveDate>>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<KarigarOrder> for DomainKarigarOrder {
    type Error = TypeConstraintError;

    fn try_from(order: KarigarOrder) -> Result<Self, Self::Error> {
        Ok(Self {
            id: order.id,
            karigar_id: order.karigar_id,
            item_type: order.item_type,
            gold_weight: order.gold_weight,
            diamond_count: order.diamond_count,
            status: order.status.parse()?,
            due_date: order.due_date,
            expected_delivery: order.expected_delivery,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewKarigarOrder> for NewKarigarOrder<'a> {
    fn from(order: &'a DomainNewKarigarOrder) -> Self {
        Self {
            karigar_id: order.karigar_id,
            item_type: &order.item_type,
            gold_weight: order.gold_weight,
            diamond_count: order.diamond_count,
            status: order.status.to_string(),
            due_date: order.due_date,
            notes: order.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateKarigarOrder> for UpdateKarigarOrder<'a> {
    fn from(order: &'a DomainUpdateKarigarOrder) -> Self {
        Self {
            status: order.status.to_string(),
            expected_delivery: Some(order.expected_delivery),
            notes: Some(order.notes.as_deref()),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::karigar::OrderStatus;

    #[test]
    fn specialization_round_trips_through_text() {
        let values = vec!["Gold Jewelry".to_string(), "Diamond Setting".to_string()];
        let joined = join_specialization(&values);
        assert_eq!(joined, "Gold Jewelry, Diamond Setting");
        assert_eq!(split_specialization(&joined), values);
        assert!(split_specialization("").is_empty());
    }

    #[test]
    fn karigar_row_converts_into_domain() {
        let ts = NaiveDate::from_ymd_opt(2024, 11, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let domain: DomainKarigar = Karigar {
            id: 1,
            name: "Rajesh Kumar".to_string(),
            phone: "+91-9876543210".to_string(),
            specialization: "Gold Jewelry".to_string(),
            rating: 4.8,
            gold_balance: 64.8,
            diamond_balance: 0.0,
            created_at: ts,
            updated_at: ts,
        }
        .into();
        assert_eq!(domain.specialization, vec!["Gold Jewelry".to_string()]);
        assert_eq!(domain.gold_balance, 64.8);
    }

    #[test]
    fn order_row_parses_status() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let order = KarigarOrder {
            id: 1,
            karigar_id: 1,
            item_type: "Ring".to_string(),
            gold_weight: Some(5.2),
            diamond_count: Some(1),
            status: "in-progress".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            expected_delivery: None,
            notes: None,
            created_at: ts,
            updated_at: ts,
        };
        let domain = DomainKarigarOrder::try_from(order).unwrap();
        assert_eq!(domain.status, OrderStatus::InProgress);

        let bad = KarigarOrder {
            status: "shipped".to_string(),
            ..KarigarOrder {
                id: 2,
                karigar_id: 1,
                item_type: "Necklace".to_string(),
                gold_weight: None,
                diamond_count: None,
                status: String::new(),
                due_date: None,
                expected_delivery: None,
                notes: None,
                created_at: ts,
                updated_at: ts,
            }
        };
        assert!(DomainKarigarOrder::try_from(bad).is_err());
    }

    #[test]
    fn from_domain_new_order_pins_pending_status() {
        let domain = DomainNewKarigarOrder::new(
            2,
            "Necklace".to_string(),
            Some(12.5),
            Some(8),
            NaiveDate::from_ymd_opt(2024, 1, 20),
            None,
        );
        let new: NewKarigarOrder = (&domain).into();
        assert_eq!(new.status, "pending");
        assert_eq!(new.diamond_count, Some(8));
    }
}

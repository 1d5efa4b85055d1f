//! Diesel models for the inventory table.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::stock::{
    NewStockItem as DomainNewStockItem, StockItem as DomainStockItem,
    UpdateStockItem as DomainUpdateStockItem,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::inventory)]
/// Diesel model for [`crate::domain::stock::StockItem`].
pub struct StockItem {
    pub id: i32,
    pub tag_id: String,
    pub kind: String,
    pub name: String,
    pub description: String,
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<String>,
    pub purchase_price: i64,
    pub current_value: i64,
    pub status: String,
    pub location: String,
    pub qr_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::inventory)]
/// Insertable form of [`StockItem`].
pub struct NewStockItem<'a> {
    pub tag_id: &'a str,
    pub kind: String,
    pub name: &'a str,
    pub description: &'a str,
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<&'a str>,
    pub purchase_price: i64,
    pub current_value: i64,
    pub status: String,
    pub location: &'a str,
    pub qr_code: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::inventory)]
/// Data used when updating a [`StockItem`] record. Every edit bumps
/// `updated_at`.
pub struct UpdateStockItem<'a> {
    pub kind: String,
    pub name: &'a str,
    pub description: &'a str,
    pub gold_weight: Option<Option<f64>>,
    pub gold_karat: Option<Option<i32>>,
    pub diamond_weight: Option<Option<f64>>,
    pub diamond_quality: Option<Option<&'a str>>,
    pub purchase_price: i64,
    pub current_value: i64,
    pub status: String,
    pub location: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<StockItem> for DomainStockItem {
    type Error = TypeConstraintError;

    fn try_from(item: StockItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: item.id,
            tag_id: item.tag_id,
            kind: item.kind.parse()?,
            name: item.name,
            description: item.description,
            gold_weight: item.gold_weight,
            gold_karat: item.gold_karat,
            diamond_weight: item.diamond_weight,
            diamond_quality: item.diamond_quality,
            purchase_price: item.purchase_price,
            current_value: item.current_value,
            status: item.status.parse()?,
            location: item.location,
            qr_code: item.qr_code,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewStockItem> for NewStockItem<'a> {
    fn from(item: &'a DomainNewStockItem) -> Self {
        Self {
            tag_id: item.tag_id.as_str(),
            kind: item.kind.to_string(),
            name: item.name.as_str(),
            description: item.description.as_str(),
            gold_weight: item.gold_weight,
            gold_karat: item.gold_karat,
            diamond_weight: item.diamond_weight,
            diamond_quality: item.diamond_quality.as_deref(),
            purchase_price: item.purchase_price,
            current_value: item.current_value,
            status: item.status.to_string(),
            location: item.location.as_str(),
            qr_code: item.qr_code.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateStockItem> for UpdateStockItem<'a> {
    fn from(item: &'a DomainUpdateStockItem) -> Self {
        Self {
            kind: item.kind.to_string(),
            name: item.name.as_str(),
            description: item.description.as_str(),
            gold_weight: Some(item.gold_weight),
            gold_karat: Some(item.gold_karat),
            diamond_weight: Some(item.diamond_weight),
            diamond_quality: Some(item.diamond_quality.as_deref()),
            purchase_price: item.purchase_price,
            current_value: item.current_value,
            status: item.status.to_string(),
            location: item.location.as_str(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::stock::{StockKind, StockStatus};

    fn row() -> StockItem {
        let ts = NaiveDate::from_ymd_opt(2024, 11, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        StockItem {
            id: 1,
            tag_id: "TAG001".to_string(),
            kind: "diamond-jewelry".to_string(),
            name: "Diamond Necklace Set".to_string(),
            description: "Elegant diamond necklace with matching earrings".to_string(),
            gold_weight: Some(45.5),
            gold_karat: Some(18),
            diamond_weight: Some(2.5),
            diamond_quality: Some("1 no (EF VVS)".to_string()),
            purchase_price: 185_000,
            current_value: 245_000,
            status: "in-stock".to_string(),
            location: "Main Display".to_string(),
            qr_code: "QR_SJ001".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn stock_row_parses_into_domain() {
        let domain = DomainStockItem::try_from(row()).unwrap();
        assert_eq!(domain.kind, StockKind::DiamondJewelry);
        assert_eq!(domain.status, StockStatus::InStock);
        assert_eq!(domain.gold_karat, Some(18));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut bad = row();
        bad.kind = "platinum-jewelry".to_string();
        assert!(DomainStockItem::try_from(bad).is_err());
    }

    #[test]
    fn from_domain_new_creates_insertable() {
        let domain = DomainNewStockItem::new(
            "TAG004".to_string(),
            StockKind::PureGold,
            "Gold Bar 100g".to_string(),
            "Fine gold bar 999.9 purity".to_string(),
            Some(100.0),
            Some(24),
            None,
            None,
            580_000,
            610_000,
            StockStatus::InStock,
            "Vault B".to_string(),
            Some("QR_SJ004".to_string()),
        )
        .unwrap();
        let new: NewStockItem = (&domain).into();
        assert_eq!(new.tag_id, "TAG004");
        assert_eq!(new.kind, "pure-gold");
        assert_eq!(new.status, "in-stock");
        assert_eq!(new.gold_karat, Some(24));
        assert_eq!(new.diamond_weight, None);
    }
}

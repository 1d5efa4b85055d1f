use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{QrCode, TagId, TypeConstraintError};

/// Piece of inventory tracked by physical tag and QR sticker.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StockItem {
    pub id: i32,
    pub tag_id: String,
    pub kind: StockKind,
    pub name: String,
    pub description: String,
    /// Grams of gold in the piece, when the kind carries gold.
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    /// Carats of diamond in the piece, when the kind carries diamonds.
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<String>,
    pub purchase_price: i64,
    pub current_value: i64,
    pub status: StockStatus,
    pub location: String,
    pub qr_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StockKind {
    #[serde(rename = "diamond-jewelry")]
    DiamondJewelry,
    #[serde(rename = "gold-jewelry")]
    GoldJewelry,
    #[serde(rename = "loose-diamond")]
    LooseDiamond,
    #[serde(rename = "pure-gold")]
    PureGold,
    #[serde(rename = "silver")]
    Silver,
}

impl StockKind {
    /// Kinds whose items carry a gold weight and karat.
    #[must_use]
    pub fn carries_gold(self) -> bool {
        matches!(
            self,
            StockKind::DiamondJewelry | StockKind::GoldJewelry | StockKind::PureGold
        )
    }

    /// Kinds whose items carry a diamond weight and quality grade.
    #[must_use]
    pub fn carries_diamond(self) -> bool {
        matches!(self, StockKind::DiamondJewelry | StockKind::LooseDiamond)
    }
}

impl Display for StockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockKind::DiamondJewelry => write!(f, "diamond-jewelry"),
            StockKind::GoldJewelry => write!(f, "gold-jewelry"),
            StockKind::LooseDiamond => write!(f, "loose-diamond"),
            StockKind::PureGold => write!(f, "pure-gold"),
            StockKind::Silver => write!(f, "silver"),
        }
    }
}

impl FromStr for StockKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diamond-jewelry" => Ok(StockKind::DiamondJewelry),
            "gold-jewelry" => Ok(StockKind::GoldJewelry),
            "loose-diamond" => Ok(StockKind::LooseDiamond),
            "pure-gold" => Ok(StockKind::PureGold),
            "silver" => Ok(StockKind::Silver),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StockStatus {
    #[serde(rename = "in-stock")]
    InStock,
    #[serde(rename = "sold")]
    Sold,
    #[serde(rename = "with-karigar")]
    WithKarigar,
    #[serde(rename = "on-approval")]
    OnApproval,
}

impl Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "in-stock"),
            StockStatus::Sold => write!(f, "sold"),
            StockStatus::WithKarigar => write!(f, "with-karigar"),
            StockStatus::OnApproval => write!(f, "on-approval"),
        }
    }
}

impl FromStr for StockStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-stock" => Ok(StockStatus::InStock),
            "sold" => Ok(StockStatus::Sold),
            "with-karigar" => Ok(StockStatus::WithKarigar),
            "on-approval" => Ok(StockStatus::OnApproval),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewStockItem {
    pub tag_id: String,
    pub kind: StockKind,
    pub name: String,
    pub description: String,
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<String>,
    pub purchase_price: i64,
    pub current_value: i64,
    pub status: StockStatus,
    pub location: String,
    pub qr_code: String,
}

impl NewStockItem {
    /// Normalizes text fields and drops material fields that do not apply to
    /// the item kind, so a silver item can never carry a stray karat value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tag_id: String,
        kind: StockKind,
        name: String,
        description: String,
        gold_weight: Option<f64>,
        gold_karat: Option<i32>,
        diamond_weight: Option<f64>,
        diamond_quality: Option<String>,
        purchase_price: i64,
        current_value: i64,
        status: StockStatus,
        location: String,
        qr_code: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        let tag_id = TagId::new(tag_id)?;
        let qr_code = match qr_code.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            Some(code) => QrCode::new(code)?,
            None => QrCode::generate(),
        };
        Ok(Self {
            tag_id: tag_id.into_inner(),
            kind,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            gold_weight: gold_weight.filter(|_| kind.carries_gold()),
            gold_karat: gold_karat.filter(|_| kind.carries_gold()),
            diamond_weight: diamond_weight.filter(|_| kind.carries_diamond()),
            diamond_quality: diamond_quality
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .filter(|_| kind.carries_diamond()),
            purchase_price,
            current_value,
            status,
            location: location.trim().to_string(),
            qr_code: qr_code.into_inner(),
        })
    }
}

/// Editable fields of an existing item. The tag and QR code are assigned at
/// registration and never change afterwards.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateStockItem {
    pub kind: StockKind,
    pub name: String,
    pub description: String,
    pub gold_weight: Option<f64>,
    pub gold_karat: Option<i32>,
    pub diamond_weight: Option<f64>,
    pub diamond_quality: Option<String>,
    pub purchase_price: i64,
    pub current_value: i64,
    pub status: StockStatus,
    pub location: String,
}

impl UpdateStockItem {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: StockKind,
        name: String,
        description: String,
        gold_weight: Option<f64>,
        gold_karat: Option<i32>,
        diamond_weight: Option<f64>,
        diamond_quality: Option<String>,
        purchase_price: i64,
        current_value: i64,
        status: StockStatus,
        location: String,
    ) -> Self {
        Self {
            kind,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            gold_weight: gold_weight.filter(|_| kind.carries_gold()),
            gold_karat: gold_karat.filter(|_| kind.carries_gold()),
            diamond_weight: diamond_weight.filter(|_| kind.carries_diamond()),
            diamond_quality: diamond_quality
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .filter(|_| kind.carries_diamond()),
            purchase_price,
            current_value,
            status,
            location: location.trim().to_string(),
        }
    }
}

/// Counters shown at the top of the stock screen.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct StockSummary {
    pub total_items: usize,
    pub total_value: i64,
    pub low_stock: usize,
    pub with_karigar: usize,
    pub on_approval: usize,
}

/// Fold the item list into the dashboard counters. `low_stock_threshold` is
/// the configured value below which an in-stock item counts as low stock.
#[must_use]
pub fn summarize(items: &[StockItem], low_stock_threshold: i64) -> StockSummary {
    items.iter().fold(StockSummary::default(), |mut acc, item| {
        acc.total_items += 1;
        acc.total_value += item.current_value;
        match item.status {
            StockStatus::InStock if item.current_value < low_stock_threshold => acc.low_stock += 1,
            StockStatus::WithKarigar => acc.with_karigar += 1,
            StockStatus::OnApproval => acc.on_approval += 1,
            _ => {}
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn item(status: StockStatus, current_value: i64) -> StockItem {
        let ts = NaiveDate::from_ymd_opt(2024, 11, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        StockItem {
            id: 1,
            tag_id: "TAG001".to_string(),
            kind: StockKind::GoldJewelry,
            name: "Gold Bangles Set".to_string(),
            description: String::new(),
            gold_weight: Some(85.2),
            gold_karat: Some(22),
            diamond_weight: None,
            diamond_quality: None,
            purchase_price: current_value,
            current_value,
            status,
            location: "Vault A".to_string(),
            qr_code: "QR-1".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn summary_of_empty_list_is_all_zero() {
        assert_eq!(summarize(&[], 50_000), StockSummary::default());
    }

    #[test]
    fn summary_counts_partition_statuses() {
        let items = vec![
            item(StockStatus::InStock, 185_000),
            item(StockStatus::InStock, 20_000),
            item(StockStatus::Sold, 425_000),
            item(StockStatus::WithKarigar, 90_000),
            item(StockStatus::WithKarigar, 30_000),
            item(StockStatus::OnApproval, 575_000),
        ];
        let summary = summarize(&items, 50_000);
        assert_eq!(summary.total_items, 6);
        assert_eq!(summary.total_value, 1_325_000);
        assert_eq!(summary.with_karigar, 2);
        assert_eq!(summary.on_approval, 1);
        // low stock only counts items that are actually in stock
        assert_eq!(summary.low_stock, 1);

        let other = items
            .iter()
            .filter(|i| !matches!(i.status, StockStatus::WithKarigar | StockStatus::OnApproval))
            .count();
        assert_eq!(summary.with_karigar + summary.on_approval + other, summary.total_items);
    }

    #[test]
    fn low_stock_respects_configured_threshold() {
        let items = vec![item(StockStatus::InStock, 40_000)];
        assert_eq!(summarize(&items, 50_000).low_stock, 1);
        assert_eq!(summarize(&items, 30_000).low_stock, 0);
    }

    #[test]
    fn new_item_drops_material_fields_foreign_to_kind() {
        let silver = NewStockItem::new(
            "tag010".to_string(),
            StockKind::Silver,
            "Silver Bangles".to_string(),
            String::new(),
            Some(12.0),
            Some(22),
            Some(1.0),
            Some("1 no (EF VVS)".to_string()),
            45_000,
            52_000,
            StockStatus::InStock,
            "Main Display".to_string(),
            None,
        )
        .unwrap();
        assert_eq!(silver.tag_id, "TAG010");
        assert_eq!(silver.gold_weight, None);
        assert_eq!(silver.gold_karat, None);
        assert_eq!(silver.diamond_weight, None);
        assert_eq!(silver.diamond_quality, None);
        assert!(silver.qr_code.starts_with("QR-"));
    }

    #[test]
    fn new_diamond_jewelry_keeps_both_materials() {
        let piece = NewStockItem::new(
            "TAG001".to_string(),
            StockKind::DiamondJewelry,
            "Diamond Necklace Set".to_string(),
            "Elegant diamond necklace".to_string(),
            Some(45.5),
            Some(18),
            Some(2.5),
            Some("1 no (EF VVS)".to_string()),
            185_000,
            245_000,
            StockStatus::InStock,
            "Main Display".to_string(),
            Some("QR_SJ001".to_string()),
        )
        .unwrap();
        assert_eq!(piece.gold_weight, Some(45.5));
        assert_eq!(piece.diamond_weight, Some(2.5));
        assert_eq!(piece.qr_code, "QR_SJ001");
    }

    #[test]
    fn stock_kind_round_trips_through_str() {
        for kind in [
            StockKind::DiamondJewelry,
            StockKind::GoldJewelry,
            StockKind::LooseDiamond,
            StockKind::PureGold,
            StockKind::Silver,
        ] {
            assert_eq!(kind.to_string().parse::<StockKind>(), Ok(kind));
        }
        assert!("platinum".parse::<StockKind>().is_err());
    }
}

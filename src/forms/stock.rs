use std::fs::File;
use std::io::Read;
use std::str::FromStr;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::stock::{NewStockItem, StockKind, StockStatus, UpdateStockItem};
use crate::forms::{
    FormError, optional_text, parse_amount, parse_optional_int, parse_optional_weight,
};

#[derive(Deserialize, Validate)]
/// Form data for registering a stock item.
pub struct AddStockForm {
    #[validate(length(min = 1))]
    pub tag_id: String,
    pub kind: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gold_weight: String,
    #[serde(default)]
    pub gold_karat: String,
    #[serde(default)]
    pub diamond_weight: String,
    #[serde(default)]
    pub diamond_quality: String,
    pub purchase_price: String,
    pub current_value: String,
    pub status: String,
    pub location: String,
    #[serde(default)]
    pub qr_code: String,
}

impl TryFrom<&AddStockForm> for NewStockItem {
    type Error = FormError;

    fn try_from(form: &AddStockForm) -> Result<Self, Self::Error> {
        let kind = StockKind::from_str(&form.kind)?;
        let status = StockStatus::from_str(&form.status)?;
        Ok(NewStockItem::new(
            form.tag_id.clone(),
            kind,
            form.name.clone(),
            form.description.clone(),
            parse_optional_weight(&form.gold_weight)?,
            parse_optional_int(&form.gold_karat)?,
            parse_optional_weight(&form.diamond_weight)?,
            optional_text(&form.diamond_quality),
            parse_amount(&form.purchase_price)?,
            parse_amount(&form.current_value)?,
            status,
            form.location.clone(),
            optional_text(&form.qr_code),
        )?)
    }
}

#[derive(Deserialize, Validate)]
/// Form data for editing a stock item. The tag and QR code stay fixed.
pub struct SaveStockForm {
    /// Stock item identifier.
    pub id: i32,
    pub kind: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gold_weight: String,
    #[serde(default)]
    pub gold_karat: String,
    #[serde(default)]
    pub diamond_weight: String,
    #[serde(default)]
    pub diamond_quality: String,
    pub purchase_price: String,
    pub current_value: String,
    pub status: String,
    pub location: String,
}

impl TryFrom<&SaveStockForm> for UpdateStockItem {
    type Error = FormError;

    fn try_from(form: &SaveStockForm) -> Result<Self, Self::Error> {
        let kind = StockKind::from_str(&form.kind)?;
        let status = StockStatus::from_str(&form.status)?;
        Ok(UpdateStockItem::new(
            kind,
            form.name.clone(),
            form.description.clone(),
            parse_optional_weight(&form.gold_weight)?,
            parse_optional_int(&form.gold_karat)?,
            parse_optional_weight(&form.diamond_weight)?,
            optional_text(&form.diamond_quality),
            parse_amount(&form.purchase_price)?,
            parse_amount(&form.current_value)?,
            status,
            form.location.clone(),
        ))
    }
}

#[derive(MultipartForm)]
/// CSV upload for bulk stock registration.
pub struct UploadStockForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadStockForm {
    /// Parse the uploaded file. The whole file is rejected on the first bad
    /// row so a partial import never reaches the database.
    pub fn parse_csv(&self) -> Result<Vec<NewStockItem>, FormError> {
        let file = File::open(self.csv.file.path()).map_err(|err| FormError::Csv(err.to_string()))?;
        parse_stock_csv(file)
    }
}

/// One line of the import file. Material columns may be left empty and the
/// status column may be omitted entirely.
#[derive(Debug, Deserialize)]
struct StockCsvRow {
    tag_id: String,
    kind: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    gold_weight: Option<f64>,
    #[serde(default)]
    gold_karat: Option<i32>,
    #[serde(default)]
    diamond_weight: Option<f64>,
    #[serde(default)]
    diamond_quality: Option<String>,
    purchase_price: i64,
    current_value: i64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    location: String,
}

fn parse_stock_csv<R: Read>(reader: R) -> Result<Vec<NewStockItem>, FormError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut items = Vec::new();

    for (idx, result) in rdr.deserialize::<StockCsvRow>().enumerate() {
        // header occupies line 1
        let line = idx + 2;
        let row = result.map_err(|err| FormError::Csv(format!("line {line}: {err}")))?;
        let kind = StockKind::from_str(row.kind.trim())
            .map_err(|_| FormError::Csv(format!("line {line}: unknown kind '{}'", row.kind)))?;
        let status = match row.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => StockStatus::from_str(value)
                .map_err(|_| FormError::Csv(format!("line {line}: unknown status '{value}'")))?,
            None => StockStatus::InStock,
        };
        let item = NewStockItem::new(
            row.tag_id,
            kind,
            row.name,
            row.description,
            row.gold_weight,
            row.gold_karat,
            row.diamond_weight,
            row.diamond_quality,
            row.purchase_price,
            row.current_value,
            status,
            row.location,
            None,
        )
        .map_err(|err| FormError::Csv(format!("line {line}: {err}")))?;
        items.push(item);
    }

    Ok(items)
}

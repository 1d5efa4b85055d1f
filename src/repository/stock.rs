//! Store operations for the jewelry inventory.

use diesel::prelude::*;

use crate::domain::stock::{NewStockItem, StockItem, UpdateStockItem};
use crate::models::stock::{
    NewStockItem as DbNewStockItem, StockItem as DbStockItem, UpdateStockItem as DbUpdateStockItem,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, StockListQuery, StockReader, StockWriter};

impl StockReader for DieselRepository {
    fn get_stock_item_by_id(&self, id: i32) -> RepositoryResult<Option<StockItem>> {
        use crate::schema::inventory;

        let mut conn = self.conn()?;
        let db_item = inventory::table
            .find(id)
            .first::<DbStockItem>(&mut conn)
            .optional()?;

        match db_item {
            Some(db_item) => Ok(Some(
                StockItem::try_from(db_item).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn get_stock_item_by_tag(&self, tag_id: &str) -> RepositoryResult<Option<StockItem>> {
        use crate::schema::inventory;

        let mut conn = self.conn()?;
        let db_item = inventory::table
            .filter(inventory::tag_id.eq(tag_id))
            .first::<DbStockItem>(&mut conn)
            .optional()?;

        match db_item {
            Some(db_item) => Ok(Some(
                StockItem::try_from(db_item).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_stock_items(
        &self,
        query: StockListQuery,
    ) -> RepositoryResult<(usize, Vec<StockItem>)> {
        use crate::schema::inventory;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = inventory::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(search) = &query.search {
                let pattern = format!("%{search}%");
                items = items.filter(
                    inventory::name
                        .like(pattern.clone())
                        .or(inventory::tag_id.like(pattern.clone()))
                        .or(inventory::location.like(pattern)),
                );
            }
            if let Some(kind) = &query.kind {
                items = items.filter(inventory::kind.eq(kind.to_string()));
            }
            if let Some(status) = &query.status {
                items = items.filter(inventory::status.eq(status.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let stock = items
            .order(inventory::tag_id.asc())
            .load::<DbStockItem>(&mut conn)?
            .into_iter()
            .map(|db_item| StockItem::try_from(db_item).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok((total, stock))
    }

    fn list_all_stock_items(&self) -> RepositoryResult<Vec<StockItem>> {
        use crate::schema::inventory;

        let mut conn = self.conn()?;
        inventory::table
            .order(inventory::tag_id.asc())
            .load::<DbStockItem>(&mut conn)?
            .into_iter()
            .map(|db_item| StockItem::try_from(db_item).map_err(RepositoryError::from))
            .collect()
    }
}

impl StockWriter for DieselRepository {
    fn create_stock_items(&self, new_items: &[NewStockItem]) -> RepositoryResult<usize> {
        use crate::schema::inventory;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewStockItem> = new_items.iter().map(Into::into).collect();

        let affected = diesel::insert_into(inventory::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_stock_item(
        &self,
        item_id: i32,
        updates: &UpdateStockItem,
    ) -> RepositoryResult<StockItem> {
        use crate::schema::inventory;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateStockItem = updates.into();

        let updated = diesel::update(inventory::table.find(item_id))
            .set(&db_updates)
            .get_result::<DbStockItem>(&mut conn)?;

        StockItem::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_stock_item(&self, item_id: i32) -> RepositoryResult<()> {
        use crate::schema::inventory;

        let mut conn = self.conn()?;
        diesel::delete(inventory::table.find(item_id)).execute(&mut conn)?;
        Ok(())
    }
}

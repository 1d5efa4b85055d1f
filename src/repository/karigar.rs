//! Store operations for karigars, their work orders and the material ledger.

use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::karigar::{
    Karigar, KarigarOrder, NewKarigar, NewKarigarOrder, OrderStatus, UpdateKarigarOrder,
};
use crate::domain::ledger::{
    self, EntryCategory, EntryType, LedgerEntry, LedgerReconciliation, NewLedgerEntry,
};
use crate::models::karigar::{
    Karigar as DbKarigar, KarigarOrder as DbKarigarOrder, NewKarigar as DbNewKarigar,
    NewKarigarOrder as DbNewKarigarOrder, UpdateKarigarOrder as DbUpdateKarigarOrder,
};
use crate::models::ledger::{LedgerEntry as DbLedgerEntry, NewLedgerEntry as DbNewLedgerEntry};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, KarigarReader, KarigarWriter, LedgerReader, LedgerWriter, OrderReader,
    OrderWriter,
};

impl KarigarReader for DieselRepository {
    fn get_karigar_by_id(&self, id: i32) -> RepositoryResult<Option<Karigar>> {
        use crate::schema::karigars;

        let mut conn = self.conn()?;
        let db_karigar = karigars::table
            .find(id)
            .first::<DbKarigar>(&mut conn)
            .optional()?;

        Ok(db_karigar.map(Karigar::from))
    }

    fn list_karigars(&self) -> RepositoryResult<Vec<Karigar>> {
        use crate::schema::karigars;

        let mut conn = self.conn()?;
        let karigars = karigars::table
            .order(karigars::name.asc())
            .load::<DbKarigar>(&mut conn)?
            .into_iter()
            .map(Karigar::from)
            .collect();

        Ok(karigars)
    }

    fn list_karigars_with_open_orders(&self) -> RepositoryResult<Vec<(Karigar, i64)>> {
        use crate::schema::{karigar_orders, karigars};

        let mut conn = self.conn()?;
        let karigars = karigars::table
            .order(karigars::name.asc())
            .load::<DbKarigar>(&mut conn)?;

        let open_karigar_ids = karigar_orders::table
            .filter(karigar_orders::status.ne(OrderStatus::Completed.to_string()))
            .select(karigar_orders::karigar_id)
            .load::<i32>(&mut conn)?;

        let mut open_counts: HashMap<i32, i64> = HashMap::new();
        for karigar_id in open_karigar_ids {
            *open_counts.entry(karigar_id).or_insert(0) += 1;
        }

        let karigars_with_counts = karigars
            .into_iter()
            .map(|db_karigar| {
                let open = open_counts.get(&db_karigar.id).copied().unwrap_or(0);
                (Karigar::from(db_karigar), open)
            })
            .collect();

        Ok(karigars_with_counts)
    }
}

impl KarigarWriter for DieselRepository {
    fn create_karigar(&self, new_karigar: &NewKarigar) -> RepositoryResult<Karigar> {
        use crate::schema::karigars;

        let mut conn = self.conn()?;
        let db_new_karigar: DbNewKarigar = new_karigar.into();

        let created = diesel::insert_into(karigars::table)
            .values(&db_new_karigar)
            .get_result::<DbKarigar>(&mut conn)?;

        Ok(Karigar::from(created))
    }
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<KarigarOrder>> {
        use crate::schema::karigar_orders;

        let mut conn = self.conn()?;
        let db_order = karigar_orders::table
            .find(id)
            .first::<DbKarigarOrder>(&mut conn)
            .optional()?;

        match db_order {
            Some(db_order) => Ok(Some(
                KarigarOrder::try_from(db_order).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_orders(&self, karigar_id: Option<i32>) -> RepositoryResult<Vec<KarigarOrder>> {
        use crate::schema::karigar_orders;

        let mut conn = self.conn()?;

        let mut items = karigar_orders::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(karigar_id) = karigar_id {
            items = items.filter(karigar_orders::karigar_id.eq(karigar_id));
        }

        items
            .order(karigar_orders::id.asc())
            .load::<DbKarigarOrder>(&mut conn)?
            .into_iter()
            .map(|db_order| KarigarOrder::try_from(db_order).map_err(RepositoryError::from))
            .collect()
    }

    fn orders_revision(&self) -> i64 {
        self.load_orders_revision()
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &NewKarigarOrder) -> RepositoryResult<KarigarOrder> {
        use crate::schema::karigar_orders;

        let mut conn = self.conn()?;
        let db_new_order: DbNewKarigarOrder = new_order.into();

        let created = diesel::insert_into(karigar_orders::table)
            .values(&db_new_order)
            .get_result::<DbKarigarOrder>(&mut conn)?;

        self.bump_orders_revision();
        KarigarOrder::try_from(created).map_err(RepositoryError::from)
    }

    fn update_order(
        &self,
        order_id: i32,
        updates: &UpdateKarigarOrder,
    ) -> RepositoryResult<KarigarOrder> {
        use crate::schema::karigar_orders;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateKarigarOrder = updates.into();

        let updated = diesel::update(karigar_orders::table.find(order_id))
            .set(&db_updates)
            .get_result::<DbKarigarOrder>(&mut conn)?;

        self.bump_orders_revision();
        KarigarOrder::try_from(updated).map_err(RepositoryError::from)
    }
}

impl LedgerReader for DieselRepository {
    fn list_ledger_entries(&self, karigar_id: i32) -> RepositoryResult<Vec<LedgerEntry>> {
        use crate::schema::karigar_ledger;

        let mut conn = self.conn()?;
        karigar_ledger::table
            .filter(karigar_ledger::karigar_id.eq(karigar_id))
            .order((karigar_ledger::entry_date.asc(), karigar_ledger::id.asc()))
            .load::<DbLedgerEntry>(&mut conn)?
            .into_iter()
            .map(|db_entry| LedgerEntry::try_from(db_entry).map_err(RepositoryError::from))
            .collect()
    }
}

impl LedgerWriter for DieselRepository {
    fn create_ledger_entry(&self, entry: &NewLedgerEntry) -> RepositoryResult<LedgerEntry> {
        use crate::schema::{karigar_ledger, karigars};

        let mut conn = self.conn()?;
        let (gold_delta, diamond_delta) = entry.material_delta();
        let db_entry: DbNewLedgerEntry = entry.into();
        let karigar_id = entry.karigar_id;

        let created = conn
            .transaction::<DbLedgerEntry, diesel::result::Error, _>(move |conn| {
                let created = diesel::insert_into(karigar_ledger::table)
                    .values(&db_entry)
                    .get_result::<DbLedgerEntry>(conn)?;

                diesel::update(karigars::table.find(karigar_id))
                    .set((
                        karigars::gold_balance.eq(karigars::gold_balance + gold_delta),
                        karigars::diamond_balance
                            .eq(karigars::diamond_balance + diamond_delta),
                        karigars::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                Ok(created)
            })
            .map_err(RepositoryError::from)?;

        LedgerEntry::try_from(created).map_err(RepositoryError::from)
    }

    fn settle_labour(&self, entry_id: i32) -> RepositoryResult<LedgerEntry> {
        use crate::schema::karigar_ledger;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            karigar_ledger::table
                .find(entry_id)
                .filter(karigar_ledger::entry_type.eq(EntryType::Receive.to_string()))
                .filter(karigar_ledger::category.eq(EntryCategory::Labour.to_string())),
        )
        .set(karigar_ledger::settled.eq(true))
        .get_result::<DbLedgerEntry>(&mut conn)?;

        LedgerEntry::try_from(updated).map_err(RepositoryError::from)
    }

    fn reconcile_karigar(&self, karigar_id: i32) -> RepositoryResult<LedgerReconciliation> {
        use crate::schema::{karigar_ledger, karigars};

        let mut conn = self.conn()?;

        conn.transaction::<LedgerReconciliation, RepositoryError, _>(move |conn| {
            let db_karigar = karigars::table
                .find(karigar_id)
                .first::<DbKarigar>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let entries = karigar_ledger::table
                .filter(karigar_ledger::karigar_id.eq(karigar_id))
                .load::<DbLedgerEntry>(conn)?
                .into_iter()
                .map(|db_entry| LedgerEntry::try_from(db_entry).map_err(RepositoryError::from))
                .collect::<Result<Vec<_>, RepositoryError>>()?;

            let summary = ledger::summarize(&entries);

            diesel::update(karigars::table.find(karigar_id))
                .set((
                    karigars::gold_balance.eq(summary.gold_balance),
                    karigars::diamond_balance.eq(summary.diamond_balance),
                    karigars::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;

            Ok(LedgerReconciliation {
                stored_gold: db_karigar.gold_balance,
                stored_diamond: db_karigar.diamond_balance,
                derived_gold: summary.gold_balance,
                derived_diamond: summary.diamond_balance,
            })
        })
    }
}

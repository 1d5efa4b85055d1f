use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::db::{DbConnection, DbPool};
use crate::domain::client::{
    Client, NewClient, NewReminder, Reminder, ReminderStatus, UpdateClient, VipStatus,
};
use crate::domain::harvest::{
    HarvestPlan, LuckyDraw, NewHarvestPlan, NewLuckyDraw, Payment, PlanStatus, UpdateHarvestPlan,
};
use crate::domain::karigar::{
    Karigar, KarigarOrder, NewKarigar, NewKarigarOrder, UpdateKarigarOrder,
};
use crate::domain::ledger::{LedgerEntry, LedgerReconciliation, NewLedgerEntry};
use crate::domain::stock::{NewStockItem, StockItem, StockKind, StockStatus, UpdateStockItem};
use crate::domain::transaction::{
    BankAccount, DailyTotals, NewBankAccount, NewTransaction, PaymentMethod, Transaction,
    TxnCategory, TxnType,
};
use crate::repository::errors::RepositoryResult;

pub mod client;
pub mod errors;
pub mod harvest;
pub mod karigar;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod stock;
pub mod transaction;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub vip_status: Option<VipStatus>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn vip_status(mut self, vip_status: VipStatus) -> Self {
        self.vip_status = Some(vip_status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReminderListQuery {
    pub client_id: Option<i32>,
    pub status: Option<ReminderStatus>,
    pub pagination: Option<Pagination>,
}

impl ReminderListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client_id: i32) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn status(mut self, status: ReminderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct StockListQuery {
    pub search: Option<String>,
    pub kind: Option<StockKind>,
    pub status: Option<StockStatus>,
    pub pagination: Option<Pagination>,
}

impl StockListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn kind(mut self, kind: StockKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: StockStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionListQuery {
    pub search: Option<String>,
    pub category: Option<TxnCategory>,
    pub txn_type: Option<TxnType>,
    pub pagination: Option<Pagination>,
}

impl TransactionListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn category(mut self, category: TxnCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn txn_type(mut self, txn_type: TxnType) -> Self {
        self.txn_type = Some(txn_type);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<Client>>;
    fn get_client_by_email(&self, email: &str) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize>;
    fn update_client(&self, client_id: i32, updates: &UpdateClient) -> RepositoryResult<Client>;
    fn delete_client(&self, client_id: i32) -> RepositoryResult<()>;
}

pub trait ReminderReader {
    fn list_reminders(
        &self,
        query: ReminderListQuery,
    ) -> RepositoryResult<Vec<(Reminder, Client)>>;
}

pub trait ReminderWriter {
    fn create_reminder(&self, reminder: &NewReminder) -> RepositoryResult<Reminder>;
    fn complete_reminder(&self, reminder_id: i32) -> RepositoryResult<Reminder>;
    fn delete_reminder(&self, reminder_id: i32) -> RepositoryResult<()>;
}

pub trait StockReader {
    fn get_stock_item_by_id(&self, id: i32) -> RepositoryResult<Option<StockItem>>;
    fn get_stock_item_by_tag(&self, tag_id: &str) -> RepositoryResult<Option<StockItem>>;
    fn list_stock_items(&self, query: StockListQuery) -> RepositoryResult<(usize, Vec<StockItem>)>;
    /// The whole inventory, for summary counters that ignore list filters.
    fn list_all_stock_items(&self) -> RepositoryResult<Vec<StockItem>>;
}

pub trait StockWriter {
    fn create_stock_items(&self, new_items: &[NewStockItem]) -> RepositoryResult<usize>;
    fn update_stock_item(
        &self,
        item_id: i32,
        updates: &UpdateStockItem,
    ) -> RepositoryResult<StockItem>;
    fn delete_stock_item(&self, item_id: i32) -> RepositoryResult<()>;
}

pub trait KarigarReader {
    fn get_karigar_by_id(&self, id: i32) -> RepositoryResult<Option<Karigar>>;
    fn list_karigars(&self) -> RepositoryResult<Vec<Karigar>>;
    /// Each karigar paired with how many of their orders are still open.
    fn list_karigars_with_open_orders(&self) -> RepositoryResult<Vec<(Karigar, i64)>>;
}

pub trait KarigarWriter {
    fn create_karigar(&self, new_karigar: &NewKarigar) -> RepositoryResult<Karigar>;
}

pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<KarigarOrder>>;
    fn list_orders(&self, karigar_id: Option<i32>) -> RepositoryResult<Vec<KarigarOrder>>;
    /// Monotonic stamp bumped by every order write. Pollers send it back to
    /// skip re-downloading an unchanged list.
    fn orders_revision(&self) -> i64;
}

pub trait OrderWriter {
    fn create_order(&self, new_order: &NewKarigarOrder) -> RepositoryResult<KarigarOrder>;
    fn update_order(
        &self,
        order_id: i32,
        updates: &UpdateKarigarOrder,
    ) -> RepositoryResult<KarigarOrder>;
}

pub trait LedgerReader {
    fn list_ledger_entries(&self, karigar_id: i32) -> RepositoryResult<Vec<LedgerEntry>>;
}

pub trait LedgerWriter {
    /// Inserts the entry and moves the karigar's stored material balances by
    /// its delta inside one transaction.
    fn create_ledger_entry(&self, entry: &NewLedgerEntry) -> RepositoryResult<LedgerEntry>;
    fn settle_labour(&self, entry_id: i32) -> RepositoryResult<LedgerEntry>;
    /// Refolds the full ledger and overwrites the stored balances with the
    /// derived ones, reporting both sides.
    fn reconcile_karigar(&self, karigar_id: i32) -> RepositoryResult<LedgerReconciliation>;
}

pub trait HarvestReader {
    fn get_plan_by_id(&self, id: i32) -> RepositoryResult<Option<HarvestPlan>>;
    fn list_plans(&self) -> RepositoryResult<Vec<(HarvestPlan, Client)>>;
    fn list_group_plans(&self, group_no: i32) -> RepositoryResult<Vec<HarvestPlan>>;
    fn list_payments(&self, plan_id: i32) -> RepositoryResult<Vec<Payment>>;
    fn list_draws(&self, group_no: Option<i32>) -> RepositoryResult<Vec<LuckyDraw>>;
}

pub trait HarvestWriter {
    /// Assigns the lowest free registration number in the group and writes
    /// the plan plus its twelve pending instalment slots in one transaction.
    fn create_plan(&self, new_plan: &NewHarvestPlan) -> RepositoryResult<HarvestPlan>;
    fn update_plan(
        &self,
        plan_id: i32,
        updates: &UpdateHarvestPlan,
    ) -> RepositoryResult<HarvestPlan>;
    fn delete_plan(&self, plan_id: i32) -> RepositoryResult<()>;
    /// Stamps date and method on the slot; the plan flips to completed when
    /// this was the twelfth paid instalment.
    fn mark_payment_paid(
        &self,
        plan_id: i32,
        seq: i32,
        paid_date: NaiveDate,
        method: PaymentMethod,
    ) -> RepositoryResult<Payment>;
    fn set_plan_status(&self, plan_id: i32, status: PlanStatus) -> RepositoryResult<HarvestPlan>;
    fn record_draw(&self, draw: &NewLuckyDraw) -> RepositoryResult<LuckyDraw>;
}

pub trait TransactionReader {
    fn get_transaction_by_id(&self, id: i32) -> RepositoryResult<Option<Transaction>>;
    fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> RepositoryResult<(usize, Vec<Transaction>)>;
    /// Receipt and payment totals over completed transactions dated that day.
    fn daily_totals(&self, on: NaiveDate) -> RepositoryResult<DailyTotals>;
    fn list_bank_accounts(&self) -> RepositoryResult<Vec<BankAccount>>;
}

pub trait TransactionWriter {
    /// Writes the row and applies its balance effect to the linked client in
    /// one transaction.
    fn create_transaction(&self, new_txn: &NewTransaction) -> RepositoryResult<Transaction>;
    /// Reverses the old row's balance effect, rewrites the row and applies
    /// the new effect, all in one transaction.
    fn update_transaction(
        &self,
        txn_id: i32,
        updates: &NewTransaction,
    ) -> RepositoryResult<Transaction>;
    fn delete_transaction(&self, txn_id: i32) -> RepositoryResult<()>;
    fn create_bank_account(&self, account: &NewBankAccount) -> RepositoryResult<BankAccount>;
    fn delete_bank_account(&self, account_id: i32) -> RepositoryResult<()>;
}

/// Diesel-backed store shared by every handler. Cloning is cheap; clones
/// share the pool and the order revision stamp.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
    orders_rev: Arc<AtomicI64>,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            orders_rev: Arc::new(AtomicI64::new(1)),
        }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    pub(crate) fn bump_orders_revision(&self) {
        self.orders_rev.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn load_orders_revision(&self) -> i64 {
        self.orders_rev.load(Ordering::SeqCst)
    }

    /// Round-trips a trivial query. Used by the health endpoint and the
    /// startup probe.
    pub fn ping(&self) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}

//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDate;
use mockall::mock;

use crate::domain::client::{Client, NewClient, NewReminder, Reminder, UpdateClient};
use crate::domain::harvest::{
    HarvestPlan, LuckyDraw, NewHarvestPlan, NewLuckyDraw, Payment, PlanStatus, UpdateHarvestPlan,
};
use crate::domain::karigar::{
    Karigar, KarigarOrder, NewKarigar, NewKarigarOrder, UpdateKarigarOrder,
};
use crate::domain::ledger::{LedgerEntry, LedgerReconciliation, NewLedgerEntry};
use crate::domain::stock::{NewStockItem, StockItem, UpdateStockItem};
use crate::domain::transaction::{
    BankAccount, DailyTotals, NewBankAccount, NewTransaction, PaymentMethod, Transaction,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, HarvestReader, HarvestWriter, KarigarReader,
    KarigarWriter, LedgerReader, LedgerWriter, OrderReader, OrderWriter, ReminderListQuery,
    ReminderReader, ReminderWriter, StockListQuery, StockReader, StockWriter,
    TransactionListQuery, TransactionReader, TransactionWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<Client>>;
        fn get_client_by_email(&self, email: &str) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize>;
        fn update_client(
            &self,
            client_id: i32,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
        fn delete_client(&self, client_id: i32) -> RepositoryResult<()>;
    }

    impl ReminderReader for Repository {
        fn list_reminders(
            &self,
            query: ReminderListQuery,
        ) -> RepositoryResult<Vec<(Reminder, Client)>>;
    }

    impl ReminderWriter for Repository {
        fn create_reminder(&self, reminder: &NewReminder) -> RepositoryResult<Reminder>;
        fn complete_reminder(&self, reminder_id: i32) -> RepositoryResult<Reminder>;
        fn delete_reminder(&self, reminder_id: i32) -> RepositoryResult<()>;
    }

    impl StockReader for Repository {
        fn get_stock_item_by_id(&self, id: i32) -> RepositoryResult<Option<StockItem>>;
        fn get_stock_item_by_tag(&self, tag_id: &str) -> RepositoryResult<Option<StockItem>>;
        fn list_stock_items(
            &self,
            query: StockListQuery,
        ) -> RepositoryResult<(usize, Vec<StockItem>)>;
        fn list_all_stock_items(&self) -> RepositoryResult<Vec<StockItem>>;
    }

    impl StockWriter for Repository {
        fn create_stock_items(&self, new_items: &[NewStockItem]) -> RepositoryResult<usize>;
        fn update_stock_item(
            &self,
            item_id: i32,
            updates: &UpdateStockItem,
        ) -> RepositoryResult<StockItem>;
        fn delete_stock_item(&self, item_id: i32) -> RepositoryResult<()>;
    }

    impl KarigarReader for Repository {
        fn get_karigar_by_id(&self, id: i32) -> RepositoryResult<Option<Karigar>>;
        fn list_karigars(&self) -> RepositoryResult<Vec<Karigar>>;
        fn list_karigars_with_open_orders(&self) -> RepositoryResult<Vec<(Karigar, i64)>>;
    }

    impl KarigarWriter for Repository {
        fn create_karigar(&self, new_karigar: &NewKarigar) -> RepositoryResult<Karigar>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<KarigarOrder>>;
        fn list_orders(&self, karigar_id: Option<i32>) -> RepositoryResult<Vec<KarigarOrder>>;
        fn orders_revision(&self) -> i64;
    }

    impl OrderWriter for Repository {
        fn create_order(&self, new_order: &NewKarigarOrder) -> RepositoryResult<KarigarOrder>;
        fn update_order(
            &self,
            order_id: i32,
            updates: &UpdateKarigarOrder,
        ) -> RepositoryResult<KarigarOrder>;
    }

    impl LedgerReader for Repository {
        fn list_ledger_entries(&self, karigar_id: i32) -> RepositoryResult<Vec<LedgerEntry>>;
    }

    impl LedgerWriter for Repository {
        fn create_ledger_entry(&self, entry: &NewLedgerEntry) -> RepositoryResult<LedgerEntry>;
        fn settle_labour(&self, entry_id: i32) -> RepositoryResult<LedgerEntry>;
        fn reconcile_karigar(&self, karigar_id: i32) -> RepositoryResult<LedgerReconciliation>;
    }

    impl HarvestReader for Repository {
        fn get_plan_by_id(&self, id: i32) -> RepositoryResult<Option<HarvestPlan>>;
        fn list_plans(&self) -> RepositoryResult<Vec<(HarvestPlan, Client)>>;
        fn list_group_plans(&self, group_no: i32) -> RepositoryResult<Vec<HarvestPlan>>;
        fn list_payments(&self, plan_id: i32) -> RepositoryResult<Vec<Payment>>;
        fn list_draws(&self, group_no: Option<i32>) -> RepositoryResult<Vec<LuckyDraw>>;
    }

    impl HarvestWriter for Repository {
        fn create_plan(&self, new_plan: &NewHarvestPlan) -> RepositoryResult<HarvestPlan>;
        fn update_plan(
            &self,
            plan_id: i32,
            updates: &UpdateHarvestPlan,
        ) -> RepositoryResult<HarvestPlan>;
        fn delete_plan(&self, plan_id: i32) -> RepositoryResult<()>;
        fn mark_payment_paid(
            &self,
            plan_id: i32,
            seq: i32,
            paid_date: NaiveDate,
            method: PaymentMethod,
        ) -> RepositoryResult<Payment>;
        fn set_plan_status(
            &self,
            plan_id: i32,
            status: PlanStatus,
        ) -> RepositoryResult<HarvestPlan>;
        fn record_draw(&self, draw: &NewLuckyDraw) -> RepositoryResult<LuckyDraw>;
    }

    impl TransactionReader for Repository {
        fn get_transaction_by_id(&self, id: i32) -> RepositoryResult<Option<Transaction>>;
        fn list_transactions(
            &self,
            query: TransactionListQuery,
        ) -> RepositoryResult<(usize, Vec<Transaction>)>;
        fn daily_totals(&self, on: NaiveDate) -> RepositoryResult<DailyTotals>;
        fn list_bank_accounts(&self) -> RepositoryResult<Vec<BankAccount>>;
    }

    impl TransactionWriter for Repository {
        fn create_transaction(&self, new_txn: &NewTransaction) -> RepositoryResult<Transaction>;
        fn update_transaction(
            &self,
            txn_id: i32,
            updates: &NewTransaction,
        ) -> RepositoryResult<Transaction>;
        fn delete_transaction(&self, txn_id: i32) -> RepositoryResult<()>;
        fn create_bank_account(&self, account: &NewBankAccount) -> RepositoryResult<BankAccount>;
        fn delete_bank_account(&self, account_id: i32) -> RepositoryResult<()>;
    }
}

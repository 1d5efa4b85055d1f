//! Throwaway database bootstrap for demo mode.
//!
//! When demo mode is requested, or the configured database cannot be
//! reached at startup, the server falls back to a fresh SQLite file under
//! the system temp directory. The file is migrated and seeded with a small
//! showroom dataset through the same repository calls the handlers use, so
//! every screen has something to show.

use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use log::info;
use uuid::Uuid;

use crate::MIGRATIONS;
use crate::db::{DbConnection, establish_connection_pool};
use crate::domain::client::{NewClient, NewReminder, ReminderKind, VipStatus};
use crate::domain::harvest::{NewHarvestPlan, PlanType};
use crate::domain::karigar::{NewKarigar, NewKarigarOrder, OrderStatus, UpdateKarigarOrder};
use crate::domain::ledger::{EntryCategory, EntryType, NewLedgerEntry};
use crate::domain::stock::{NewStockItem, StockKind, StockStatus};
use crate::domain::transaction::{
    NewBankAccount, NewTransaction, PaymentMethod, TxnCategory, TxnStatus, TxnType,
};
use crate::repository::{
    ClientReader, ClientWriter, DieselRepository, HarvestWriter, KarigarWriter, LedgerWriter,
    OrderWriter, ReminderWriter, StockWriter, TransactionWriter,
};

type DemoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Creates, migrates and seeds a throwaway SQLite file and returns a
/// repository backed by it.
pub fn prepare() -> DemoResult<DieselRepository> {
    let path = std::env::temp_dir().join(format!("shreeji-demo-{}.db", Uuid::new_v4()));
    let database_url = path.to_string_lossy().into_owned();

    let mut conn = SqliteConnection::establish(&database_url)?;
    conn.run_pending_migrations(MIGRATIONS)?;

    let pool = establish_connection_pool(&database_url)?;
    let repo = DieselRepository::new(pool);
    seed(&repo)?;

    info!("Demo database ready at {database_url}");
    Ok(repo)
}

/// Seeds the showroom dataset: clients with reminders, karigars with an
/// open ledger, harvest groups part-way through their year, recent
/// transactions, bank accounts and a display inventory.
pub fn seed(repo: &DieselRepository) -> DemoResult<()> {
    let clients = [
        NewClient::new(
            "Mrs. Priya Sharma".to_string(),
            "+91 98765 43210".to_string(),
            "priya.sharma@email.com".to_string(),
            "Sector 15, Gurgaon".to_string(),
            "ABCDE1234F".to_string(),
            date(1985, 3, 15),
            Some(date(2010, 12, 5)),
            Some("16".to_string()),
            Some("2.6".to_string()),
            Some("M".to_string()),
            "Diamond Jewelry".to_string(),
            VipStatus::Vip,
        ),
        NewClient::new(
            "Mr. Rajesh Patel".to_string(),
            "+91 87654 32109".to_string(),
            "rajesh.patel@email.com".to_string(),
            "Vastrapur, Ahmedabad".to_string(),
            "FGHIJ5678K".to_string(),
            date(1978, 8, 22),
            Some(date(2005, 2, 14)),
            None,
            None,
            None,
            "Gold Jewelry".to_string(),
            VipStatus::Premium,
        ),
        NewClient::new(
            "Ms. Anita Gupta".to_string(),
            "+91 76543 21098".to_string(),
            "anita.gupta@email.com".to_string(),
            "CP, New Delhi".to_string(),
            "KLMNO9012P".to_string(),
            date(1992, 6, 10),
            None,
            None,
            None,
            None,
            "Silver Jewelry".to_string(),
            VipStatus::Regular,
        ),
        NewClient::new(
            "Mr. Suresh Kumar".to_string(),
            "+91 65432 10987".to_string(),
            "suresh.kumar@email.com".to_string(),
            "Koramangala, Bengaluru".to_string(),
            "PQRST3456U".to_string(),
            date(1980, 4, 18),
            None,
            None,
            None,
            None,
            "Gold Jewelry".to_string(),
            VipStatus::Regular,
        ),
        NewClient::new(
            "Ms. Kavita Sharma".to_string(),
            "+91 54321 09876".to_string(),
            "kavita.sharma@email.com".to_string(),
            "Aundh, Pune".to_string(),
            "VWXYZ7890A".to_string(),
            date(1990, 11, 2),
            None,
            None,
            None,
            None,
            "Diamond Jewelry".to_string(),
            VipStatus::Regular,
        ),
    ];
    repo.create_clients(&clients)?;

    let priya = client_id(repo, "priya.sharma@email.com")?;
    let rajesh = client_id(repo, "rajesh.patel@email.com")?;
    let anita = client_id(repo, "anita.gupta@email.com")?;
    let suresh = client_id(repo, "suresh.kumar@email.com")?;
    let kavita = client_id(repo, "kavita.sharma@email.com")?;

    // Purchase history predating the seeded transactions. The repository
    // only moves these figures through transaction writes, so the opening
    // position is written directly.
    let mut conn = repo.conn()?;
    set_opening_figures(&mut conn, priya, 1_250_000, 3_500_000, -25_000, date(2024, 11, 20))?;
    set_opening_figures(&mut conn, rajesh, 850_000, 2_100_000, 15_000, date(2024, 10, 15))?;
    set_opening_figures(&mut conn, anita, 320_000, 450_000, 0, date(2024, 9, 30))?;

    repo.create_reminder(&NewReminder::new(
        priya,
        "Follow up on diamond necklace inquiry".to_string(),
        ReminderKind::FollowUp,
        date(2025, 1, 10),
    ))?;
    repo.create_reminder(&NewReminder::new(
        rajesh,
        "Pending payment for gold bracelet".to_string(),
        ReminderKind::PaymentDue,
        date(2024, 12, 31),
    ))?;
    let greeting = repo.create_reminder(&NewReminder::new(
        anita,
        "Send anniversary greeting".to_string(),
        ReminderKind::Greeting,
        date(2025, 2, 14),
    ))?;
    repo.complete_reminder(greeting.id)?;

    let goldsmith = repo.create_karigar(&NewKarigar::new(
        "Rajesh Kumar".to_string(),
        "+91-9876543210".to_string(),
        vec!["Gold Jewelry".to_string()],
        4.8,
    ))?;
    let setter = repo.create_karigar(&NewKarigar::new(
        "Priya Sharma".to_string(),
        "+91-9876543211".to_string(),
        vec!["Diamond Setting".to_string()],
        4.9,
    ))?;
    repo.create_karigar(&NewKarigar::new(
        "Amit Patel".to_string(),
        "+91-9876543212".to_string(),
        vec!["Silver Work".to_string()],
        4.7,
    ))?;

    let ring = repo.create_order(&NewKarigarOrder::new(
        goldsmith.id,
        "Ring".to_string(),
        Some(5.2),
        Some(1),
        Some(date(2024, 1, 15)),
        None,
    ))?;
    repo.update_order(
        ring.id,
        &UpdateKarigarOrder::new(OrderStatus::InProgress, None, None),
    )?;
    repo.create_order(&NewKarigarOrder::new(
        setter.id,
        "Necklace".to_string(),
        Some(12.5),
        Some(8),
        Some(date(2024, 1, 20)),
        None,
    ))?;

    let entries = [
        NewLedgerEntry::new(
            goldsmith.id,
            date(2024, 11, 1),
            EntryType::Issue,
            EntryCategory::Gold,
            "Gold issued for bulk orders".to_string(),
            None,
            Some(150.0),
            Some(22),
            None,
            None,
            None,
            1_027_500,
            Some("GI001".to_string()),
        ),
        NewLedgerEntry::new(
            goldsmith.id,
            date(2024, 11, 5),
            EntryType::Issue,
            EntryCategory::Diamond,
            "Diamond issued for necklace set".to_string(),
            Some("Diamond Necklace Set".to_string()),
            None,
            None,
            Some(2.5),
            Some("1 no (EF VVS)".to_string()),
            None,
            125_000,
            Some("KO001".to_string()),
        ),
        NewLedgerEntry::new(
            goldsmith.id,
            date(2024, 11, 10),
            EntryType::Receive,
            EntryCategory::Gold,
            "Gold bangles completed".to_string(),
            Some("Traditional Gold Bangles (6 pieces)".to_string()),
            Some(85.2),
            Some(22),
            None,
            None,
            None,
            583_620,
            Some("KO002".to_string()),
        ),
        NewLedgerEntry::new(
            goldsmith.id,
            date(2024, 11, 10),
            EntryType::Receive,
            EntryCategory::Labour,
            "Labour charges for gold bangles".to_string(),
            Some("Traditional Gold Bangles (6 pieces)".to_string()),
            None,
            None,
            None,
            None,
            Some(15_000),
            15_000,
            Some("KO002".to_string()),
        ),
        NewLedgerEntry::new(
            goldsmith.id,
            date(2024, 11, 15),
            EntryType::Receive,
            EntryCategory::Gold,
            "Diamond necklace set completed".to_string(),
            Some("Diamond Necklace Set".to_string()),
            Some(45.5),
            Some(18),
            None,
            None,
            None,
            311_775,
            Some("KO001".to_string()),
        ),
        NewLedgerEntry::new(
            goldsmith.id,
            date(2024, 11, 15),
            EntryType::Receive,
            EntryCategory::Diamond,
            "Diamond necklace set completed".to_string(),
            Some("Diamond Necklace Set".to_string()),
            None,
            None,
            Some(2.5),
            Some("1 no (EF VVS)".to_string()),
            None,
            125_000,
            Some("KO001".to_string()),
        ),
        NewLedgerEntry::new(
            goldsmith.id,
            date(2024, 11, 15),
            EntryType::Receive,
            EntryCategory::Labour,
            "Labour charges for diamond necklace".to_string(),
            Some("Diamond Necklace Set".to_string()),
            None,
            None,
            None,
            None,
            Some(25_000),
            25_000,
            Some("KO001".to_string()),
        ),
    ];
    for entry in &entries {
        repo.create_ledger_entry(entry)?;
    }

    // (client, plan type, group, monthly amount, book number, paid months, method)
    let plans = [
        (priya, PlanType::Diamond, 10, 25_000, 15, 10, PaymentMethod::Rtgs),
        (rajesh, PlanType::Gold, 11, 15_000, 8, 12, PaymentMethod::Cash),
        (anita, PlanType::Diamond, 10, 25_000, 42, 11, PaymentMethod::Upi),
        (suresh, PlanType::Diamond, 10, 25_000, 18, 10, PaymentMethod::Cheque),
        (kavita, PlanType::Diamond, 10, 25_000, 7, 9, PaymentMethod::Rtgs),
    ];
    for (client, plan_type, group_no, monthly, registration_no, paid_months, method) in plans {
        let plan = repo.create_plan(&NewHarvestPlan::new(
            client,
            plan_type,
            group_no,
            monthly,
            date(2024, 1, 1),
        ))?;
        // Registration numbers carried over from the paper group books.
        set_registration_no(&mut conn, plan.id, registration_no)?;
        for seq in 0..paid_months {
            repo.mark_payment_paid(plan.id, seq, date(2024, 1 + seq as u32, 5), method)?;
        }
    }

    // Recent counter activity. Parties stay free text here, so none of
    // these move a client balance.
    let now = Utc::now().naive_utc();
    let transactions = [
        NewTransaction::new(
            TxnType::Receipt,
            TxnCategory::Client,
            245_000,
            "Diamond necklace set payment".to_string(),
            "Mrs. Sharma".to_string(),
            None,
            None,
            PaymentMethod::Rtgs,
            now,
            TxnStatus::Completed,
            Some("REF123456".to_string()),
        )?,
        NewTransaction::new(
            TxnType::Payment,
            TxnCategory::Vendor,
            185_000,
            "Gold purchase from vendor".to_string(),
            "Rajesh Gold Suppliers".to_string(),
            None,
            None,
            PaymentMethod::Rtgs,
            now - Duration::hours(1),
            TxnStatus::Completed,
            Some("PAY789012".to_string()),
        )?,
        NewTransaction::new(
            TxnType::Payment,
            TxnCategory::Karigar,
            25_000,
            "Labour charges for diamond setting".to_string(),
            "Suresh Karigar".to_string(),
            None,
            None,
            PaymentMethod::Cash,
            now - Duration::hours(2),
            TxnStatus::Completed,
            None,
        )?,
        NewTransaction::new(
            TxnType::Payment,
            TxnCategory::Expense,
            15_000,
            "Shop rent for December".to_string(),
            "Property Owner".to_string(),
            None,
            None,
            PaymentMethod::Cheque,
            now - Duration::hours(3),
            TxnStatus::Pending,
            Some("CHQ001".to_string()),
        )?,
    ];
    for txn in &transactions {
        repo.create_transaction(txn)?;
    }

    repo.create_bank_account(&NewBankAccount::new(
        "HDFC Current Account".to_string(),
        "50100234561234".to_string(),
        5_500_000,
    ))?;
    repo.create_bank_account(&NewBankAccount::new(
        "SBI Savings Account".to_string(),
        "30294857565678".to_string(),
        3_250_000,
    ))?;

    let items = [
        NewStockItem::new(
            "TAG001".to_string(),
            StockKind::DiamondJewelry,
            "Diamond Necklace Set".to_string(),
            "Elegant diamond necklace with matching earrings".to_string(),
            Some(45.5),
            Some(18),
            Some(2.5),
            Some("1 no (EF VVS)".to_string()),
            185_000,
            245_000,
            StockStatus::InStock,
            "Main Display".to_string(),
            Some("QR_SJ001".to_string()),
        )?,
        NewStockItem::new(
            "TAG002".to_string(),
            StockKind::GoldJewelry,
            "Gold Bangles Set (6 pieces)".to_string(),
            "Traditional gold bangles with intricate design".to_string(),
            Some(85.2),
            Some(22),
            None,
            None,
            425_000,
            485_000,
            StockStatus::InStock,
            "Vault A".to_string(),
            Some("QR_SJ002".to_string()),
        )?,
        NewStockItem::new(
            "TAG003".to_string(),
            StockKind::LooseDiamond,
            "Loose Diamond Collection".to_string(),
            "Round brilliant cut diamonds, various sizes".to_string(),
            None,
            None,
            Some(5.75),
            Some("2 no (EFG VVS-VS)".to_string()),
            575_000,
            625_000,
            StockStatus::InStock,
            "Diamond Box - Main".to_string(),
            Some("QR_SJ003".to_string()),
        )?,
        NewStockItem::new(
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
        )?,
    ];
    repo.create_stock_items(&items)?;

    Ok(())
}

fn client_id(repo: &DieselRepository, email: &str) -> DemoResult<i32> {
    let client = repo
        .get_client_by_email(email)?
        .ok_or_else(|| format!("seeded client {email} not found"))?;
    Ok(client.id)
}

fn set_opening_figures(
    conn: &mut DbConnection,
    client_id: i32,
    total: i64,
    lifetime: i64,
    balance: i64,
    last_purchase: NaiveDate,
) -> DemoResult<()> {
    use crate::schema::clients;

    diesel::update(clients::table.find(client_id))
        .set((
            clients::total_purchases.eq(total),
            clients::lifetime_purchases.eq(lifetime),
            clients::current_balance.eq(balance),
            clients::last_purchase.eq(Some(last_purchase)),
        ))
        .execute(conn)?;
    Ok(())
}

fn set_registration_no(
    conn: &mut DbConnection,
    plan_id: i32,
    registration_no: i32,
) -> DemoResult<()> {
    use crate::schema::harvest_plans;

    diesel::update(harvest_plans::table.find(plan_id))
        .set(harvest_plans::registration_no.eq(registration_no))
        .execute(conn)?;
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

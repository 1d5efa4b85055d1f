use chrono::NaiveDate;
use diesel::prelude::*;

use shreeji_erp::domain::client::{NewClient, NewReminder, ReminderKind, ReminderStatus, UpdateClient, VipStatus};
use shreeji_erp::domain::harvest::{
    NewHarvestPlan, NewLuckyDraw, PaymentStatus, PlanStatus, PlanType, UpdateHarvestPlan,
};
use shreeji_erp::domain::karigar::{NewKarigar, NewKarigarOrder, OrderStatus, UpdateKarigarOrder};
use shreeji_erp::domain::ledger::{EntryCategory, EntryType, NewLedgerEntry};
use shreeji_erp::domain::stock::{NewStockItem, StockKind, StockStatus, UpdateStockItem};
use shreeji_erp::domain::transaction::{
    NewBankAccount, NewTransaction, PaymentMethod, TxnCategory, TxnStatus, TxnType,
};
use shreeji_erp::repository::errors::RepositoryError;
use shreeji_erp::repository::{
    ClientListQuery, ClientReader, ClientWriter, DieselRepository, HarvestReader, HarvestWriter,
    KarigarReader, KarigarWriter, LedgerReader, LedgerWriter, OrderReader, OrderWriter,
    ReminderListQuery, ReminderReader, ReminderWriter, StockListQuery, StockReader, StockWriter,
    TransactionListQuery, TransactionReader, TransactionWriter,
};

mod common;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_client(name: &str, email: &str, vip_status: VipStatus) -> NewClient {
    NewClient::new(
        name.to_string(),
        "+91 98765 43210".to_string(),
        email.to_string(),
        "MG Road, Mumbai".to_string(),
        "ABCDE1234F".to_string(),
        date(1985, 3, 15),
        None,
        None,
        None,
        None,
        "Gold Jewelry".to_string(),
        vip_status,
    )
}

fn gold_entry(karigar_id: i32, on: NaiveDate, entry_type: EntryType, grams: f64) -> NewLedgerEntry {
    NewLedgerEntry::new(
        karigar_id,
        on,
        entry_type,
        EntryCategory::Gold,
        "Gold movement".to_string(),
        None,
        Some(grams),
        Some(22),
        None,
        None,
        None,
        (grams * 6_850.0) as i64,
        None,
    )
}

fn money(
    txn_type: TxnType,
    amount: i64,
    client_id: Option<i32>,
    at: NaiveDate,
    status: TxnStatus,
) -> NewTransaction {
    NewTransaction::new(
        txn_type,
        TxnCategory::Client,
        amount,
        "Counter entry".to_string(),
        "Walk-in".to_string(),
        client_id,
        None,
        PaymentMethod::Cash,
        at.and_hms_opt(14, 30, 0).unwrap(),
        status,
        None,
    )
    .unwrap()
}

#[test]
fn test_client_repository_crud() {
    let test_db = common::TestDb::new("test_client_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_clients(&[
            new_client("Meera Shah", "Meera.Shah@Example.com", VipStatus::Vip),
            new_client("Arjun Mehta", "arjun.mehta@example.com", VipStatus::Regular),
        ])
        .unwrap();
    assert_eq!(created, 2);

    let (total, items) = repo.list_clients(ClientListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].name, "Arjun Mehta");
    assert_eq!(items[1].name, "Meera Shah");
    let arjun = items[0].clone();
    let meera = items[1].clone();

    // emails are normalized on the way in
    let by_email = repo
        .get_client_by_email("meera.shah@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, meera.id);

    let (search_total, search_items) = repo
        .list_clients(ClientListQuery::new().search("Meera"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].name, "Meera Shah");

    let (vip_total, vip_items) = repo
        .list_clients(ClientListQuery::new().vip_status(VipStatus::Vip))
        .unwrap();
    assert_eq!(vip_total, 1);
    assert_eq!(vip_items[0].id, meera.id);

    let updated = repo
        .update_client(
            arjun.id,
            &UpdateClient::new(
                "Arjun Mehta".to_string(),
                "+91 87654 32109".to_string(),
                arjun.email.clone(),
                arjun.address.clone(),
                arjun.pan_no.clone(),
                arjun.birthday,
                Some(date(2015, 2, 14)),
                Some("18".to_string()),
                None,
                None,
                "Diamond Jewelry".to_string(),
                VipStatus::Premium,
            ),
        )
        .unwrap();
    assert_eq!(updated.vip_status, VipStatus::Premium);
    assert_eq!(updated.anniversary, Some(date(2015, 2, 14)));
    assert_eq!(updated.preferred_category, "Diamond Jewelry");

    repo.delete_client(meera.id).unwrap();
    assert!(repo.get_client_by_id(meera.id).unwrap().is_none());

    let (total_after, items_after) = repo.list_clients(ClientListQuery::new()).unwrap();
    assert_eq!(total_after, 1);
    assert_eq!(items_after[0].id, arjun.id);
}

#[test]
fn test_identity_update_keeps_client_fields() {
    let test_db = common::TestDb::new("test_identity_update_keeps_client_fields.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_clients(&[new_client(
        "Meera Shah",
        "meera.shah@example.com",
        VipStatus::Vip,
    )])
    .unwrap();
    let before = repo
        .get_client_by_email("meera.shah@example.com")
        .unwrap()
        .unwrap();

    // An update echoing the stored values back must not change anything.
    let echo = UpdateClient::new(
        before.name.clone(),
        before.phone.clone(),
        before.email.clone(),
        before.address.clone(),
        before.pan_no.clone(),
        before.birthday,
        before.anniversary,
        before.ring_size.clone(),
        before.bangle_size.clone(),
        before.bracelet_size.clone(),
        before.preferred_category.clone(),
        before.vip_status,
    );
    let unchanged = repo.update_client(before.id, &echo).unwrap();

    assert_eq!(unchanged.name, before.name);
    assert_eq!(unchanged.phone, before.phone);
    assert_eq!(unchanged.email, before.email);
    assert_eq!(unchanged.address, before.address);
    assert_eq!(unchanged.pan_no, before.pan_no);
    assert_eq!(unchanged.birthday, before.birthday);
    assert_eq!(unchanged.anniversary, before.anniversary);
    assert_eq!(unchanged.ring_size, before.ring_size);
    assert_eq!(unchanged.bangle_size, before.bangle_size);
    assert_eq!(unchanged.bracelet_size, before.bracelet_size);
    assert_eq!(unchanged.preferred_category, before.preferred_category);
    assert_eq!(unchanged.vip_status, before.vip_status);
    assert_eq!(unchanged.current_balance, before.current_balance);
    assert_eq!(unchanged.total_purchases, before.total_purchases);
    assert_eq!(unchanged.lifetime_purchases, before.lifetime_purchases);
    assert_eq!(unchanged.last_purchase, before.last_purchase);

    // Changing a single field leaves the rest alone.
    let retargeted = repo
        .update_client(
            before.id,
            &UpdateClient::new(
                before.name.clone(),
                before.phone.clone(),
                before.email.clone(),
                before.address.clone(),
                before.pan_no.clone(),
                before.birthday,
                before.anniversary,
                before.ring_size.clone(),
                before.bangle_size.clone(),
                before.bracelet_size.clone(),
                "Silver Jewelry".to_string(),
                before.vip_status,
            ),
        )
        .unwrap();
    assert_eq!(retargeted.preferred_category, "Silver Jewelry");
    assert_eq!(retargeted.name, before.name);
    assert_eq!(retargeted.phone, before.phone);
    assert_eq!(retargeted.vip_status, before.vip_status);
    assert_eq!(retargeted.current_balance, before.current_balance);
}

#[test]
fn test_reminder_lifecycle() {
    let test_db = common::TestDb::new("test_reminder_lifecycle.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_clients(&[new_client(
        "Meera Shah",
        "meera.shah@example.com",
        VipStatus::Regular,
    )])
    .unwrap();
    let client = repo
        .get_client_by_email("meera.shah@example.com")
        .unwrap()
        .unwrap();

    let follow_up = repo
        .create_reminder(&NewReminder::new(
            client.id,
            "Follow up on necklace inquiry".to_string(),
            ReminderKind::FollowUp,
            date(2025, 1, 10),
        ))
        .unwrap();
    let payment_due = repo
        .create_reminder(&NewReminder::new(
            client.id,
            "Pending payment for bracelet".to_string(),
            ReminderKind::PaymentDue,
            date(2024, 12, 31),
        ))
        .unwrap();
    assert_eq!(follow_up.status, ReminderStatus::Pending);

    // earliest due date comes first, each row joined to its client
    let rows = repo.list_reminders(ReminderListQuery::new()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0.id, payment_due.id);
    assert_eq!(rows[0].1.name, "Meera Shah");

    let completed = repo.complete_reminder(payment_due.id).unwrap();
    assert_eq!(completed.status, ReminderStatus::Completed);

    let pending = repo
        .list_reminders(ReminderListQuery::new().status(ReminderStatus::Pending))
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0.id, follow_up.id);

    repo.delete_reminder(follow_up.id).unwrap();
    let remaining = repo
        .list_reminders(ReminderListQuery::new().client(client.id))
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].0.id, completed.id);
}

#[test]
fn test_stock_repository_crud() {
    let test_db = common::TestDb::new("test_stock_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let bangles = NewStockItem::new(
        " tag100 ".to_string(),
        StockKind::GoldJewelry,
        "Gold Bangles Set".to_string(),
        "Traditional bangles".to_string(),
        Some(85.2),
        Some(22),
        Some(1.0),
        Some("should be dropped".to_string()),
        425_000,
        485_000,
        StockStatus::InStock,
        "Vault A".to_string(),
        Some("QR_T100".to_string()),
    )
    .unwrap();
    let solitaire = NewStockItem::new(
        "TAG200".to_string(),
        StockKind::LooseDiamond,
        "Solitaire 1.2ct".to_string(),
        "Round brilliant cut".to_string(),
        None,
        None,
        Some(1.2),
        Some("EF VVS".to_string()),
        350_000,
        410_000,
        StockStatus::InStock,
        "Diamond Box".to_string(),
        None,
    )
    .unwrap();
    assert_eq!(repo.create_stock_items(&[bangles, solitaire]).unwrap(), 2);

    // tags are upper-cased on the way in; gold kinds drop diamond fields
    let by_tag = repo.get_stock_item_by_tag("TAG100").unwrap().unwrap();
    assert_eq!(by_tag.name, "Gold Bangles Set");
    assert_eq!(by_tag.gold_weight, Some(85.2));
    assert_eq!(by_tag.diamond_weight, None);
    assert_eq!(by_tag.qr_code, "QR_T100");

    let loose = repo.get_stock_item_by_tag("TAG200").unwrap().unwrap();
    assert!(loose.qr_code.starts_with("QR-"));

    let (kind_total, kind_items) = repo
        .list_stock_items(StockListQuery::new().kind(StockKind::LooseDiamond))
        .unwrap();
    assert_eq!(kind_total, 1);
    assert_eq!(kind_items[0].tag_id, "TAG200");

    let (search_total, search_items) = repo
        .list_stock_items(StockListQuery::new().search("Vault"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].tag_id, "TAG100");

    let sold = repo
        .update_stock_item(
            by_tag.id,
            &UpdateStockItem::new(
                by_tag.kind,
                by_tag.name.clone(),
                by_tag.description.clone(),
                by_tag.gold_weight,
                by_tag.gold_karat,
                None,
                None,
                by_tag.purchase_price,
                510_000,
                StockStatus::Sold,
                by_tag.location.clone(),
            ),
        )
        .unwrap();
    assert_eq!(sold.status, StockStatus::Sold);
    assert_eq!(sold.current_value, 510_000);

    let (sold_total, _) = repo
        .list_stock_items(StockListQuery::new().status(StockStatus::Sold))
        .unwrap();
    assert_eq!(sold_total, 1);

    repo.delete_stock_item(loose.id).unwrap();
    let all = repo.list_all_stock_items().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].tag_id, "TAG100");
}

#[test]
fn test_karigar_orders_and_revision() {
    let test_db = common::TestDb::new("test_karigar_orders_and_revision.db");
    let repo = DieselRepository::new(test_db.pool());

    let goldsmith = repo
        .create_karigar(&NewKarigar::new(
            "Rajesh Kumar".to_string(),
            "+91-9876543210".to_string(),
            vec!["Gold Jewelry".to_string()],
            4.8,
        ))
        .unwrap();
    let setter = repo
        .create_karigar(&NewKarigar::new(
            "Amit Patel".to_string(),
            "+91-9876543212".to_string(),
            vec!["Diamond Setting".to_string()],
            4.7,
        ))
        .unwrap();

    let rev_before = repo.orders_revision();
    let ring = repo
        .create_order(&NewKarigarOrder::new(
            goldsmith.id,
            "Ring".to_string(),
            Some(5.2),
            Some(1),
            Some(date(2025, 1, 15)),
            None,
        ))
        .unwrap();
    repo.create_order(&NewKarigarOrder::new(
        goldsmith.id,
        "Necklace".to_string(),
        Some(12.5),
        Some(8),
        None,
        Some("Rush job".to_string()),
    ))
    .unwrap();
    repo.create_order(&NewKarigarOrder::new(
        setter.id,
        "Earrings".to_string(),
        None,
        Some(2),
        None,
        None,
    ))
    .unwrap();
    assert!(repo.orders_revision() > rev_before);
    assert_eq!(ring.status, OrderStatus::Pending);

    let rev_after_creates = repo.orders_revision();
    let finished = repo
        .update_order(
            ring.id,
            &UpdateKarigarOrder::new(OrderStatus::Completed, Some(date(2025, 1, 20)), None),
        )
        .unwrap();
    assert_eq!(finished.status, OrderStatus::Completed);
    assert_eq!(finished.expected_delivery, Some(date(2025, 1, 20)));
    assert!(repo.orders_revision() > rev_after_creates);

    let with_open = repo.list_karigars_with_open_orders().unwrap();
    assert_eq!(with_open.len(), 2);
    assert_eq!(with_open[0].0.name, "Amit Patel");
    assert_eq!(with_open[0].1, 1);
    assert_eq!(with_open[1].0.name, "Rajesh Kumar");
    assert_eq!(with_open[1].1, 1);

    let goldsmith_orders = repo.list_orders(Some(goldsmith.id)).unwrap();
    assert_eq!(goldsmith_orders.len(), 2);
    assert_eq!(repo.list_orders(None).unwrap().len(), 3);
}

#[test]
fn test_ledger_writes_move_stored_balances() {
    let test_db = common::TestDb::new("test_ledger_writes_move_stored_balances.db");
    let repo = DieselRepository::new(test_db.pool());

    let karigar = repo
        .create_karigar(&NewKarigar::new(
            "Rajesh Kumar".to_string(),
            "+91-9876543210".to_string(),
            vec!["Gold Jewelry".to_string()],
            4.8,
        ))
        .unwrap();
    assert_eq!(karigar.gold_balance, 0.0);

    repo.create_ledger_entry(&gold_entry(karigar.id, date(2024, 11, 1), EntryType::Issue, 150.0))
        .unwrap();
    let after_issue = repo.get_karigar_by_id(karigar.id).unwrap().unwrap();
    assert!((after_issue.gold_balance - 150.0).abs() < 1e-6);

    repo.create_ledger_entry(&NewLedgerEntry::new(
        karigar.id,
        date(2024, 11, 5),
        EntryType::Issue,
        EntryCategory::Diamond,
        "Diamonds for necklace".to_string(),
        None,
        None,
        None,
        Some(2.5),
        Some("EF VVS".to_string()),
        None,
        125_000,
        None,
    ))
    .unwrap();
    repo.create_ledger_entry(&gold_entry(karigar.id, date(2024, 11, 10), EntryType::Receive, 85.2))
        .unwrap();
    let labour = repo
        .create_ledger_entry(&NewLedgerEntry::new(
            karigar.id,
            date(2024, 11, 10),
            EntryType::Receive,
            EntryCategory::Labour,
            "Labour for bangles".to_string(),
            None,
            None,
            None,
            None,
            None,
            Some(15_000),
            15_000,
            None,
        ))
        .unwrap();

    let after_all = repo.get_karigar_by_id(karigar.id).unwrap().unwrap();
    assert!((after_all.gold_balance - 64.8).abs() < 1e-6);
    assert!((after_all.diamond_balance - 2.5).abs() < 1e-6);

    let entries = repo.list_ledger_entries(karigar.id).unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].entry_date, date(2024, 11, 1));
    assert!(!labour.settled);

    let settled = repo.settle_labour(labour.id).unwrap();
    assert!(settled.settled);

    // only unsettled labour receive entries qualify
    let not_labour = entries[0].id;
    assert!(matches!(
        repo.settle_labour(not_labour),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_reconcile_repairs_balance_drift() {
    let test_db = common::TestDb::new("test_reconcile_repairs_balance_drift.db");
    let repo = DieselRepository::new(test_db.pool());

    let karigar = repo
        .create_karigar(&NewKarigar::new(
            "Priya Sharma".to_string(),
            "+91-9876543211".to_string(),
            vec!["Diamond Setting".to_string()],
            4.9,
        ))
        .unwrap();
    repo.create_ledger_entry(&gold_entry(karigar.id, date(2024, 11, 1), EntryType::Issue, 150.0))
        .unwrap();
    repo.create_ledger_entry(&gold_entry(karigar.id, date(2024, 11, 10), EntryType::Receive, 85.2))
        .unwrap();

    // knock the stored balance out from under the ledger
    {
        use shreeji_erp::schema::karigars;

        let mut conn = test_db.pool().get().unwrap();
        diesel::update(karigars::table.find(karigar.id))
            .set(karigars::gold_balance.eq(500.0))
            .execute(&mut conn)
            .unwrap();
    }

    let report = repo.reconcile_karigar(karigar.id).unwrap();
    assert!((report.stored_gold - 500.0).abs() < 1e-6);
    assert!((report.derived_gold - 64.8).abs() < 1e-6);
    assert!(report.drifted());

    let repaired = repo.get_karigar_by_id(karigar.id).unwrap().unwrap();
    assert!((repaired.gold_balance - 64.8).abs() < 1e-6);

    let clean = repo.reconcile_karigar(karigar.id).unwrap();
    assert!(!clean.drifted());

    assert!(matches!(
        repo.reconcile_karigar(9_999),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_plan_creation_fills_instalment_slots() {
    let test_db = common::TestDb::new("test_plan_creation_fills_instalment_slots.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_clients(&[new_client(
        "Meera Shah",
        "meera.shah@example.com",
        VipStatus::Regular,
    )])
    .unwrap();
    let client = repo
        .get_client_by_email("meera.shah@example.com")
        .unwrap()
        .unwrap();

    let first = repo
        .create_plan(&NewHarvestPlan::new(
            client.id,
            PlanType::Gold,
            5,
            25_000,
            date(2024, 1, 1),
        ))
        .unwrap();
    assert_eq!(first.registration_no, 1);
    assert_eq!(first.status, PlanStatus::Active);
    assert_eq!(first.end_date, date(2024, 12, 31));

    let slots = repo.list_payments(first.id).unwrap();
    assert_eq!(slots.len(), 12);
    assert!(slots.iter().all(|p| p.status == PaymentStatus::Pending));
    assert!(slots.iter().all(|p| p.amount == 25_000));
    assert_eq!(slots[0].seq, 0);
    assert_eq!(slots[0].month_label, "Jan 2024");
    assert_eq!(slots[11].month_label, "Dec 2024");

    let second = repo
        .create_plan(&NewHarvestPlan::new(
            client.id,
            PlanType::Diamond,
            5,
            25_000,
            date(2024, 3, 1),
        ))
        .unwrap();
    assert_eq!(second.registration_no, 2);

    let group = repo.list_group_plans(5).unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!(group[0].id, first.id);

    // a freed number is handed out again before a new one
    repo.delete_plan(first.id).unwrap();
    let third = repo
        .create_plan(&NewHarvestPlan::new(
            client.id,
            PlanType::Gold,
            5,
            15_000,
            date(2024, 6, 1),
        ))
        .unwrap();
    assert_eq!(third.registration_no, 1);

    // retargeting the plan only touches slots that are still pending
    repo.mark_payment_paid(third.id, 0, date(2024, 6, 5), PaymentMethod::Cash)
        .unwrap();
    repo.update_plan(
        third.id,
        &UpdateHarvestPlan {
            plan_type: PlanType::Gold,
            monthly_amount: 20_000,
        },
    )
    .unwrap();
    let retargeted = repo.list_payments(third.id).unwrap();
    assert_eq!(retargeted[0].amount, 15_000);
    assert!(retargeted[1..].iter().all(|p| p.amount == 20_000));
}

#[test]
fn test_twelfth_payment_completes_plan() {
    let test_db = common::TestDb::new("test_twelfth_payment_completes_plan.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_clients(&[new_client(
        "Arjun Mehta",
        "arjun.mehta@example.com",
        VipStatus::Regular,
    )])
    .unwrap();
    let client = repo
        .get_client_by_email("arjun.mehta@example.com")
        .unwrap()
        .unwrap();
    let plan = repo
        .create_plan(&NewHarvestPlan::new(
            client.id,
            PlanType::Gold,
            8,
            15_000,
            date(2024, 1, 1),
        ))
        .unwrap();

    for seq in 0..11 {
        let paid = repo
            .mark_payment_paid(plan.id, seq, date(2024, 1 + seq as u32, 5), PaymentMethod::Cash)
            .unwrap();
        assert_eq!(paid.status, PaymentStatus::Paid);
        assert_eq!(paid.method, Some(PaymentMethod::Cash));
    }
    let still_active = repo.get_plan_by_id(plan.id).unwrap().unwrap();
    assert_eq!(still_active.status, PlanStatus::Active);

    let last = repo
        .mark_payment_paid(plan.id, 11, date(2024, 12, 5), PaymentMethod::Upi)
        .unwrap();
    assert_eq!(last.paid_date, Some(date(2024, 12, 5)));

    let completed = repo.get_plan_by_id(plan.id).unwrap().unwrap();
    assert_eq!(completed.status, PlanStatus::Completed);

    let redeemed = repo.set_plan_status(plan.id, PlanStatus::Redeemed).unwrap();
    assert_eq!(redeemed.status, PlanStatus::Redeemed);
}

#[test]
fn test_lucky_draws_are_persisted() {
    let test_db = common::TestDb::new("test_lucky_draws_are_persisted.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_clients(&[new_client(
        "Meera Shah",
        "meera.shah@example.com",
        VipStatus::Regular,
    )])
    .unwrap();
    let client = repo
        .get_client_by_email("meera.shah@example.com")
        .unwrap()
        .unwrap();
    let plan = repo
        .create_plan(&NewHarvestPlan::new(
            client.id,
            PlanType::Diamond,
            10,
            25_000,
            date(2024, 1, 1),
        ))
        .unwrap();

    let matched = repo
        .record_draw(&NewLuckyDraw {
            group_no: 10,
            seed: 987_654_321,
            winner_no: plan.registration_no,
            plan_id: Some(plan.id),
        })
        .unwrap();
    assert_eq!(matched.seed, 987_654_321);
    assert_eq!(matched.plan_id, Some(plan.id));

    repo.record_draw(&NewLuckyDraw {
        group_no: 11,
        seed: -42,
        winner_no: 63,
        plan_id: None,
    })
    .unwrap();

    assert_eq!(repo.list_draws(None).unwrap().len(), 2);

    let group_draws = repo.list_draws(Some(10)).unwrap();
    assert_eq!(group_draws.len(), 1);
    assert_eq!(group_draws[0].id, matched.id);
    assert_eq!(group_draws[0].winner_no, plan.registration_no);

    // the winning plan row going away keeps the draw on record
    repo.delete_plan(plan.id).unwrap();
    let kept = repo.list_draws(Some(10)).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].plan_id, None);
}

#[test]
fn test_transaction_writes_sync_client_figures() {
    let test_db = common::TestDb::new("test_transaction_writes_sync_client_figures.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_clients(&[new_client(
        "Meera Shah",
        "meera.shah@example.com",
        VipStatus::Vip,
    )])
    .unwrap();
    let client = repo
        .get_client_by_email("meera.shah@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(client.current_balance, 0);
    assert_eq!(client.last_purchase, None);

    let receipt = repo
        .create_transaction(&money(
            TxnType::Receipt,
            245_000,
            Some(client.id),
            date(2024, 12, 1),
            TxnStatus::Completed,
        ))
        .unwrap();

    let after_receipt = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(after_receipt.current_balance, 245_000);
    assert_eq!(after_receipt.total_purchases, 245_000);
    assert_eq!(after_receipt.lifetime_purchases, 245_000);
    assert_eq!(after_receipt.last_purchase, Some(date(2024, 12, 1)));

    // payments move the balance but not the purchase totals
    let payment = repo
        .create_transaction(&money(
            TxnType::Payment,
            40_000,
            Some(client.id),
            date(2024, 12, 2),
            TxnStatus::Completed,
        ))
        .unwrap();
    let after_payment = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(after_payment.current_balance, 205_000);
    assert_eq!(after_payment.total_purchases, 245_000);

    // pending rows sit outside the books until completed
    repo.create_transaction(&money(
        TxnType::Receipt,
        99_000,
        Some(client.id),
        date(2024, 12, 3),
        TxnStatus::Pending,
    ))
    .unwrap();
    let after_pending = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(after_pending.current_balance, 205_000);
    assert_eq!(after_pending.total_purchases, 245_000);

    // a back-dated receipt never pulls last-purchase backwards
    repo.create_transaction(&money(
        TxnType::Receipt,
        10_000,
        Some(client.id),
        date(2024, 11, 15),
        TxnStatus::Completed,
    ))
    .unwrap();
    let after_backdated = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(after_backdated.last_purchase, Some(date(2024, 12, 1)));
    assert_eq!(after_backdated.total_purchases, 255_000);

    // rewriting swaps the old effect for the new one
    repo.update_transaction(
        payment.id,
        &money(
            TxnType::Payment,
            60_000,
            Some(client.id),
            date(2024, 12, 2),
            TxnStatus::Completed,
        ),
    )
    .unwrap();
    let after_update = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(after_update.current_balance, 195_000);

    // deleting rolls the books back and re-derives last-purchase
    repo.delete_transaction(receipt.id).unwrap();
    let after_delete = repo.get_client_by_id(client.id).unwrap().unwrap();
    assert_eq!(after_delete.current_balance, -50_000);
    assert_eq!(after_delete.total_purchases, 10_000);
    assert_eq!(after_delete.lifetime_purchases, 10_000);
    assert_eq!(after_delete.last_purchase, Some(date(2024, 11, 15)));
}

#[test]
fn test_transaction_list_filters_and_daily_totals() {
    let test_db = common::TestDb::new("test_transaction_list_filters_and_daily_totals.db");
    let repo = DieselRepository::new(test_db.pool());

    let txns = [
        NewTransaction::new(
            TxnType::Receipt,
            TxnCategory::Client,
            100_000,
            "Necklace sale".to_string(),
            "Mrs. Shah".to_string(),
            None,
            None,
            PaymentMethod::Rtgs,
            date(2024, 12, 10).and_hms_opt(11, 0, 0).unwrap(),
            TxnStatus::Completed,
            Some("REF100".to_string()),
        )
        .unwrap(),
        NewTransaction::new(
            TxnType::Payment,
            TxnCategory::Vendor,
            30_000,
            "Gold purchase".to_string(),
            "Gold Suppliers".to_string(),
            None,
            None,
            PaymentMethod::Cheque,
            date(2024, 12, 10).and_hms_opt(15, 0, 0).unwrap(),
            TxnStatus::Completed,
            None,
        )
        .unwrap(),
        NewTransaction::new(
            TxnType::Receipt,
            TxnCategory::Client,
            50_000,
            "Advance booking".to_string(),
            "Mr. Mehta".to_string(),
            None,
            None,
            PaymentMethod::Upi,
            date(2024, 12, 10).and_hms_opt(18, 0, 0).unwrap(),
            TxnStatus::Pending,
            None,
        )
        .unwrap(),
        NewTransaction::new(
            TxnType::Receipt,
            TxnCategory::Client,
            70_000,
            "Ring sale".to_string(),
            "Mrs. Gupta".to_string(),
            None,
            None,
            PaymentMethod::Cash,
            date(2024, 12, 11).and_hms_opt(10, 0, 0).unwrap(),
            TxnStatus::Completed,
            None,
        )
        .unwrap(),
    ];
    for txn in &txns {
        repo.create_transaction(txn).unwrap();
    }

    let (total, newest_first) = repo.list_transactions(TransactionListQuery::new()).unwrap();
    assert_eq!(total, 4);
    assert_eq!(newest_first[0].description, "Ring sale");

    let (vendor_total, vendor_items) = repo
        .list_transactions(TransactionListQuery::new().category(TxnCategory::Vendor))
        .unwrap();
    assert_eq!(vendor_total, 1);
    assert_eq!(vendor_items[0].party, "Gold Suppliers");

    let (receipt_total, _) = repo
        .list_transactions(TransactionListQuery::new().txn_type(TxnType::Receipt))
        .unwrap();
    assert_eq!(receipt_total, 3);

    let (ref_total, ref_items) = repo
        .list_transactions(TransactionListQuery::new().search("REF100"))
        .unwrap();
    assert_eq!(ref_total, 1);
    assert_eq!(ref_items[0].amount, 100_000);

    // pending rows and other days stay out of the daily figures
    let totals = repo.daily_totals(date(2024, 12, 10)).unwrap();
    assert_eq!(totals.receipts, 100_000);
    assert_eq!(totals.payments, 30_000);
    assert_eq!(totals.count, 2);

    let empty = repo.daily_totals(date(2024, 12, 12)).unwrap();
    assert_eq!(empty.count, 0);
}

#[test]
fn test_bank_accounts_are_masked() {
    let test_db = common::TestDb::new("test_bank_accounts_are_masked.db");
    let repo = DieselRepository::new(test_db.pool());

    let hdfc = repo
        .create_bank_account(&NewBankAccount::new(
            "HDFC Current Account".to_string(),
            "50100234561234".to_string(),
            5_500_000,
        ))
        .unwrap();
    assert_eq!(hdfc.account_number, "****1234");

    repo.create_bank_account(&NewBankAccount::new(
        "SBI Savings Account".to_string(),
        "30294857565678".to_string(),
        3_250_000,
    ))
    .unwrap();

    let accounts = repo.list_bank_accounts().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].name, "HDFC Current Account");

    repo.delete_bank_account(hdfc.id).unwrap();
    let remaining = repo.list_bank_accounts().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "SBI Savings Account");
}

#[test]
fn test_demo_seed_populates_every_screen() {
    let test_db = common::TestDb::new("test_demo_seed_populates_every_screen.db");
    let repo = DieselRepository::new(test_db.pool());
    shreeji_erp::demo::seed(&repo).unwrap();

    let (client_total, _) = repo.list_clients(ClientListQuery::new()).unwrap();
    assert_eq!(client_total, 5);
    assert_eq!(repo.list_reminders(ReminderListQuery::new()).unwrap().len(), 3);
    assert_eq!(
        repo.list_reminders(ReminderListQuery::new().status(ReminderStatus::Pending))
            .unwrap()
            .len(),
        2
    );

    let karigars = repo.list_karigars_with_open_orders().unwrap();
    assert_eq!(karigars.len(), 3);
    let goldsmith = karigars
        .iter()
        .find(|(k, _)| k.name == "Rajesh Kumar")
        .unwrap();
    assert_eq!(goldsmith.1, 1);
    assert!((goldsmith.0.gold_balance - 19.3).abs() < 1e-6);
    assert!(goldsmith.0.diamond_balance.abs() < 1e-6);
    assert_eq!(repo.list_ledger_entries(goldsmith.0.id).unwrap().len(), 7);

    let plans = repo.list_plans().unwrap();
    assert_eq!(plans.len(), 5);
    let rajesh_plan = plans
        .iter()
        .find(|(_, c)| c.email == "rajesh.patel@email.com")
        .unwrap();
    assert_eq!(rajesh_plan.0.status, PlanStatus::Completed);
    assert_eq!(rajesh_plan.0.registration_no, 8);
    let paid = repo
        .list_payments(rajesh_plan.0.id)
        .unwrap()
        .into_iter()
        .filter(|p| p.status == PaymentStatus::Paid)
        .count();
    assert_eq!(paid, 12);

    let (txn_total, _) = repo.list_transactions(TransactionListQuery::new()).unwrap();
    assert_eq!(txn_total, 4);
    assert_eq!(repo.list_bank_accounts().unwrap().len(), 2);
    assert_eq!(repo.list_all_stock_items().unwrap().len(), 4);
}

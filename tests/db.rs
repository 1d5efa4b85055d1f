use diesel::QueryDsl;
use diesel::RunQueryDsl;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new("test_creates_and_removes_db_files.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_migrations_create_schema() {
    use shreeji_erp::schema::{bank_accounts, clients, harvest_plans, inventory, karigars};

    let test_db = common::TestDb::new("test_migrations_create_schema.db");
    let mut conn = test_db.pool().get().unwrap();

    let clients: i64 = clients::table.count().get_result(&mut conn).unwrap();
    let stock: i64 = inventory::table.count().get_result(&mut conn).unwrap();
    let karigars: i64 = karigars::table.count().get_result(&mut conn).unwrap();
    let plans: i64 = harvest_plans::table.count().get_result(&mut conn).unwrap();
    let accounts: i64 = bank_accounts::table.count().get_result(&mut conn).unwrap();

    assert_eq!(clients, 0);
    assert_eq!(stock, 0);
    assert_eq!(karigars, 0);
    assert_eq!(plans, 0);
    assert_eq!(accounts, 0);
}

//! Services behind the money screen: the till, bank accounts and reports.

use std::str::FromStr;

use chrono::Utc;
use validator::Validate;

use crate::domain::transaction::{NewBankAccount, NewTransaction, Transaction, TxnCategory, TxnType};
use crate::dto::transactions::{TransactionsPageData, TransactionsQuery};
use crate::forms::transactions::{AddBankAccountForm, AddTransactionForm, SaveTransactionForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated, total_pages};
use crate::repository::errors::RepositoryError;
use crate::repository::{TransactionListQuery, TransactionReader, TransactionWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads the transactions screen: the filtered register, today's till
/// totals and the bank accounts.
pub fn load_transactions_page<R>(
    user: &AuthenticatedUser,
    repo: &R,
    query: TransactionsQuery,
) -> ServiceResult<TransactionsPageData>
where
    R: TransactionReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let category_filter = query
        .category
        .as_deref()
        .and_then(|s| TxnCategory::from_str(s).ok());
    let type_filter = query
        .txn_type
        .as_deref()
        .and_then(|s| TxnType::from_str(s).ok());

    let mut list_query = TransactionListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }
    if let Some(category) = category_filter {
        list_query = list_query.category(category);
    }
    if let Some(txn_type) = type_filter {
        list_query = list_query.txn_type(txn_type);
    }

    let (total, transactions) = repo.list_transactions(list_query).map_err(|err| {
        log::error!("Failed to list transactions: {err}");
        err
    })?;
    let transactions = Paginated::new(transactions, page, total_pages(total, DEFAULT_ITEMS_PER_PAGE));

    let today = repo.daily_totals(Utc::now().date_naive()).map_err(|err| {
        log::error!("Failed to load today's totals: {err}");
        err
    })?;
    let net_flow = today.receipts - today.payments;

    let accounts = repo.list_bank_accounts().map_err(|err| {
        log::error!("Failed to list bank accounts: {err}");
        err
    })?;

    Ok(TransactionsPageData {
        transactions,
        total,
        today,
        net_flow,
        accounts,
        search_query,
        category_filter: category_filter.map(|c| c.to_string()),
        type_filter: type_filter.map(|t| t.to_string()),
    })
}

/// Validates the form and books a transaction. The repository applies the
/// balance effect to the linked client in the same write.
pub fn add_transaction<R>(
    user: &AuthenticatedUser,
    repo: &R,
    form: AddTransactionForm,
) -> ServiceResult<()>
where
    R: TransactionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form(
            "Check the transaction details".to_string(),
        ));
    }

    let new_txn = NewTransaction::try_from(&form)?;

    repo.create_transaction(&new_txn).map_err(|err| {
        log::error!("Failed to add transaction: {err}");
        err
    })?;

    Ok(())
}

/// Rewrites a booked transaction. The repository reverses the old balance
/// effect and applies the new one.
pub fn save_transaction<R>(
    user: &AuthenticatedUser,
    repo: &R,
    form: SaveTransactionForm,
) -> ServiceResult<()>
where
    R: TransactionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form(
            "Check the transaction details".to_string(),
        ));
    }

    let updates = NewTransaction::try_from(&form)?;

    repo.update_transaction(form.id, &updates).map_err(|err| {
        log::error!("Failed to save transaction {}: {err}", form.id);
        err
    })?;

    Ok(())
}

/// Removes a transaction and rolls its balance effect back.
pub fn delete_transaction<R>(user: &AuthenticatedUser, repo: &R, txn_id: i32) -> ServiceResult<()>
where
    R: TransactionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_transaction(txn_id).map_err(|err| {
        log::error!("Failed to delete transaction {txn_id}: {err}");
        err
    })?;

    Ok(())
}

/// Renders the whole register as CSV for download.
pub fn export_csv<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<String>
where
    R: TransactionReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let (_, transactions) = repo
        .list_transactions(TransactionListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list transactions for export: {err}");
            err
        })?;

    write_csv(&transactions).map_err(|err| {
        log::error!("Failed to build transactions csv: {err}");
        ServiceError::Repository(RepositoryError::Unexpected(format!("csv write: {err}")))
    })
}

fn write_csv(transactions: &[Transaction]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "date",
        "type",
        "category",
        "amount",
        "description",
        "party",
        "method",
        "status",
        "reference",
    ])?;

    for txn in transactions {
        writer.write_record([
            txn.id.to_string(),
            txn.txn_date.format("%Y-%m-%d %H:%M").to_string(),
            txn.txn_type.to_string(),
            txn.category.to_string(),
            txn.amount.to_string(),
            txn.description.clone(),
            txn.party.clone(),
            txn.method.to_string(),
            txn.status.to_string(),
            txn.reference.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Validates the form and registers a bank account. The account number is
/// masked before it is stored.
pub fn add_bank_account<R>(
    user: &AuthenticatedUser,
    repo: &R,
    form: AddBankAccountForm,
) -> ServiceResult<()>
where
    R: TransactionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the account details".to_string()));
    }

    let account = NewBankAccount::try_from(&form)?;

    repo.create_bank_account(&account).map_err(|err| {
        log::error!("Failed to add bank account: {err}");
        err
    })?;

    Ok(())
}

/// Removes a bank account.
pub fn delete_bank_account<R>(
    user: &AuthenticatedUser,
    repo: &R,
    account_id: i32,
) -> ServiceResult<()>
where
    R: TransactionWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_bank_account(account_id).map_err(|err| {
        log::error!("Failed to delete bank account {account_id}: {err}");
        err
    })?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::transaction::{PaymentMethod, TxnStatus};
    use crate::repository::mock::MockRepository;

    fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "owner@shreeji.example".to_string(),
            email: "owner@shreeji.example".to_string(),
            name: "Administrator".to_string(),
            roles: vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_ADMIN_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    fn viewer_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "viewer".to_string(),
            email: "viewer@example.com".to_string(),
            name: "Viewer".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    fn txn(id: i32) -> Transaction {
        let booked = NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        Transaction {
            id,
            txn_type: TxnType::Receipt,
            category: TxnCategory::Client,
            amount: 245_000,
            description: "Diamond necklace set payment".to_string(),
            party: "Mrs. Priya Sharma".to_string(),
            client_id: Some(1),
            karigar_id: None,
            method: PaymentMethod::Rtgs,
            txn_date: booked,
            status: TxnStatus::Completed,
            reference: Some("REF123456".to_string()),
            created_at: booked,
        }
    }

    fn add_form() -> AddTransactionForm {
        AddTransactionForm {
            txn_type: "receipt".to_string(),
            category: "client".to_string(),
            amount: "245000".to_string(),
            description: "Diamond necklace set payment".to_string(),
            party: "Mrs. Priya Sharma".to_string(),
            client_id: "1".to_string(),
            karigar_id: "".to_string(),
            method: "rtgs".to_string(),
            txn_date: "2024-12-01".to_string(),
            status: "completed".to_string(),
            reference: "REF123456".to_string(),
        }
    }

    #[test]
    fn add_transaction_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_create_transaction().times(0);

        let result = add_transaction(&viewer_user(), &repo, add_form());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_transaction_books_the_entry() {
        let mut repo = MockRepository::new();
        repo.expect_create_transaction()
            .withf(|new_txn| {
                new_txn.amount == 245_000
                    && new_txn.client_id == Some(1)
                    && new_txn.status == TxnStatus::Completed
            })
            .times(1)
            .returning(|_| Ok(txn(1)));

        assert!(add_transaction(&admin_user(), &repo, add_form()).is_ok());
    }

    #[test]
    fn export_lists_every_row() {
        let mut repo = MockRepository::new();
        repo.expect_list_transactions()
            .withf(|query| query.pagination.is_none())
            .times(1)
            .returning(|_| Ok((2, vec![txn(1), txn(2)])));

        let csv = export_csv(&admin_user(), &repo).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,date,type"));
        assert!(lines[1].contains("Diamond necklace set payment"));
        assert!(lines[1].contains("245000"));
    }

    #[test]
    fn filters_fold_into_the_list_query() {
        let mut repo = MockRepository::new();
        repo.expect_list_transactions()
            .withf(|query| {
                query.category == Some(TxnCategory::Expense)
                    && query.txn_type == Some(TxnType::Payment)
            })
            .times(1)
            .returning(|_| Ok((0, vec![])));
        repo.expect_daily_totals()
            .times(1)
            .returning(|_| Ok(Default::default()));
        repo.expect_list_bank_accounts().times(1).returning(|| Ok(vec![]));

        let query = TransactionsQuery {
            search: None,
            category: Some("expense".to_string()),
            txn_type: Some("payment".to_string()),
            page: None,
        };

        let data = load_transactions_page(&admin_user(), &repo, query).unwrap();

        assert_eq!(data.total, 0);
        assert_eq!(data.category_filter.as_deref(), Some("expense"));
    }
}

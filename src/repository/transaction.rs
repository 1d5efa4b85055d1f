//! Store operations for money transactions and bank accounts.
//!
//! Writes keep the linked client's balance and purchase totals in step with
//! the transaction rows: creating, rewriting or deleting a completed entry
//! moves the client figures inside the same database transaction.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::transaction::{
    BankAccount, DailyTotals, NewBankAccount, NewTransaction, Transaction, TxnStatus, TxnType,
};
use crate::models::transaction::{
    BankAccount as DbBankAccount, NewBankAccount as DbNewBankAccount,
    NewTransaction as DbNewTransaction, Transaction as DbTransaction,
    UpdateTransaction as DbUpdateTransaction,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, TransactionListQuery, TransactionReader, TransactionWriter,
};

/// Move a client's balance by the signed effect of a completed transaction.
/// Receipts also count towards the purchase totals.
fn apply_client_effect(
    conn: &mut SqliteConnection,
    client_id: i32,
    txn_type: TxnType,
    amount: i64,
    on: NaiveDate,
) -> QueryResult<()> {
    use crate::schema::clients;

    let effect = match txn_type {
        TxnType::Receipt => amount,
        TxnType::Payment => -amount,
    };

    diesel::update(clients::table.find(client_id))
        .set((
            clients::current_balance.eq(clients::current_balance + effect),
            clients::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)?;

    if txn_type == TxnType::Receipt {
        diesel::update(clients::table.find(client_id))
            .set((
                clients::total_purchases.eq(clients::total_purchases + amount),
                clients::lifetime_purchases.eq(clients::lifetime_purchases + amount),
            ))
            .execute(conn)?;
        bump_last_purchase(conn, client_id, on)?;
    }

    Ok(())
}

/// Undo [`apply_client_effect`] for a row that is being rewritten or removed.
fn reverse_client_effect(
    conn: &mut SqliteConnection,
    client_id: i32,
    txn_type: TxnType,
    amount: i64,
) -> QueryResult<()> {
    use crate::schema::clients;

    let effect = match txn_type {
        TxnType::Receipt => amount,
        TxnType::Payment => -amount,
    };

    diesel::update(clients::table.find(client_id))
        .set((
            clients::current_balance.eq(clients::current_balance - effect),
            clients::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)?;

    if txn_type == TxnType::Receipt {
        diesel::update(clients::table.find(client_id))
            .set((
                clients::total_purchases.eq(clients::total_purchases - amount),
                clients::lifetime_purchases.eq(clients::lifetime_purchases - amount),
            ))
            .execute(conn)?;
        refresh_last_purchase(conn, client_id)?;
    }

    Ok(())
}

/// Last-purchase only ever moves forward when a receipt lands; a back-dated
/// receipt leaves a newer stored date alone.
fn bump_last_purchase(
    conn: &mut SqliteConnection,
    client_id: i32,
    on: NaiveDate,
) -> QueryResult<()> {
    use crate::schema::clients;

    let stored = clients::table
        .find(client_id)
        .select(clients::last_purchase)
        .get_result::<Option<NaiveDate>>(conn)?;

    match stored {
        Some(current) if current >= on => Ok(()),
        _ => diesel::update(clients::table.find(client_id))
            .set(clients::last_purchase.eq(Some(on)))
            .execute(conn)
            .map(|_| ()),
    }
}

/// Re-derive last-purchase from the remaining completed receipts. When none
/// remain the stored date stays, since opening history is not kept as rows.
fn refresh_last_purchase(conn: &mut SqliteConnection, client_id: i32) -> QueryResult<()> {
    use crate::schema::{clients, transactions};

    let latest = transactions::table
        .filter(transactions::client_id.eq(client_id))
        .filter(transactions::txn_type.eq(TxnType::Receipt.to_string()))
        .filter(transactions::status.eq(TxnStatus::Completed.to_string()))
        .select(max(transactions::txn_date))
        .get_result::<Option<NaiveDateTime>>(conn)?;

    if let Some(latest) = latest {
        diesel::update(clients::table.find(client_id))
            .set(clients::last_purchase.eq(Some(latest.date())))
            .execute(conn)?;
    }

    Ok(())
}

impl TransactionReader for DieselRepository {
    fn get_transaction_by_id(&self, id: i32) -> RepositoryResult<Option<Transaction>> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;
        let db_txn = transactions::table
            .find(id)
            .first::<DbTransaction>(&mut conn)
            .optional()?;

        match db_txn {
            Some(db_txn) => Ok(Some(
                Transaction::try_from(db_txn).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> RepositoryResult<(usize, Vec<Transaction>)> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = transactions::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(search) = &query.search {
                let pattern = format!("%{search}%");
                items = items.filter(
                    transactions::description
                        .like(pattern.clone())
                        .or(transactions::party.like(pattern.clone()))
                        .or(transactions::reference.like(pattern)),
                );
            }
            if let Some(category) = &query.category {
                items = items.filter(transactions::category.eq(category.to_string()));
            }
            if let Some(txn_type) = &query.txn_type {
                items = items.filter(transactions::txn_type.eq(txn_type.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let transactions = items
            .order((transactions::txn_date.desc(), transactions::id.desc()))
            .load::<DbTransaction>(&mut conn)?
            .into_iter()
            .map(|db_txn| Transaction::try_from(db_txn).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok((total, transactions))
    }

    fn daily_totals(&self, on: NaiveDate) -> RepositoryResult<DailyTotals> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;
        let start = on.and_time(NaiveTime::MIN);
        let end = on.succ_opt().unwrap_or(on).and_time(NaiveTime::MIN);

        let rows = transactions::table
            .filter(transactions::status.eq(TxnStatus::Completed.to_string()))
            .filter(transactions::txn_date.ge(start))
            .filter(transactions::txn_date.lt(end))
            .load::<DbTransaction>(&mut conn)?;

        let mut totals = DailyTotals::default();
        for row in rows {
            let txn = Transaction::try_from(row).map_err(RepositoryError::from)?;
            match txn.txn_type {
                TxnType::Receipt => totals.receipts += txn.amount,
                TxnType::Payment => totals.payments += txn.amount,
            }
            totals.count += 1;
        }

        Ok(totals)
    }

    fn list_bank_accounts(&self) -> RepositoryResult<Vec<BankAccount>> {
        use crate::schema::bank_accounts;

        let mut conn = self.conn()?;
        let accounts = bank_accounts::table
            .order(bank_accounts::name.asc())
            .load::<DbBankAccount>(&mut conn)?
            .into_iter()
            .map(BankAccount::from)
            .collect();

        Ok(accounts)
    }
}

impl TransactionWriter for DieselRepository {
    fn create_transaction(&self, new_txn: &NewTransaction) -> RepositoryResult<Transaction> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;
        let db_new_txn: DbNewTransaction = new_txn.into();
        let completed = new_txn.status == TxnStatus::Completed;
        let client_id = new_txn.client_id;
        let txn_type = new_txn.txn_type;
        let amount = new_txn.amount;
        let on = new_txn.txn_date.date();

        let created = conn
            .transaction::<DbTransaction, diesel::result::Error, _>(move |conn| {
                let created = diesel::insert_into(transactions::table)
                    .values(&db_new_txn)
                    .get_result::<DbTransaction>(conn)?;

                if completed {
                    if let Some(client_id) = client_id {
                        apply_client_effect(conn, client_id, txn_type, amount, on)?;
                    }
                }

                Ok(created)
            })
            .map_err(RepositoryError::from)?;

        Transaction::try_from(created).map_err(RepositoryError::from)
    }

    fn update_transaction(
        &self,
        txn_id: i32,
        updates: &NewTransaction,
    ) -> RepositoryResult<Transaction> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateTransaction = updates.into();
        let new_completed = updates.status == TxnStatus::Completed;
        let new_client_id = updates.client_id;
        let new_txn_type = updates.txn_type;
        let new_amount = updates.amount;
        let new_on = updates.txn_date.date();

        let updated = conn.transaction::<DbTransaction, RepositoryError, _>(move |conn| {
            let old = transactions::table
                .find(txn_id)
                .first::<DbTransaction>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;
            let old = Transaction::try_from(old).map_err(RepositoryError::from)?;

            let updated = diesel::update(transactions::table.find(txn_id))
                .set(&db_updates)
                .get_result::<DbTransaction>(conn)?;

            if old.status == TxnStatus::Completed {
                if let Some(client_id) = old.client_id {
                    reverse_client_effect(conn, client_id, old.txn_type, old.amount)?;
                }
            }
            if new_completed {
                if let Some(client_id) = new_client_id {
                    apply_client_effect(conn, client_id, new_txn_type, new_amount, new_on)?;
                }
            }

            Ok(updated)
        })?;

        Transaction::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_transaction(&self, txn_id: i32) -> RepositoryResult<()> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(move |conn| {
            let old = transactions::table
                .find(txn_id)
                .first::<DbTransaction>(conn)
                .optional()?;
            let Some(old) = old else {
                return Ok(());
            };
            let old = Transaction::try_from(old).map_err(RepositoryError::from)?;

            diesel::delete(transactions::table.find(txn_id)).execute(conn)?;

            if old.status == TxnStatus::Completed {
                if let Some(client_id) = old.client_id {
                    reverse_client_effect(conn, client_id, old.txn_type, old.amount)?;
                }
            }

            Ok(())
        })
    }

    fn create_bank_account(&self, account: &NewBankAccount) -> RepositoryResult<BankAccount> {
        use crate::schema::bank_accounts;

        let mut conn = self.conn()?;
        let db_account: DbNewBankAccount = account.into();

        let created = diesel::insert_into(bank_accounts::table)
            .values(&db_account)
            .get_result::<DbBankAccount>(&mut conn)?;

        Ok(BankAccount::from(created))
    }

    fn delete_bank_account(&self, account_id: i32) -> RepositoryResult<()> {
        use crate::schema::bank_accounts;

        let mut conn = self.conn()?;
        diesel::delete(bank_accounts::table.find(account_id)).execute(&mut conn)?;
        Ok(())
    }
}

//! Store operations for clients and their reminders.

use diesel::prelude::*;

use crate::domain::client::{
    Client, NewClient, NewReminder, Reminder, ReminderStatus, UpdateClient,
};
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, NewReminder as DbNewReminder,
    Reminder as DbReminder, UpdateClient as DbUpdateClient,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, DieselRepository, ReminderListQuery,
    ReminderReader, ReminderWriter,
};

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_client = clients::table
            .find(id)
            .first::<DbClient>(&mut conn)
            .optional()?;

        match db_client {
            Some(db_client) => Ok(Some(
                Client::try_from(db_client).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn get_client_by_email(&self, email: &str) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_client = clients::table
            .filter(clients::email.eq(email))
            .first::<DbClient>(&mut conn)
            .optional()?;

        match db_client {
            Some(db_client) => Ok(Some(
                Client::try_from(db_client).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = clients::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(search) = &query.search {
                let pattern = format!("%{search}%");
                items = items.filter(
                    clients::name
                        .like(pattern.clone())
                        .or(clients::email.like(pattern.clone()))
                        .or(clients::phone.like(pattern.clone()))
                        .or(clients::address.like(pattern)),
                );
            }
            if let Some(vip_status) = &query.vip_status {
                items = items.filter(clients::vip_status.eq(vip_status.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let clients = items
            .order(clients::name.asc())
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(|db_client| Client::try_from(db_client).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok((total, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewClient> = new_clients.iter().map(Into::into).collect();

        let affected = diesel::insert_into(clients::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_client(&self, client_id: i32, updates: &UpdateClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateClient = updates.into();

        let updated = diesel::update(clients::table.find(client_id))
            .set(&db_updates)
            .get_result::<DbClient>(&mut conn)?;

        Client::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_client(&self, client_id: i32) -> RepositoryResult<()> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        diesel::delete(clients::table.find(client_id)).execute(&mut conn)?;
        Ok(())
    }
}

impl ReminderReader for DieselRepository {
    fn list_reminders(
        &self,
        query: ReminderListQuery,
    ) -> RepositoryResult<Vec<(Reminder, Client)>> {
        use crate::schema::{clients, reminders};

        let mut conn = self.conn()?;

        let mut items = reminders::table
            .inner_join(clients::table)
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(client_id) = query.client_id {
            items = items.filter(reminders::client_id.eq(client_id));
        }
        if let Some(status) = &query.status {
            items = items.filter(reminders::status.eq(status.to_string()));
        }
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let rows = items
            .order((reminders::due_date.asc(), reminders::id.asc()))
            .load::<(DbReminder, DbClient)>(&mut conn)?;

        rows.into_iter()
            .map(|(db_reminder, db_client)| {
                let reminder = Reminder::try_from(db_reminder).map_err(RepositoryError::from)?;
                let client = Client::try_from(db_client).map_err(RepositoryError::from)?;
                Ok((reminder, client))
            })
            .collect()
    }
}

impl ReminderWriter for DieselRepository {
    fn create_reminder(&self, reminder: &NewReminder) -> RepositoryResult<Reminder> {
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let db_reminder: DbNewReminder = reminder.into();

        let created = diesel::insert_into(reminders::table)
            .values(&db_reminder)
            .get_result::<DbReminder>(&mut conn)?;

        Reminder::try_from(created).map_err(RepositoryError::from)
    }

    fn complete_reminder(&self, reminder_id: i32) -> RepositoryResult<Reminder> {
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let updated = diesel::update(reminders::table.find(reminder_id))
            .set(reminders::status.eq(ReminderStatus::Completed.to_string()))
            .get_result::<DbReminder>(&mut conn)?;

        Reminder::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_reminder(&self, reminder_id: i32) -> RepositoryResult<()> {
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        diesel::delete(reminders::table.find(reminder_id)).execute(&mut conn)?;
        Ok(())
    }
}

//! Store operations for harvest savings plans, instalments and lucky draws.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::client::Client;
use crate::domain::harvest::{
    GROUP_CAPACITY, HarvestPlan, LuckyDraw, NewHarvestPlan, NewLuckyDraw, PLAN_MONTHS, Payment,
    PaymentStatus, PlanStatus, UpdateHarvestPlan, month_labels,
};
use crate::domain::transaction::PaymentMethod;
use crate::models::client::Client as DbClient;
use crate::models::harvest::{
    HarvestPlan as DbHarvestPlan, LuckyDraw as DbLuckyDraw, NewHarvestPlan as DbNewHarvestPlan,
    NewLuckyDraw as DbNewLuckyDraw, NewPayment as DbNewPayment, Payment as DbPayment,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, HarvestReader, HarvestWriter};

impl HarvestReader for DieselRepository {
    fn get_plan_by_id(&self, id: i32) -> RepositoryResult<Option<HarvestPlan>> {
        use crate::schema::harvest_plans;

        let mut conn = self.conn()?;
        let db_plan = harvest_plans::table
            .find(id)
            .first::<DbHarvestPlan>(&mut conn)
            .optional()?;

        match db_plan {
            Some(db_plan) => Ok(Some(
                HarvestPlan::try_from(db_plan).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_plans(&self) -> RepositoryResult<Vec<(HarvestPlan, Client)>> {
        use crate::schema::{clients, harvest_plans};

        let mut conn = self.conn()?;
        let rows = harvest_plans::table
            .inner_join(clients::table)
            .order((
                harvest_plans::group_no.asc(),
                harvest_plans::registration_no.asc(),
            ))
            .load::<(DbHarvestPlan, DbClient)>(&mut conn)?;

        rows.into_iter()
            .map(|(db_plan, db_client)| {
                let plan = HarvestPlan::try_from(db_plan).map_err(RepositoryError::from)?;
                let client = Client::try_from(db_client).map_err(RepositoryError::from)?;
                Ok((plan, client))
            })
            .collect()
    }

    fn list_group_plans(&self, group_no: i32) -> RepositoryResult<Vec<HarvestPlan>> {
        use crate::schema::harvest_plans;

        let mut conn = self.conn()?;
        harvest_plans::table
            .filter(harvest_plans::group_no.eq(group_no))
            .order(harvest_plans::registration_no.asc())
            .load::<DbHarvestPlan>(&mut conn)?
            .into_iter()
            .map(|db_plan| HarvestPlan::try_from(db_plan).map_err(RepositoryError::from))
            .collect()
    }

    fn list_payments(&self, plan_id: i32) -> RepositoryResult<Vec<Payment>> {
        use crate::schema::harvest_payments;

        let mut conn = self.conn()?;
        harvest_payments::table
            .filter(harvest_payments::plan_id.eq(plan_id))
            .order(harvest_payments::seq.asc())
            .load::<DbPayment>(&mut conn)?
            .into_iter()
            .map(|db_payment| Payment::try_from(db_payment).map_err(RepositoryError::from))
            .collect()
    }

    fn list_draws(&self, group_no: Option<i32>) -> RepositoryResult<Vec<LuckyDraw>> {
        use crate::schema::lucky_draws;

        let mut conn = self.conn()?;

        let mut items = lucky_draws::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(group_no) = group_no {
            items = items.filter(lucky_draws::group_no.eq(group_no));
        }

        let draws = items
            .order(lucky_draws::drawn_at.desc())
            .load::<DbLuckyDraw>(&mut conn)?
            .into_iter()
            .map(LuckyDraw::from)
            .collect();

        Ok(draws)
    }
}

impl HarvestWriter for DieselRepository {
    fn create_plan(&self, new_plan: &NewHarvestPlan) -> RepositoryResult<HarvestPlan> {
        use crate::schema::{harvest_payments, harvest_plans};

        let mut conn = self.conn()?;

        let created = conn.transaction::<DbHarvestPlan, RepositoryError, _>(move |conn| {
            let taken = harvest_plans::table
                .filter(harvest_plans::group_no.eq(new_plan.group_no))
                .select(harvest_plans::registration_no)
                .load::<i32>(conn)?
                .into_iter()
                .collect::<HashSet<i32>>();

            let registration_no = (1..=GROUP_CAPACITY)
                .find(|no| !taken.contains(no))
                .ok_or_else(|| {
                    RepositoryError::ConstraintViolation(format!(
                        "No free registration numbers left in group {}",
                        new_plan.group_no
                    ))
                })?;

            let db_new_plan = DbNewHarvestPlan::new(new_plan, registration_no);
            let created = diesel::insert_into(harvest_plans::table)
                .values(&db_new_plan)
                .get_result::<DbHarvestPlan>(conn)?;

            let labels = month_labels(new_plan.start_date);
            let slots = labels
                .iter()
                .enumerate()
                .map(|(seq, label)| DbNewPayment {
                    plan_id: created.id,
                    seq: seq as i32,
                    month_label: label,
                    amount: new_plan.monthly_amount,
                })
                .collect::<Vec<_>>();

            diesel::insert_into(harvest_payments::table)
                .values(&slots)
                .execute(conn)?;

            Ok(created)
        })?;

        HarvestPlan::try_from(created).map_err(RepositoryError::from)
    }

    fn update_plan(
        &self,
        plan_id: i32,
        updates: &UpdateHarvestPlan,
    ) -> RepositoryResult<HarvestPlan> {
        use crate::schema::{harvest_payments, harvest_plans};

        let mut conn = self.conn()?;
        let updates = *updates;

        let updated = conn.transaction::<DbHarvestPlan, diesel::result::Error, _>(move |conn| {
            let updated = diesel::update(harvest_plans::table.find(plan_id))
                .set((
                    harvest_plans::plan_type.eq(updates.plan_type.to_string()),
                    harvest_plans::monthly_amount.eq(updates.monthly_amount),
                    harvest_plans::updated_at.eq(Utc::now().naive_utc()),
                ))
                .get_result::<DbHarvestPlan>(conn)?;

            diesel::update(
                harvest_payments::table
                    .filter(harvest_payments::plan_id.eq(plan_id))
                    .filter(harvest_payments::status.eq(PaymentStatus::Pending.to_string())),
            )
            .set(harvest_payments::amount.eq(updates.monthly_amount))
            .execute(conn)?;

            Ok(updated)
        })?;

        HarvestPlan::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_plan(&self, plan_id: i32) -> RepositoryResult<()> {
        use crate::schema::harvest_plans;

        let mut conn = self.conn()?;
        diesel::delete(harvest_plans::table.find(plan_id)).execute(&mut conn)?;
        Ok(())
    }

    fn mark_payment_paid(
        &self,
        plan_id: i32,
        seq: i32,
        paid_date: NaiveDate,
        method: PaymentMethod,
    ) -> RepositoryResult<Payment> {
        use crate::schema::{harvest_payments, harvest_plans};

        let mut conn = self.conn()?;

        let paid = conn.transaction::<DbPayment, diesel::result::Error, _>(move |conn| {
            let paid = diesel::update(
                harvest_payments::table
                    .filter(harvest_payments::plan_id.eq(plan_id))
                    .filter(harvest_payments::seq.eq(seq)),
            )
            .set((
                harvest_payments::status.eq(PaymentStatus::Paid.to_string()),
                harvest_payments::paid_date.eq(Some(paid_date)),
                harvest_payments::method.eq(Some(method.to_string())),
            ))
            .get_result::<DbPayment>(conn)?;

            let paid_count = harvest_payments::table
                .filter(harvest_payments::plan_id.eq(plan_id))
                .filter(harvest_payments::status.eq(PaymentStatus::Paid.to_string()))
                .count()
                .get_result::<i64>(conn)?;

            if paid_count == PLAN_MONTHS as i64 {
                diesel::update(
                    harvest_plans::table
                        .find(plan_id)
                        .filter(harvest_plans::status.eq(PlanStatus::Active.to_string())),
                )
                .set((
                    harvest_plans::status.eq(PlanStatus::Completed.to_string()),
                    harvest_plans::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            }

            Ok(paid)
        })?;

        Payment::try_from(paid).map_err(RepositoryError::from)
    }

    fn set_plan_status(&self, plan_id: i32, status: PlanStatus) -> RepositoryResult<HarvestPlan> {
        use crate::schema::harvest_plans;

        let mut conn = self.conn()?;
        let updated = diesel::update(harvest_plans::table.find(plan_id))
            .set((
                harvest_plans::status.eq(status.to_string()),
                harvest_plans::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbHarvestPlan>(&mut conn)?;

        HarvestPlan::try_from(updated).map_err(RepositoryError::from)
    }

    fn record_draw(&self, draw: &NewLuckyDraw) -> RepositoryResult<LuckyDraw> {
        use crate::schema::lucky_draws;

        let mut conn = self.conn()?;
        let db_draw: DbNewLuckyDraw = draw.into();

        let recorded = diesel::insert_into(lucky_draws::table)
            .values(&db_draw)
            .get_result::<DbLuckyDraw>(&mut conn)?;

        Ok(LuckyDraw::from(recorded))
    }
}

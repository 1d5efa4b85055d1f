//! Services for the harvest savings program and its lucky draw.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use validator::Validate;

use crate::domain::harvest::{
    GROUP_CAPACITY, HarvestPlan, NewHarvestPlan, NewLuckyDraw, PlanStatus, UpdateHarvestPlan,
    plan_progress,
};
use crate::dto::harvest::{DrawOutcome, HarvestPageData, PlanPageData};
use crate::dto::main::HarvestStats;
use crate::forms::harvest::{AddPlanForm, PayInstalmentPayload, RedeemPlanForm, SavePlanForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;
use crate::repository::{ClientReader, HarvestReader, HarvestWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Folds plans into the counters shown on the harvest header and the
/// dashboard. Redeemed plans drop out of both buckets.
pub(crate) fn harvest_stats<'a, I>(plans: I) -> HarvestStats
where
    I: IntoIterator<Item = &'a HarvestPlan>,
{
    plans
        .into_iter()
        .fold(HarvestStats::default(), |mut acc, plan| {
            match plan.status {
                PlanStatus::Active => {
                    acc.active += 1;
                    acc.monthly_due += plan.monthly_amount;
                }
                PlanStatus::Completed => acc.completed += 1,
                PlanStatus::Redeemed | PlanStatus::EarlyRedeemed => {}
            }
            acc
        })
}

/// Loads the harvest screen: every plan with its holder, the group counters
/// and the draw history.
pub fn load_harvest_page<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<HarvestPageData>
where
    R: HarvestReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let plans = repo.list_plans().map_err(|err| {
        log::error!("Failed to list harvest plans: {err}");
        err
    })?;
    let stats = harvest_stats(plans.iter().map(|(plan, _)| plan));

    let draws = repo.list_draws(None).map_err(|err| {
        log::error!("Failed to list lucky draws: {err}");
        err
    })?;

    Ok(HarvestPageData {
        plans,
        stats,
        draws,
    })
}

/// Loads one plan's detail screen with its instalment schedule.
pub fn load_plan_page<R>(
    user: &AuthenticatedUser,
    repo: &R,
    plan_id: i32,
) -> ServiceResult<PlanPageData>
where
    R: HarvestReader + ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let plan = repo
        .get_plan_by_id(plan_id)
        .map_err(|err| {
            log::error!("Failed to load plan {plan_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let client = repo
        .get_client_by_id(plan.client_id)
        .map_err(|err| {
            log::error!("Failed to load client {}: {err}", plan.client_id);
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let payments = repo.list_payments(plan_id).map_err(|err| {
        log::error!("Failed to load payments for plan {plan_id}: {err}");
        err
    })?;
    let progress = plan_progress(plan.monthly_amount, &payments);

    Ok(PlanPageData {
        plan,
        client,
        payments,
        progress,
    })
}

/// Validates the form and enrols a client into a group. The repository
/// assigns the lowest free registration number.
pub fn create_plan<R>(user: &AuthenticatedUser, repo: &R, form: AddPlanForm) -> ServiceResult<()>
where
    R: ClientReader + HarvestWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the plan details".to_string()));
    }

    let new_plan = NewHarvestPlan::try_from(&form)?;

    repo.get_client_by_id(new_plan.client_id)
        .map_err(|err| {
            log::error!("Failed to load client {}: {err}", new_plan.client_id);
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    repo.create_plan(&new_plan).map_err(|err| {
        log::error!("Failed to create harvest plan: {err}");
        match err {
            RepositoryError::ConstraintViolation(_) => ServiceError::Form(format!(
                "Group {} is full; enrol into another group",
                new_plan.group_no
            )),
            other => other.into(),
        }
    })?;

    Ok(())
}

/// Updates a plan's type and monthly amount.
pub fn save_plan<R>(user: &AuthenticatedUser, repo: &R, form: SavePlanForm) -> ServiceResult<()>
where
    R: HarvestWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the plan details".to_string()));
    }

    let updates = UpdateHarvestPlan::try_from(&form)?;

    repo.update_plan(form.id, &updates).map_err(|err| {
        log::error!("Failed to save plan {}: {err}", form.id);
        err
    })?;

    Ok(())
}

/// Removes a plan together with its instalment schedule.
pub fn delete_plan<R>(user: &AuthenticatedUser, repo: &R, plan_id: i32) -> ServiceResult<()>
where
    R: HarvestWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_plan(plan_id).map_err(|err| {
        log::error!("Failed to delete plan {plan_id}: {err}");
        err
    })?;

    Ok(())
}

/// Stamps an instalment slot as paid. The repository flips the plan to
/// completed when the last slot fills.
pub fn pay_instalment<R>(
    user: &AuthenticatedUser,
    repo: &R,
    payload: PayInstalmentPayload,
) -> ServiceResult<()>
where
    R: HarvestWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let paid_date = payload.paid_date.unwrap_or_else(|| Utc::now().date_naive());

    repo.mark_payment_paid(payload.plan_id, payload.seq, paid_date, payload.method)
        .map_err(|err| {
            log::error!(
                "Failed to mark instalment {} of plan {} paid: {err}",
                payload.seq,
                payload.plan_id
            );
            err
        })?;

    Ok(())
}

/// Moves a plan along its redemption track, refusing jumps the status
/// machine does not allow.
pub fn redeem_plan<R>(user: &AuthenticatedUser, repo: &R, form: RedeemPlanForm) -> ServiceResult<()>
where
    R: HarvestReader + HarvestWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let target = form.target_status()?;

    let plan = repo
        .get_plan_by_id(form.id)
        .map_err(|err| {
            log::error!("Failed to load plan {}: {err}", form.id);
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    if !plan.status.can_transition_to(target) {
        return Err(ServiceError::Form(format!(
            "A {} plan cannot move to {}",
            plan.status, target
        )));
    }

    repo.set_plan_status(form.id, target).map_err(|err| {
        log::error!("Failed to redeem plan {}: {err}", form.id);
        err
    })?;

    Ok(())
}

/// Derives the winning registration number for a recorded seed. Anyone
/// holding the seed can replay the draw and land on the same number.
pub(crate) fn draw_winner(seed: i64) -> i32 {
    StdRng::seed_from_u64(seed as u64).random_range(1..=GROUP_CAPACITY)
}

/// Runs the lucky draw for a group. The seed, the winning number and the
/// matched plan are recorded before the outcome is handed back, so every
/// announced winner has a stored, replayable draw behind it.
pub fn run_draw<R>(user: &AuthenticatedUser, repo: &R, group_no: i32) -> ServiceResult<DrawOutcome>
where
    R: HarvestReader + HarvestWriter + ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let plans = repo.list_group_plans(group_no).map_err(|err| {
        log::error!("Failed to list plans in group {group_no}: {err}");
        err
    })?;
    if plans.is_empty() {
        return Err(ServiceError::Form(format!(
            "Group {group_no} has no registered plans to draw from"
        )));
    }

    let seed: i64 = rand::rng().random();
    let winner_no = draw_winner(seed);
    let matched = plans.iter().find(|plan| plan.registration_no == winner_no);

    let draw = repo
        .record_draw(&NewLuckyDraw {
            group_no,
            seed,
            winner_no,
            plan_id: matched.map(|plan| plan.id),
        })
        .map_err(|err| {
            log::error!("Failed to record lucky draw for group {group_no}: {err}");
            err
        })?;

    let winner = match matched {
        Some(plan) => {
            let client = repo
                .get_client_by_id(plan.client_id)
                .map_err(|err| {
                    log::error!("Failed to load client {}: {err}", plan.client_id);
                    err
                })?
                .ok_or(ServiceError::NotFound)?;
            Some((plan.clone(), client))
        }
        None => None,
    };

    Ok(DrawOutcome { draw, winner })
}

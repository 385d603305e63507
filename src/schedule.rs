//! Daily trigger for resident mode.
//!
//! The collector itself only knows how to run once; this module decides
//! when. Times are UTC. A failed run is logged and the loop waits for the
//! next slot.

use crate::config::ScheduleConfig;
use crate::error::Result;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::future::Future;
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// The first occurrence of `at` strictly after `now`.
pub fn next_fire_after(at: NaiveTime, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Whether today's slot has already passed at `now`.
pub fn missed_today(at: NaiveTime, now: DateTime<Utc>) -> bool {
    now.date_naive().and_time(at).and_utc() <= now
}

/// Run `job` every day at `schedule.at`. Never returns unless the schedule
/// itself is invalid.
///
/// With `catch_up` set, a slot already passed today is run immediately on
/// startup; older slots are never replayed.
#[instrument(level = "info", skip_all, fields(at = %schedule.at, catch_up = schedule.catch_up))]
pub async fn run_daily<F, Fut>(schedule: &ScheduleConfig, mut job: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let at = schedule.time_of_day()?;

    if schedule.catch_up && missed_today(at, Utc::now()) {
        info!("Catching up on today's missed run");
        trigger(&mut job).await;
    }

    loop {
        let now = Utc::now();
        let next = next_fire_after(at, now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(%next, wait_secs = wait.as_secs(), "Waiting for next scheduled run");
        sleep(wait).await;
        trigger(&mut job).await;
    }
}

async fn trigger<F, Fut>(job: &mut F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match job().await {
        Ok(()) => info!("Scheduled run succeeded"),
        Err(e) => error!(error = %e, "Scheduled run failed"),
    }
}

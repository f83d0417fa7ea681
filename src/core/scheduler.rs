//! Background loop that drives the hourly "what did you do" prompts.

use crate::core::context::BotContext;
use crate::core::machine::{CONTINUE_OLD_LOG, CREATE_NEW_LOG, prompt_for_gap};
use crate::errors::AppResult;
use crate::models::log_record::last_record;
use crate::models::{Choice, ConversationState, Notification};
use crate::utils::time::clock_label;
use std::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct Scheduler {
    ctx: BotContext,
}

impl Scheduler {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    /// Mark the workday as started now. Returns `false` when a workday was
    /// already started today, in which case nothing is written.
    pub fn begin_workday(&self) -> AppResult<bool> {
        let now = self.ctx.clock.now();
        let settings = self.ctx.settings.get()?;
        if settings.workday_started_on(now.date_naive()) {
            return Ok(false);
        }

        self.ctx.settings.update(&mut |s| s.work_started = Some(now))?;
        Ok(true)
    }

    /// One prompt cycle: open a new accounting window ending now and ask the
    /// owner to fill it.
    pub fn tick(&self) -> AppResult<()> {
        let now = self.ctx.clock.now();
        let settings = self.ctx.settings.update(&mut |s| {
            s.current_state = ConversationState::SelectLogType;
            s.need_work_log_to = Some(now);
        })?;
        let chat_id = settings.user_id;

        let records = self.ctx.workday_records(&settings)?;
        match last_record(&records) {
            None => {
                let settings = self.ctx.set_state(ConversationState::SelectNewLogMessage)?;
                let from = settings.work_started.unwrap_or(now);
                self.ctx.say(chat_id, prompt_for_gap(&from, &now));
            }
            Some(last) => {
                self.ctx.notify(Notification::with_choices(
                    chat_id,
                    format!(
                        "Are you still working on \"{}\" (started {})?",
                        last.message,
                        clock_label(&last.start_time)
                    ),
                    vec![
                        Choice::new("Yes", CONTINUE_OLD_LOG),
                        Choice::new("No", CREATE_NEW_LOG),
                    ],
                ));
            }
        }

        Ok(())
    }

    /// Drive the ticker until `cancel` fires. The first tick comes one period
    /// after start. The workday must already be marked as started.
    pub async fn run(self, cancel: CancellationToken) {
        if cancel.is_cancelled() {
            return;
        }

        let period = self.ctx.options.tick;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    info!("scheduler tick");
                    if let Err(e) = self.tick() {
                        error!("scheduler tick failed: {e}");
                    }
                }
            }
        }

        info!("scheduler stopped");
    }
}

struct ActiveRun {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owner of the single active scheduler run.
pub struct Workday {
    shutdown: CancellationToken,
    active: Mutex<Option<ActiveRun>>,
}

impl Workday {
    /// Runs are cancelled as well when `shutdown` fires.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            shutdown,
            active: Mutex::new(None),
        }
    }

    /// Mark the workday as started and launch its scheduler run, cancelling
    /// the previous run first. Returns `false` without touching anything when
    /// a workday was already started today.
    pub fn start(&self, ctx: BotContext) -> AppResult<bool> {
        let mut active = self.active.lock()?;

        let scheduler = Scheduler::new(ctx);
        if !scheduler.begin_workday()? {
            info!("workday already started today, scheduler not launched");
            return Ok(false);
        }

        if let Some(old) = active.take() {
            info!("superseding previous scheduler run");
            old.token.cancel();
        }

        let token = self.shutdown.child_token();
        let handle = tokio::spawn(scheduler.run(token.clone()));
        *active = Some(ActiveRun { token, handle });
        info!("workday started");
        Ok(true)
    }

    /// Cancel the active run. Returns `false` when none was running.
    pub fn stop(&self) -> AppResult<bool> {
        let run = self.active.lock()?.take();
        match run {
            Some(run) if !run.handle.is_finished() => {
                run.token.cancel();
                info!("workday ended");
                Ok(true)
            }
            Some(run) => {
                run.token.cancel();
                Ok(false)
            }
            None => Ok(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .map(|a| a.as_ref().is_some_and(|r| !r.handle.is_finished()))
            .unwrap_or(false)
    }
}

//! Conversation state machine.
//!
//! Every inbound event is routed through one `(state, event kind)` table in
//! [`Conversation::handle`]. Callbacks and messages that do not belong to the
//! stored state are dropped without touching either store.

use crate::core::context::BotContext;
use crate::core::report::render_report;
use crate::core::scheduler::Workday;
use crate::errors::{AppError, AppResult};
use crate::models::log_record::last_record;
use crate::models::{
    Choice, Command, ConversationState, EventKind, InboundEvent, LogRecord, Notification,
    UserSettings,
};
use crate::utils::date::{format_date, parse_date};
use crate::utils::time::{
    clock_label, generate_intervals, instant_payload, parse_instant_payload, round_to_minutes,
    same_or_after_second,
};
use chrono::{DateTime, Local, NaiveDate};
use std::sync::Mutex;
use tracing::{debug, info, warn};

pub const CONTINUE_OLD_LOG: &str = "continue_old_log";
pub const CREATE_NEW_LOG: &str = "create_new_log";
pub const STOP_DELETE_LOG: &str = "stop_delete_log";

/// What happened to an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    /// Valid sender, but the event does not fit the current state.
    Ignored,
    /// Sender is not the configured owner.
    Rejected,
}

pub fn prompt_for_gap(from: &DateTime<Local>, to: &DateTime<Local>) -> String {
    format!(
        "What did you work on from {} to {}?",
        clock_label(from),
        clock_label(to)
    )
}

pub struct Conversation {
    ctx: BotContext,
    workday: Workday,
    pending_message: Mutex<Option<String>>,
}

impl Conversation {
    pub fn new(ctx: BotContext, workday: Workday) -> Self {
        Self {
            ctx,
            workday,
            pending_message: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &BotContext {
        &self.ctx
    }

    pub fn pending_message(&self) -> Option<String> {
        self.pending_message.lock().ok().and_then(|p| p.clone())
    }

    pub fn handle(&self, event: InboundEvent) -> AppResult<Outcome> {
        let settings = self.ctx.settings.get()?;
        if event.chat_id != settings.user_id {
            warn!(chat_id = event.chat_id, "dropping event from non-owner chat");
            return Ok(Outcome::Rejected);
        }

        use crate::models::ConversationState as S;
        use crate::models::EventKind as E;

        let chat_id = event.chat_id;
        let state = settings.current_state;

        match (state, event.kind) {
            (_, E::Command(cmd)) => self.on_command(chat_id, cmd),

            (S::SelectLogType, E::Callback(p)) => self.on_log_type(chat_id, &p),
            (S::SelectOldLogDate, E::Callback(p)) => self.on_old_log_date(chat_id, &p),
            (S::SelectNewLogDate, E::Callback(p)) => self.on_new_log_date(chat_id, &p),
            (S::SelectLogDateForReport, E::Callback(p)) => self.on_report_date(chat_id, &p),
            (S::SelectLogsToDelete, E::Callback(p)) => self.on_delete_choice(chat_id, &p),
            (S::SelectNewLogMessage, E::Text(body)) => self.on_log_message(chat_id, &body),

            (S::Idle | S::SelectNewLogMessage, kind @ E::Callback(_))
            | (
                S::Idle
                | S::SelectLogType
                | S::SelectOldLogDate
                | S::SelectNewLogDate
                | S::SelectLogDateForReport
                | S::SelectLogsToDelete,
                kind @ E::Text(_),
            ) => {
                debug!(?state, kind = kind.label(), "event does not match state, ignored");
                Ok(Outcome::Ignored)
            }
        }
    }

    // ---------------------------
    // Commands
    // ---------------------------

    fn on_command(&self, chat_id: i64, cmd: Command) -> AppResult<Outcome> {
        info!(command = cmd.name(), "command received");
        match cmd {
            Command::StartWorkday => self.start_workday(chat_id),
            Command::EndWorkday => {
                let body = if self.workday.stop()? {
                    "Workday finished."
                } else {
                    "No workday is running."
                };
                self.ctx.say(chat_id, body);
                Ok(Outcome::Handled)
            }
            Command::GetTodayLogs => {
                let today = self.ctx.clock.today();
                let records = self.ctx.logs.list_by_date(today)?;
                match render_report(&format_date(&today), &records) {
                    Some(report) => self.ctx.say(chat_id, report),
                    None => self.ctx.say(chat_id, "No logs for today."),
                }
                Ok(Outcome::Handled)
            }
            Command::GetAllLogs => {
                let dates = self.ctx.logs.list_dates_with_logs()?;
                if dates.is_empty() {
                    self.ctx.say(chat_id, "No logs yet.");
                    return Ok(Outcome::Handled);
                }

                let choices = dates
                    .iter()
                    .rev()
                    .map(|d| Choice::new(format_date(d), format_date(d)))
                    .collect();

                self.ctx.set_state(ConversationState::SelectLogDateForReport)?;
                self.ctx.notify(Notification::with_choices(
                    chat_id,
                    "Choose a date:",
                    choices,
                ));
                Ok(Outcome::Handled)
            }
            Command::DeleteLogs => {
                let dates = self.ctx.logs.list_dates_with_logs()?;
                if dates.is_empty() {
                    self.ctx.say(chat_id, "No logs to delete.");
                    return Ok(Outcome::Handled);
                }

                self.ctx.set_state(ConversationState::SelectLogsToDelete)?;
                self.send_delete_prompt(chat_id, dates.iter().rev().copied().collect());
                Ok(Outcome::Handled)
            }
        }
    }

    fn start_workday(&self, chat_id: i64) -> AppResult<Outcome> {
        if self.workday.start(self.ctx.clone())? {
            self.ctx.say(chat_id, "Workday started.");
            return Ok(Outcome::Handled);
        }

        let since = self
            .ctx
            .settings
            .get()?
            .work_started
            .map(|t| clock_label(&t))
            .unwrap_or_default();
        self.ctx
            .say(chat_id, format!("Workday already started today at {since}."));
        Ok(Outcome::Handled)
    }

    fn send_delete_prompt(&self, chat_id: i64, newest_first: Vec<NaiveDate>) {
        let mut choices: Vec<Choice> = newest_first
            .iter()
            .take(self.ctx.options.delete_choices_limit)
            .map(|d| Choice::new(format_date(d), format_date(d)))
            .collect();
        choices.push(Choice::new("Finish", STOP_DELETE_LOG));

        self.ctx.notify(Notification::with_choices(
            chat_id,
            "Choose a date to delete:",
            choices,
        ));
    }

    // ---------------------------
    // Logging dialogue
    // ---------------------------

    fn on_log_type(&self, chat_id: i64, payload: &str) -> AppResult<Outcome> {
        match payload {
            CONTINUE_OLD_LOG => self.continue_old_log(chat_id),
            CREATE_NEW_LOG => {
                let settings = self.ctx.set_state(ConversationState::SelectNewLogMessage)?;
                let records = self.ctx.workday_records(&settings)?;
                let (from, to) = self.open_window(&settings, &records)?;
                self.ctx.say(chat_id, prompt_for_gap(&from, &to));
                Ok(Outcome::Handled)
            }
            other => Err(AppError::UnexpectedPayload(other.to_string())),
        }
    }

    fn continue_old_log(&self, chat_id: i64) -> AppResult<Outcome> {
        let settings = self.ctx.settings.get()?;
        let need = need_work_log_to(&settings)?;
        let records = self.ctx.workday_records(&settings)?;

        let Some(last) = last_record(&records) else {
            // nothing to continue
            let settings = self.ctx.set_state(ConversationState::SelectNewLogMessage)?;
            let (from, to) = self.open_window(&settings, &records)?;
            self.ctx.say(chat_id, prompt_for_gap(&from, &to));
            return Ok(Outcome::Handled);
        };

        let from = round_to_minutes(last.end_time, self.ctx.options.round_minutes)?;
        let choices = self.checkpoint_choices(from, need);

        self.ctx.set_state(ConversationState::SelectOldLogDate)?;
        self.ctx.notify(Notification::with_choices(
            chat_id,
            format!("Until when did you work on \"{}\"?", last.message),
            choices,
        ));
        Ok(Outcome::Handled)
    }

    fn on_log_message(&self, chat_id: i64, body: &str) -> AppResult<Outcome> {
        let message = body.trim();
        if message.is_empty() {
            self.ctx.say(chat_id, "Please describe what you worked on.");
            return Ok(Outcome::Handled);
        }

        let settings = self.ctx.settings.get()?;
        let records = self.ctx.workday_records(&settings)?;
        let (from, need) = self.open_window(&settings, &records)?;
        let choices = self.checkpoint_choices(from, need);

        *self.pending_message.lock()? = Some(message.to_string());

        self.ctx.set_state(ConversationState::SelectNewLogDate)?;
        self.ctx.notify(Notification::with_choices(
            chat_id,
            format!("When did you finish \"{message}\"?"),
            choices,
        ));
        Ok(Outcome::Handled)
    }

    fn on_old_log_date(&self, chat_id: i64, payload: &str) -> AppResult<Outcome> {
        let chosen = parse_instant_payload(payload)?;
        let settings = self.ctx.settings.get()?;
        let need = need_work_log_to(&settings)?;
        let records = self.ctx.workday_records(&settings)?;

        let last = last_record(&records)
            .ok_or_else(|| AppError::InvalidState("no record to continue".into()))?;
        if chosen < last.start_time {
            self.ctx.say(chat_id, "That time is before the task started.");
            return Ok(Outcome::Handled);
        }

        let mut extended = last.clone();
        extended.end_time = chosen;
        if !self.ctx.logs.update_end_time(&extended)? {
            warn!(id = %extended.id, "record to extend not found in its start-date bucket");
        }

        self.after_interval_stored(chat_id, &chosen, &need)
    }

    fn on_new_log_date(&self, chat_id: i64, payload: &str) -> AppResult<Outcome> {
        let chosen = parse_instant_payload(payload)?;
        let settings = self.ctx.settings.get()?;
        let need = need_work_log_to(&settings)?;
        let records = self.ctx.workday_records(&settings)?;
        let (start, _) = self.open_window(&settings, &records)?;

        let Some(message) = self.pending_message() else {
            // description lost (e.g. restart mid-dialogue): ask for it again
            warn!("no pending log message, asking for the description again");
            self.ctx.set_state(ConversationState::SelectNewLogMessage)?;
            self.ctx.say(chat_id, prompt_for_gap(&start, &need));
            return Ok(Outcome::Handled);
        };

        if chosen < start {
            self.ctx.say(chat_id, "That time is before the interval started.");
            return Ok(Outcome::Handled);
        }

        let record = LogRecord::new(start, chosen, &message);
        self.ctx.logs.insert(chosen.date_naive(), &record)?;
        *self.pending_message.lock()? = None;
        info!(id = %record.id, "log record stored");

        self.after_interval_stored(chat_id, &chosen, &need)
    }

    /// Either close the dialogue or ask about the rest of the window.
    fn after_interval_stored(
        &self,
        chat_id: i64,
        reached: &DateTime<Local>,
        need: &DateTime<Local>,
    ) -> AppResult<Outcome> {
        if same_or_after_second(reached, need) {
            self.ctx.set_state(ConversationState::Idle)?;
            self.ctx
                .say(chat_id, format!("Logged until {}.", clock_label(reached)));
        } else {
            self.ctx.set_state(ConversationState::SelectNewLogMessage)?;
            self.ctx.say(chat_id, prompt_for_gap(reached, need));
        }
        Ok(Outcome::Handled)
    }

    // ---------------------------
    // Reports and deletion
    // ---------------------------

    fn on_report_date(&self, chat_id: i64, payload: &str) -> AppResult<Outcome> {
        let date = parse_date(payload).ok_or_else(|| AppError::InvalidDate(payload.to_string()))?;
        let records = self.ctx.logs.list_by_date(date)?;

        self.ctx.set_state(ConversationState::Idle)?;
        match render_report(&format_date(&date), &records) {
            Some(report) => self.ctx.say(chat_id, report),
            None => self.ctx.say(chat_id, format!("No logs for {}.", format_date(&date))),
        }
        Ok(Outcome::Handled)
    }

    fn on_delete_choice(&self, chat_id: i64, payload: &str) -> AppResult<Outcome> {
        if payload == STOP_DELETE_LOG {
            self.ctx.set_state(ConversationState::Idle)?;
            self.ctx.say(chat_id, "Done.");
            return Ok(Outcome::Handled);
        }

        let date = parse_date(payload).ok_or_else(|| AppError::InvalidDate(payload.to_string()))?;
        if self.ctx.logs.delete_by_date(date)? {
            info!(date = %date, "logs deleted");
            self.ctx
                .say(chat_id, format!("Deleted logs for {}.", format_date(&date)));
        }

        let remaining = self.ctx.logs.list_dates_with_logs()?;
        self.send_delete_prompt(chat_id, remaining.iter().rev().copied().collect());
        Ok(Outcome::Handled)
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    /// Start and end of the window still to be accounted for: from the latest
    /// record's end (or the workday start) to `need_work_log_to`.
    fn open_window(
        &self,
        settings: &UserSettings,
        records: &[LogRecord],
    ) -> AppResult<(DateTime<Local>, DateTime<Local>)> {
        let need = need_work_log_to(settings)?;
        let from = match last_record(records) {
            Some(last) => last.end_time,
            None => settings.work_started.unwrap_or(need),
        };
        Ok((from, need))
    }

    /// Checkpoints from `from` to `need`, always ending on `need`.
    fn checkpoint_choices(&self, from: DateTime<Local>, need: DateTime<Local>) -> Vec<Choice> {
        let mut points = generate_intervals(from, need, self.ctx.options.checkpoint_step);
        let ends_on_need = points
            .last()
            .is_some_and(|p| p.timestamp() == need.timestamp());
        if !ends_on_need {
            points.push(need);
        }

        points
            .iter()
            .map(|p| Choice::new(clock_label(p), instant_payload(p)))
            .collect()
    }
}

fn need_work_log_to(settings: &UserSettings) -> AppResult<DateTime<Local>> {
    settings
        .need_work_log_to
        .ok_or_else(|| AppError::InvalidState("no accounting window is open".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::context::BotOptions;
    use crate::core::scheduler::Scheduler;
    use crate::storage::{StorageKind, Stores};
    use crate::transport::MemoryNotifier;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;

    const OWNER: i64 = 4242;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 10, h, m, 0).unwrap()
    }

    struct Harness {
        _dir: TempDir,
        conv: Conversation,
        notifier: Arc<MemoryNotifier>,
        clock: Arc<ManualClock>,
    }

    impl Harness {
        fn new(kind: StorageKind) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let stores = Stores::open(kind, dir.path()).unwrap();
            stores.settings.ensure_owner(OWNER).unwrap();
            let notifier = Arc::new(MemoryNotifier::new());
            let clock = Arc::new(ManualClock::new(at(9, 0)));
            let ctx = BotContext::new(stores, notifier.clone(), clock.clone(), BotOptions::default());
            let conv = Conversation::new(ctx, Workday::new(CancellationToken::new()));
            Self {
                _dir: dir,
                conv,
                notifier,
                clock,
            }
        }

        fn ctx(&self) -> &BotContext {
            self.conv.context()
        }

        fn state(&self) -> ConversationState {
            self.ctx().settings.get().unwrap().current_state
        }

        /// Start the workday at the current clock and tick at `h:m`.
        fn tick_at(&self, h: u32, m: u32) {
            let scheduler = Scheduler::new(self.ctx().clone());
            scheduler.begin_workday().unwrap();
            self.clock.set(at(h, m));
            scheduler.tick().unwrap();
        }

        fn text(&self, body: &str) -> Outcome {
            self.conv.handle(InboundEvent::text(OWNER, body)).unwrap()
        }

        fn pick(&self, payload: &str) -> Outcome {
            self.conv.handle(InboundEvent::callback(OWNER, payload)).unwrap()
        }

        fn command(&self, cmd: Command) -> Outcome {
            self.conv.handle(InboundEvent::command(OWNER, cmd)).unwrap()
        }

        fn last(&self) -> Notification {
            self.notifier.last().unwrap()
        }

        fn labels(&self) -> Vec<String> {
            self.last().choices.into_iter().map(|c| c.label).collect()
        }

        fn records(&self) -> Vec<LogRecord> {
            self.ctx().logs.list_by_date(at(0, 0).date_naive()).unwrap()
        }
    }

    #[test]
    fn first_hour_is_logged_as_one_record() {
        let h = Harness::new(StorageKind::Json);
        h.tick_at(10, 0);
        assert_eq!(h.state(), ConversationState::SelectNewLogMessage);

        assert_eq!(h.text("design review"), Outcome::Handled);
        assert_eq!(h.state(), ConversationState::SelectNewLogDate);
        assert_eq!(h.conv.pending_message().as_deref(), Some("design review"));
        assert_eq!(
            h.labels(),
            vec!["09:00", "09:10", "09:20", "09:30", "09:40", "09:50", "10:00"]
        );

        assert_eq!(h.pick(&instant_payload(&at(10, 0))), Outcome::Handled);

        let records = h.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_time, at(9, 0));
        assert_eq!(records[0].end_time, at(10, 0));
        assert_eq!(records[0].message, "design review");
        assert_eq!(h.state(), ConversationState::Idle);
        assert!(h.conv.pending_message().is_none());
    }

    #[test]
    fn partial_answer_asks_for_the_rest_of_the_window() {
        let h = Harness::new(StorageKind::Sqlite);
        h.tick_at(10, 0);

        h.text("standup");
        h.pick(&instant_payload(&at(9, 30)));
        assert_eq!(h.state(), ConversationState::SelectNewLogMessage);
        assert!(h.last().body.contains("09:30"));

        h.text("mail");
        assert_eq!(h.labels(), vec!["09:30", "09:40", "09:50", "10:00"]);
        h.pick(&instant_payload(&at(10, 0)));

        let records = h.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].start_time, at(9, 30));
        assert_eq!(records[1].message, "mail");
        assert_eq!(h.state(), ConversationState::Idle);
    }

    #[test]
    fn window_end_is_offered_even_off_grid() {
        let h = Harness::new(StorageKind::Json);
        h.tick_at(9, 25);

        h.text("triage");
        assert_eq!(h.labels(), vec!["09:00", "09:10", "09:20", "09:25"]);
    }

    #[test]
    fn continue_old_log_extends_latest_record() {
        let h = Harness::new(StorageKind::Json);
        h.ctx()
            .logs
            .insert(
                at(10, 0).date_naive(),
                &LogRecord::new(at(9, 0), at(10, 0), "design review"),
            )
            .unwrap();
        h.tick_at(11, 0);
        assert_eq!(h.state(), ConversationState::SelectLogType);

        h.pick(CONTINUE_OLD_LOG);
        assert_eq!(h.state(), ConversationState::SelectOldLogDate);
        assert_eq!(h.labels().first().map(String::as_str), Some("10:00"));
        assert_eq!(h.labels().last().map(String::as_str), Some("11:00"));

        h.pick(&instant_payload(&at(10, 30)));
        assert_eq!(h.records()[0].end_time, at(10, 30));
        assert_eq!(h.state(), ConversationState::SelectNewLogMessage);
        assert!(h.last().body.contains("10:30"));
        assert!(h.last().body.contains("11:00"));
    }

    #[test]
    fn continue_to_window_end_closes_dialogue() {
        let h = Harness::new(StorageKind::Json);
        h.ctx()
            .logs
            .insert(
                at(10, 0).date_naive(),
                &LogRecord::new(at(9, 0), at(10, 0), "coding"),
            )
            .unwrap();
        h.tick_at(11, 0);

        h.pick(CONTINUE_OLD_LOG);
        h.pick(&instant_payload(&at(11, 0)));

        assert_eq!(h.records()[0].end_time, at(11, 0));
        assert_eq!(h.state(), ConversationState::Idle);
    }

    #[test]
    fn create_new_log_prompts_from_latest_end() {
        let h = Harness::new(StorageKind::Json);
        h.ctx()
            .logs
            .insert(
                at(10, 0).date_naive(),
                &LogRecord::new(at(9, 0), at(10, 0), "coding"),
            )
            .unwrap();
        h.tick_at(11, 0);

        h.pick(CREATE_NEW_LOG);
        assert_eq!(h.state(), ConversationState::SelectNewLogMessage);
        assert_eq!(h.last().body, "What did you work on from 10:00 to 11:00?");
    }

    #[test]
    fn mismatched_events_leave_everything_untouched() {
        let h = Harness::new(StorageKind::Json);
        let before = h.ctx().settings.get().unwrap();

        assert_eq!(h.pick(CONTINUE_OLD_LOG), Outcome::Ignored);
        assert_eq!(h.pick(&instant_payload(&at(10, 0))), Outcome::Ignored);
        assert_eq!(h.text("stray"), Outcome::Ignored);

        assert_eq!(h.ctx().settings.get().unwrap(), before);
        assert!(h.ctx().logs.list_dates_with_logs().unwrap().is_empty());
        assert!(h.notifier.sent().is_empty());
        assert!(h.conv.pending_message().is_none());
    }

    #[test]
    fn text_outside_message_state_is_ignored_mid_dialogue() {
        let h = Harness::new(StorageKind::Json);
        h.tick_at(10, 0);
        h.text("design review");
        let before = h.ctx().settings.get().unwrap();
        h.notifier.clear();

        assert_eq!(h.text("another"), Outcome::Ignored);
        assert_eq!(h.ctx().settings.get().unwrap(), before);
        assert_eq!(h.conv.pending_message().as_deref(), Some("design review"));
    }

    #[test]
    fn events_from_other_chats_are_rejected() {
        let h = Harness::new(StorageKind::Json);
        h.tick_at(10, 0);
        let before = h.ctx().settings.get().unwrap();
        h.notifier.clear();

        let outcome = h
            .conv
            .handle(InboundEvent::text(OWNER + 1, "intruder"))
            .unwrap();

        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(h.ctx().settings.get().unwrap(), before);
        assert!(h.notifier.sent().is_empty());
    }

    #[test]
    fn malformed_instant_keeps_state() {
        let h = Harness::new(StorageKind::Json);
        h.tick_at(10, 0);
        h.text("design review");

        let res = h.conv.handle(InboundEvent::callback(OWNER, "ten o'clock"));
        assert!(matches!(res, Err(AppError::InvalidInstant(_))));
        assert_eq!(h.state(), ConversationState::SelectNewLogDate);
        assert!(h.records().is_empty());
    }

    #[test]
    fn instant_before_window_start_is_refused() {
        let h = Harness::new(StorageKind::Json);
        h.tick_at(10, 0);
        h.text("design review");

        h.pick(&instant_payload(&at(8, 0)));
        assert_eq!(h.state(), ConversationState::SelectNewLogDate);
        assert!(h.records().is_empty());
    }

    #[test]
    fn today_report_and_empty_today() {
        let h = Harness::new(StorageKind::Json);
        h.command(Command::GetTodayLogs);
        assert_eq!(h.last().body, "No logs for today.");

        let day = at(0, 0).date_naive();
        h.ctx()
            .logs
            .insert(day, &LogRecord::new(at(10, 0), at(11, 30), "review"))
            .unwrap();
        h.ctx()
            .logs
            .insert(day, &LogRecord::new(at(8, 0), at(9, 0), "mail"))
            .unwrap();

        h.command(Command::GetTodayLogs);
        assert!(
            h.last()
                .body
                .starts_with("Time report for 2025-06-10 08:00-11:30:")
        );
        assert_eq!(h.state(), ConversationState::Idle);
    }

    #[test]
    fn report_by_date_returns_to_idle() {
        let h = Harness::new(StorageKind::Json);
        h.command(Command::GetAllLogs);
        assert_eq!(h.last().body, "No logs yet.");
        assert_eq!(h.state(), ConversationState::Idle);

        let d = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let start = Local.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap();
        h.ctx()
            .logs
            .insert(d, &LogRecord::new(start, start + chrono::TimeDelta::minutes(45), "ops"))
            .unwrap();

        h.command(Command::GetAllLogs);
        assert_eq!(h.state(), ConversationState::SelectLogDateForReport);
        assert_eq!(h.labels(), vec!["2025-06-01"]);

        h.pick("2025-06-01");
        assert_eq!(h.state(), ConversationState::Idle);
        assert!(h.last().body.contains("Task: ops, Start: 14:00, End: 14:45, Spent:  45m"));
    }

    #[test]
    fn report_for_vanished_date_still_closes_dialogue() {
        let h = Harness::new(StorageKind::Json);
        let d = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        h.ctx().logs.get_or_create_bucket(d).unwrap();
        h.command(Command::GetAllLogs);
        h.ctx().logs.delete_by_date(d).unwrap();

        h.pick("2025-06-02");
        assert_eq!(h.last().body, "No logs for 2025-06-02.");
        assert_eq!(h.state(), ConversationState::Idle);
    }

    #[test]
    fn delete_dialogue_caps_choices_and_refreshes() {
        let h = Harness::new(StorageKind::Sqlite);
        for day in 1..=7 {
            let d = NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
            h.ctx().logs.get_or_create_bucket(d).unwrap();
        }

        h.command(Command::DeleteLogs);
        assert_eq!(h.state(), ConversationState::SelectLogsToDelete);
        assert_eq!(
            h.labels(),
            vec!["2025-06-07", "2025-06-06", "2025-06-05", "2025-06-04", "2025-06-03", "Finish"]
        );

        h.pick("2025-06-07");
        assert_eq!(h.state(), ConversationState::SelectLogsToDelete);
        assert_eq!(h.labels().first().map(String::as_str), Some("2025-06-06"));
        assert_eq!(h.labels().len(), 6);
        assert_eq!(h.ctx().logs.list_dates_with_logs().unwrap().len(), 6);

        h.pick(STOP_DELETE_LOG);
        assert_eq!(h.state(), ConversationState::Idle);
    }

    #[test]
    fn delete_of_unknown_date_changes_nothing() {
        let h = Harness::new(StorageKind::Json);
        let d = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        h.ctx().logs.get_or_create_bucket(d).unwrap();
        h.command(Command::DeleteLogs);

        h.pick("2025-01-01");
        let dates: Vec<_> = h.ctx().logs.list_dates_with_logs().unwrap().into_iter().collect();
        assert_eq!(dates, vec![d]);
        assert_eq!(h.state(), ConversationState::SelectLogsToDelete);
    }

    #[test]
    fn lost_description_is_asked_again() {
        let h = Harness::new(StorageKind::Json);
        h.tick_at(10, 0);
        h.text("design review");

        // same stores, empty in-memory cache
        let restarted = Conversation::new(
            h.ctx().clone(),
            Workday::new(CancellationToken::new()),
        );
        let outcome = restarted
            .handle(InboundEvent::callback(OWNER, instant_payload(&at(10, 0))))
            .unwrap();

        assert_eq!(outcome, Outcome::Handled);
        assert!(h.records().is_empty());
        assert_eq!(h.state(), ConversationState::SelectNewLogMessage);
        assert_eq!(h.last().body, "What did you work on from 09:00 to 10:00?");

        restarted
            .handle(InboundEvent::text(OWNER, "design review"))
            .unwrap();
        restarted
            .handle(InboundEvent::callback(OWNER, instant_payload(&at(10, 0))))
            .unwrap();

        let records = h.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "design review");
        assert_eq!(h.state(), ConversationState::Idle);
    }

    #[tokio::test]
    async fn back_to_back_starts_keep_one_scheduler() {
        let h = Harness::new(StorageKind::Json);

        h.command(Command::StartWorkday);
        h.command(Command::StartWorkday);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let bodies: Vec<_> = h.notifier.sent().into_iter().map(|n| n.body).collect();
        assert_eq!(
            bodies,
            vec!["Workday started.", "Workday already started today at 09:00."]
        );
        assert!(h.conv.workday.is_running());
        assert_eq!(h.ctx().settings.get().unwrap().work_started, Some(at(9, 0)));

        h.command(Command::EndWorkday);
        assert_eq!(h.last().body, "Workday finished.");
    }

    #[tokio::test]
    async fn workday_commands_start_and_stop_scheduler() {
        let h = Harness::new(StorageKind::Json);

        h.command(Command::StartWorkday);
        assert_eq!(h.last().body, "Workday started.");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(h.ctx().settings.get().unwrap().work_started, Some(at(9, 0)));

        h.clock.set(at(9, 30));
        h.command(Command::StartWorkday);
        assert_eq!(h.last().body, "Workday already started today at 09:00.");

        h.command(Command::EndWorkday);
        assert_eq!(h.last().body, "Workday finished.");
        h.command(Command::EndWorkday);
        assert_eq!(h.last().body, "No workday is running.");
    }
}

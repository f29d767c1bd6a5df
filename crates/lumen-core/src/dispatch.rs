//! Dispatch router: total ordering over every inbound message.
//!
//! Precedence, highest first:
//! 1. Safety guard match -- crisis reply, active flow terminated, stop.
//! 2. Recognized command -- handled, discarding any dangling session.
//! 3. Active session -- routed to that flow's advance step.
//! 4. Settings pattern (`lang <code>` / `country <code>`).
//! 5. Bare report window (`7` / `30`) -- aggregation.
//! 6. Fallback -- generative service, or a localized "I don't understand".
//!
//! Persistence effects returned by a flow step run *before* the session
//! transition is applied: a failed write replies with a generic apology
//! and leaves the session exactly where it was.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use lumen_types::config::BotConfig;
use lumen_types::entry::{CheckinEntry, TriggerEntry};
use lumen_types::error::RepositoryError;
use lumen_types::report::ReportWindow;
use lumen_types::session::{FlowKind, FlowState};
use lumen_types::user::UserProfile;

use crate::aggregate;
use crate::flow::{self, Progress, SideEffect};
use crate::generative::{self, GenerativeProvider};
use crate::i18n::{CatalogStore, MessageCatalog};
use crate::repository::{JournalRepository, UserRepository};
use crate::safety::SafetyGuard;
use crate::session::SessionStore;

/// The fixed command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Settings,
    Daily,
    Breath,
    Ground,
    Plan,
    Triggers,
    Report,
    Sleep,
    Stats,
    Unknown,
}

/// Parse a `/command`, tolerating the `@botname` suffix Telegram appends
/// in group chats.
fn parse_command(text: &str) -> Option<Command> {
    let rest = text.strip_prefix('/')?;
    let name = rest
        .split_whitespace()
        .next()
        .unwrap_or("")
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    Some(match name.as_str() {
        "start" => Command::Start,
        "settings" => Command::Settings,
        "daily" => Command::Daily,
        "breath" => Command::Breath,
        "ground" => Command::Ground,
        "plan" => Command::Plan,
        "triggers" => Command::Triggers,
        "report" => Command::Report,
        "sleep" => Command::Sleep,
        "stats" => Command::Stats,
        _ => Command::Unknown,
    })
}

/// Per-message router over the guard, session store, flows, aggregation,
/// and the optional generative fallback.
///
/// Generic over the repository and provider traits so the core never
/// depends on `lumen-infra` (same layering as the service structs).
pub struct Dispatcher<U, J, G> {
    config: Arc<BotConfig>,
    users: U,
    journal: J,
    generative: Option<G>,
    sessions: SessionStore,
    guard: SafetyGuard,
    catalogs: CatalogStore,
}

impl<U, J, G> Dispatcher<U, J, G>
where
    U: UserRepository,
    J: JournalRepository,
    G: GenerativeProvider,
{
    pub fn new(
        config: Arc<BotConfig>,
        users: U,
        journal: J,
        generative: Option<G>,
        catalogs: CatalogStore,
    ) -> Self {
        Self {
            config,
            users,
            journal,
            generative,
            sessions: SessionStore::new(),
            guard: SafetyGuard::new(),
            catalogs,
        }
    }

    /// The active-session store (exposed for inspection in tests).
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one inbound message and produce the outbound replies.
    ///
    /// Never returns an error: external failures are logged and rendered
    /// as a localized apology so one user's bad turn cannot take down the
    /// polling loop.
    pub async fn handle(&self, user_id: i64, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let profile = match self
            .users
            .get_or_create(user_id, &self.config.default_lang, &self.config.default_country)
            .await
        {
            Ok(profile) => profile,
            Err(err) => {
                warn!(user_id, error = %err, "failed to load user profile");
                return vec![self.catalogs.default_catalog().text("error_generic")];
            }
        };
        let catalog = self.catalogs.get(&profile.lang);

        // The guard runs before everything, mid-flow steps included. A hit
        // terminates any in-progress flow without persisting partial state.
        if self.guard.scan(text) {
            if let Some(stale) = self.sessions.take(user_id) {
                info!(user_id, flow = %stale.kind(), "flow terminated by safety guard");
            }
            return vec![catalog.text("crisis_detected")];
        }

        if let Some(command) = parse_command(text) {
            return self.handle_command(&profile, catalog, command).await;
        }

        if let Some(state) = self.sessions.get(user_id) {
            return self.advance_flow(&profile, catalog, state, text).await;
        }

        if let Some(replies) = self.handle_settings(&profile, catalog, text).await {
            return replies;
        }

        if let Some(window) = text.parse::<i64>().ok().and_then(ReportWindow::from_days) {
            return self.render_report(&profile, catalog, window).await;
        }

        self.fallback(catalog, text).await
    }

    async fn handle_command(
        &self,
        profile: &UserProfile,
        catalog: &MessageCatalog,
        command: Command,
    ) -> Vec<String> {
        // An unrecognized command neither claims the turn nor disturbs an
        // active flow.
        if command == Command::Unknown {
            return vec![catalog.text("unknown")];
        }

        // Recognized commands always outrank a dangling session.
        if let Some(stale) = self.sessions.take(profile.user_id) {
            info!(
                user_id = profile.user_id,
                flow = %stale.kind(),
                "discarding unfinished session: command takes priority"
            );
        }

        match command {
            Command::Start => vec![catalog.text("start"), catalog.text("choose_lang")],

            Command::Settings => vec![catalog.render(
                "settings",
                &[("lang", &profile.lang), ("country", &profile.country)],
            )],

            Command::Daily => self.start_flow(profile, catalog, FlowKind::CheckIn),
            Command::Breath => self.start_flow(profile, catalog, FlowKind::Breathing),
            Command::Ground => self.start_flow(profile, catalog, FlowKind::Grounding),
            Command::Plan => self.start_flow(profile, catalog, FlowKind::Planning),
            Command::Triggers => self.start_flow(profile, catalog, FlowKind::TriggerLog),

            Command::Report => vec![catalog.text("report_intro")],

            Command::Sleep => vec![catalog.text("sleep_tips")],

            Command::Stats => self.render_stats(profile, catalog).await,

            Command::Unknown => unreachable!("handled above"),
        }
    }

    fn start_flow(
        &self,
        profile: &UserProfile,
        catalog: &MessageCatalog,
        kind: FlowKind,
    ) -> Vec<String> {
        let (reply, state) = flow::start(kind, profile, catalog);
        // The session was already taken by the command path; any race here
        // is last-write-wins for the same user, which this channel model
        // cannot produce.
        let _ = self.sessions.replace(profile.user_id, state);
        info!(user_id = profile.user_id, flow = %kind, "flow started");
        vec![reply]
    }

    async fn advance_flow(
        &self,
        profile: &UserProfile,
        catalog: &MessageCatalog,
        state: FlowState,
        text: &str,
    ) -> Vec<String> {
        let kind = state.kind();
        let result = flow::advance(state, text, catalog);

        if let Some(effect) = result.effect {
            if let Err(err) = self.run_effect(profile.user_id, effect).await {
                warn!(
                    user_id = profile.user_id,
                    flow = %kind,
                    error = %err,
                    "journal write failed; session left unchanged"
                );
                return vec![catalog.text("error_generic")];
            }
        }

        match result.next {
            Progress::Continue(next) => {
                let _ = self.sessions.replace(profile.user_id, next);
            }
            Progress::Done => {
                self.sessions.clear(profile.user_id);
                info!(user_id = profile.user_id, flow = %kind, "flow completed");
            }
        }

        vec![result.reply]
    }

    async fn run_effect(&self, user_id: i64, effect: SideEffect) -> Result<(), RepositoryError> {
        match effect {
            SideEffect::SaveCheckin {
                stress,
                triggers,
                sleep_hours,
                micro_goal,
            } => {
                let entry = CheckinEntry {
                    user_id,
                    ts: Utc::now(),
                    stress: Some(stress),
                    triggers,
                    sleep_hours: Some(sleep_hours),
                    micro_goal,
                };
                self.journal.save_checkin(&entry).await
            }
            SideEffect::SavePlanItems(items) => {
                self.journal
                    .save_plan_items(user_id, Utc::now(), &items)
                    .await
            }
            SideEffect::LogTrigger(note) => {
                let entry = TriggerEntry {
                    user_id,
                    ts: Utc::now(),
                    note,
                };
                self.journal.save_trigger(&entry).await
            }
        }
    }

    async fn handle_settings(
        &self,
        profile: &UserProfile,
        catalog: &MessageCatalog,
        text: &str,
    ) -> Option<Vec<String>> {
        let lower = text.to_lowercase();

        if let Some(code) = lower.strip_prefix("lang ") {
            let code = code.trim().to_string();
            if !self.config.langs.iter().any(|l| l == &code) {
                return Some(vec![self.config.langs.join(" / ")]);
            }
            return Some(match self.users.set_lang(profile.user_id, &code).await {
                Ok(()) => vec![catalog.text("saved")],
                Err(err) => {
                    warn!(user_id = profile.user_id, error = %err, "failed to update language");
                    vec![catalog.text("error_generic")]
                }
            });
        }

        if let Some(code) = lower.strip_prefix("country ") {
            let code = code.trim().to_uppercase();
            if !self.config.countries.iter().any(|c| c == &code) {
                return Some(vec![self.config.countries.join(" / ")]);
            }
            return Some(match self.users.set_country(profile.user_id, &code).await {
                Ok(()) => vec![catalog.text("saved")],
                Err(err) => {
                    warn!(user_id = profile.user_id, error = %err, "failed to update country");
                    vec![catalog.text("error_generic")]
                }
            });
        }

        None
    }

    async fn render_report(
        &self,
        profile: &UserProfile,
        catalog: &MessageCatalog,
        window: ReportWindow,
    ) -> Vec<String> {
        let since = Utc::now() - Duration::days(window.days());
        let entries = match self.journal.checkins_since(profile.user_id, since).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(user_id = profile.user_id, error = %err, "failed to read check-ins");
                return vec![catalog.text("error_generic")];
            }
        };

        match aggregate::aggregate(&entries) {
            None => vec![catalog.text("no_data")],
            Some(report) => vec![catalog.render(
                "report_ready",
                &[
                    ("days", &window.days().to_string()),
                    ("n", &report.sample_count.to_string()),
                    ("avg", &format!("{:.1}", report.average_stress)),
                    ("sleep", &format!("{:.1}", report.average_sleep)),
                    ("trg", &report.top_terms_label()),
                ],
            )],
        }
    }

    async fn render_stats(&self, profile: &UserProfile, catalog: &MessageCatalog) -> Vec<String> {
        // Silently ignored for non-admins, matching the command surface
        // contract: the command's existence is not advertised.
        if !self.config.is_admin(profile.user_id) {
            return Vec::new();
        }

        let now = Utc::now();
        let counts = async {
            let users = self.users.count_users().await?;
            let week = self
                .journal
                .count_checkins_since(now - Duration::days(7))
                .await?;
            let month = self
                .journal
                .count_checkins_since(now - Duration::days(30))
                .await?;
            Ok::<_, RepositoryError>((users, week, month))
        };

        match counts.await {
            Ok((users, week, month)) => vec![catalog.render(
                "stats",
                &[
                    ("users", &users.to_string()),
                    ("c7", &week.to_string()),
                    ("c30", &month.to_string()),
                ],
            )],
            Err(err) => {
                warn!(user_id = profile.user_id, error = %err, "failed to compute stats");
                vec![catalog.text("error_generic")]
            }
        }
    }

    async fn fallback(&self, catalog: &MessageCatalog, text: &str) -> Vec<String> {
        let Some(provider) = &self.generative else {
            return vec![catalog.text("unknown")];
        };

        let prompt = generative::truncate_prompt(text);
        match provider.complete(generative::SYSTEM_PREAMBLE, prompt).await {
            Ok(reply) if !reply.trim().is_empty() => vec![reply],
            Ok(_) => vec![catalog.text("unknown")],
            Err(err) => {
                warn!(provider = provider.name(), error = %err, "generative fallback failed");
                vec![catalog.text("error_generic")]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use chrono::DateTime;

    use lumen_types::config::ConfigFile;
    use lumen_types::error::GenerativeError;
    use lumen_types::session::CheckInStep;

    // -----------------------------------------------------------------------
    // In-memory fakes
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct FakeUsers {
        langs: Mutex<HashMap<i64, String>>,
        countries: Mutex<HashMap<i64, String>>,
        user_count: u64,
    }

    impl UserRepository for FakeUsers {
        async fn get_or_create(
            &self,
            user_id: i64,
            default_lang: &str,
            default_country: &str,
        ) -> Result<UserProfile, RepositoryError> {
            let lang = self
                .langs
                .lock()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_else(|| default_lang.to_string());
            let country = self
                .countries
                .lock()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_else(|| default_country.to_string());
            Ok(UserProfile {
                user_id,
                lang,
                country,
                created_at: Utc::now(),
            })
        }

        async fn set_lang(&self, user_id: i64, lang: &str) -> Result<(), RepositoryError> {
            self.langs.lock().unwrap().insert(user_id, lang.to_string());
            Ok(())
        }

        async fn set_country(&self, user_id: i64, country: &str) -> Result<(), RepositoryError> {
            self.countries
                .lock()
                .unwrap()
                .insert(user_id, country.to_string());
            Ok(())
        }

        async fn count_users(&self) -> Result<u64, RepositoryError> {
            Ok(self.user_count)
        }
    }

    #[derive(Default)]
    struct FakeJournal {
        checkins: Mutex<Vec<CheckinEntry>>,
        triggers: Mutex<Vec<TriggerEntry>>,
        plans: Mutex<Vec<String>>,
        fail_writes: AtomicBool,
    }

    impl FakeJournal {
        fn check_writable(&self) -> Result<(), RepositoryError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(RepositoryError::Connection)
            } else {
                Ok(())
            }
        }
    }

    impl JournalRepository for FakeJournal {
        async fn save_checkin(&self, entry: &CheckinEntry) -> Result<(), RepositoryError> {
            self.check_writable()?;
            self.checkins.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn save_trigger(&self, entry: &TriggerEntry) -> Result<(), RepositoryError> {
            self.check_writable()?;
            self.triggers.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn save_plan_items(
            &self,
            _user_id: i64,
            _ts: DateTime<Utc>,
            items: &[String],
        ) -> Result<(), RepositoryError> {
            self.check_writable()?;
            self.plans.lock().unwrap().extend(items.iter().cloned());
            Ok(())
        }

        async fn checkins_since(
            &self,
            user_id: i64,
            since: DateTime<Utc>,
        ) -> Result<Vec<CheckinEntry>, RepositoryError> {
            Ok(self
                .checkins
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.user_id == user_id && e.ts >= since)
                .cloned()
                .collect())
        }

        async fn count_checkins_since(
            &self,
            since: DateTime<Utc>,
        ) -> Result<u64, RepositoryError> {
            Ok(self
                .checkins
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.ts >= since)
                .count() as u64)
        }
    }

    struct EchoProvider;

    impl GenerativeProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            _system: &str,
            user_text: &str,
        ) -> Result<String, GenerativeError> {
            Ok(format!("echo: {user_text}"))
        }
    }

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    const USER: i64 = 1;
    const ADMIN: i64 = 99;

    fn config() -> Arc<BotConfig> {
        let file = ConfigFile {
            bot_token: Some("123:abc".to_string()),
            admins: vec![ADMIN],
            ..Default::default()
        };
        Arc::new(BotConfig::from_file(file).unwrap())
    }

    /// Empty catalog: every reply is its message key, which keeps the
    /// assertions independent of wording.
    fn catalogs() -> CatalogStore {
        catalogs_with(&[])
    }

    fn catalogs_with(pairs: &[(&str, &str)]) -> CatalogStore {
        let catalog = MessageCatalog::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        CatalogStore::new(
            HashMap::from([("en".to_string(), catalog)]),
            "en".to_string(),
        )
    }

    type TestDispatcher = Dispatcher<FakeUsers, Arc<FakeJournal>, EchoProvider>;

    fn dispatcher(journal: Arc<FakeJournal>) -> TestDispatcher {
        Dispatcher::new(config(), FakeUsers::default(), journal, None, catalogs())
    }

    impl JournalRepository for Arc<FakeJournal> {
        async fn save_checkin(&self, entry: &CheckinEntry) -> Result<(), RepositoryError> {
            self.as_ref().save_checkin(entry).await
        }

        async fn save_trigger(&self, entry: &TriggerEntry) -> Result<(), RepositoryError> {
            self.as_ref().save_trigger(entry).await
        }

        async fn save_plan_items(
            &self,
            user_id: i64,
            ts: DateTime<Utc>,
            items: &[String],
        ) -> Result<(), RepositoryError> {
            self.as_ref().save_plan_items(user_id, ts, items).await
        }

        async fn checkins_since(
            &self,
            user_id: i64,
            since: DateTime<Utc>,
        ) -> Result<Vec<CheckinEntry>, RepositoryError> {
            self.as_ref().checkins_since(user_id, since).await
        }

        async fn count_checkins_since(
            &self,
            since: DateTime<Utc>,
        ) -> Result<u64, RepositoryError> {
            self.as_ref().count_checkins_since(since).await
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_start_replies_with_greeting_and_language_choice() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        let replies = d.handle(USER, "/start").await;
        assert_eq!(replies, vec!["start", "choose_lang"]);
    }

    #[tokio::test]
    async fn test_full_checkin_persists_one_atomic_entry() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal.clone());

        assert_eq!(d.handle(USER, "/daily").await, vec!["checkin_intro"]);
        assert_eq!(d.handle(USER, "15").await, vec!["checkin_stress_saved"]);
        assert_eq!(d.handle(USER, "crowds").await, vec!["checkin_triggers_saved"]);
        assert_eq!(d.handle(USER, "6,5").await, vec!["checkin_sleep_saved"]);
        assert_eq!(d.handle(USER, "short walk").await, vec!["checkin_done"]);

        let checkins = journal.checkins.lock().unwrap();
        assert_eq!(checkins.len(), 1);
        let entry = &checkins[0];
        assert_eq!(entry.stress, Some(10.0)); // clamped from 15
        assert_eq!(entry.triggers, "crowds");
        assert_eq!(entry.sleep_hours, Some(6.5));
        assert_eq!(entry.micro_goal, "short walk");
        assert!(d.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_stress_reprompts_without_advancing() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        let _ = d.handle(USER, "/daily").await;
        assert_eq!(
            d.handle(USER, "very stressed").await,
            vec!["checkin_stress_invalid"]
        );
        assert!(matches!(
            d.sessions().get(USER),
            Some(FlowState::CheckIn {
                step: CheckInStep::Stress,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_guard_fires_mid_flow_and_resets_session() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal.clone());

        let _ = d.handle(USER, "/daily").await;
        let _ = d.handle(USER, "3").await;
        let _ = d.handle(USER, "crowds").await;
        // Sent as the sleep-hours answer.
        let replies = d.handle(USER, "I want to die").await;

        assert_eq!(replies, vec!["crisis_detected"]);
        assert!(d.sessions().get(USER).is_none());
        assert!(journal.checkins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guard_matches_cyrillic_phrase() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal.clone());

        let _ = d.handle(USER, "/daily").await;
        let replies = d.handle(USER, "не хочу жити").await;
        assert_eq!(replies, vec!["crisis_detected"]);
        assert!(d.sessions().get(USER).is_none());
    }

    #[tokio::test]
    async fn test_new_flow_discards_unfinished_session() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal.clone());

        let _ = d.handle(USER, "/daily").await;
        let _ = d.handle(USER, "8").await;
        let _ = d.handle(USER, "/plan").await;

        assert!(matches!(
            d.sessions().get(USER),
            Some(FlowState::Planning { .. })
        ));
        // Nothing from the abandoned check-in was persisted.
        assert!(journal.checkins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_planning_caps_at_three_items_in_order() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal.clone());

        let _ = d.handle(USER, "/plan").await;
        for item in ["one", "two", "three", "four", "five"] {
            assert_eq!(d.handle(USER, item).await, vec!["plan_added"]);
        }
        assert_eq!(d.handle(USER, "done").await, vec!["plan_saved"]);

        assert_eq!(*journal.plans.lock().unwrap(), vec!["one", "two", "three"]);
        assert!(d.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_planning_keeps_two_of_two() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal.clone());

        let _ = d.handle(USER, "/plan").await;
        let _ = d.handle(USER, "one").await;
        let _ = d.handle(USER, "two").await;
        let _ = d.handle(USER, "done").await;

        assert_eq!(*journal.plans.lock().unwrap(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_trigger_log_persists_each_note_immediately() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal.clone());

        let _ = d.handle(USER, "/triggers").await;
        let _ = d.handle(USER, "sirens").await;
        assert_eq!(journal.triggers.lock().unwrap().len(), 1);
        let _ = d.handle(USER, "crowded metro").await;
        assert_eq!(journal.triggers.lock().unwrap().len(), 2);

        assert_eq!(d.handle(USER, "done").await, vec!["saved"]);
        assert_eq!(journal.triggers.lock().unwrap().len(), 2);
        assert!(d.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_session_and_apologizes() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal.clone());

        let _ = d.handle(USER, "/daily").await;
        let _ = d.handle(USER, "5").await;
        let _ = d.handle(USER, "crowds").await;
        let _ = d.handle(USER, "7").await;

        journal.fail_writes.store(true, Ordering::SeqCst);
        let replies = d.handle(USER, "short walk").await;

        assert_eq!(replies, vec!["error_generic"]);
        // The session was not cleared: the user can retry the final answer.
        assert!(matches!(
            d.sessions().get(USER),
            Some(FlowState::CheckIn {
                step: CheckInStep::Goal,
                ..
            })
        ));
        assert!(journal.checkins.lock().unwrap().is_empty());

        journal.fail_writes.store(false, Ordering::SeqCst);
        assert_eq!(d.handle(USER, "short walk").await, vec!["checkin_done"]);
        assert_eq!(journal.checkins.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_breathing_gate() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        let _ = d.handle(USER, "/breath").await;
        assert_eq!(d.handle(USER, "ready").await, vec!["breath_prompt"]);
        assert_eq!(d.handle(USER, "GO").await, vec!["breath_go"]);
        assert!(d.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_grounding_emits_five_prompts_then_done() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        assert_eq!(d.handle(USER, "/ground").await, vec!["ground_intro"]);

        // Five prompts, whatever the user sends.
        for _ in 0..5 {
            let replies = d.handle(USER, "anything").await;
            assert_eq!(replies.len(), 1);
            assert!(replies[0].contains("ground_step"));
        }
        assert_eq!(d.handle(USER, "anything").await, vec!["ground_done"]);
        assert!(d.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_report_without_data() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        assert_eq!(d.handle(USER, "/report").await, vec!["report_intro"]);
        assert_eq!(d.handle(USER, "7").await, vec!["no_data"]);
    }

    #[tokio::test]
    async fn test_report_renders_aggregates() {
        let journal = Arc::new(FakeJournal::default());
        for stress in [2.0, 4.0, 6.0] {
            journal
                .checkins
                .lock()
                .unwrap()
                .push(CheckinEntry {
                    user_id: USER,
                    ts: Utc::now(),
                    stress: Some(stress),
                    triggers: "deadline".to_string(),
                    sleep_hours: Some(6.0),
                    micro_goal: String::new(),
                });
        }

        let catalogs = catalogs_with(&[(
            "report_ready",
            "{days}d n={n} avg={avg} sleep={sleep} top={trg}",
        )]);
        let d = Dispatcher::new(
            config(),
            FakeUsers::default(),
            journal,
            None::<EchoProvider>,
            catalogs,
        );

        let replies = d.handle(USER, "30").await;
        assert_eq!(replies, vec!["30d n=3 avg=4.0 sleep=6.0 top=deadline"]);
    }

    #[tokio::test]
    async fn test_other_numbers_fall_through_to_fallback() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        assert_eq!(d.handle(USER, "14").await, vec!["unknown"]);
    }

    #[tokio::test]
    async fn test_settings_lang_update_and_hint() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        assert_eq!(d.handle(USER, "lang uk").await, vec!["saved"]);
        assert_eq!(d.handle(USER, "lang de").await, vec!["en / uk"]);
        assert_eq!(d.handle(USER, "country ua").await, vec!["saved"]);
        assert_eq!(d.handle(USER, "country DE").await, vec!["US / UA"]);
    }

    #[tokio::test]
    async fn test_stats_restricted_to_admins() {
        let journal = Arc::new(FakeJournal::default());
        let d = dispatcher(journal);

        assert!(d.handle(USER, "/stats").await.is_empty());

        let replies = d.handle(ADMIN, "/stats").await;
        assert_eq!(replies, vec!["stats"]);
    }

    #[tokio::test]
    async fn test_fallback_without_provider_is_unknown() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        assert_eq!(d.handle(USER, "just chatting").await, vec!["unknown"]);
    }

    #[tokio::test]
    async fn test_fallback_with_provider_forwards_text() {
        let d = Dispatcher::new(
            config(),
            FakeUsers::default(),
            Arc::new(FakeJournal::default()),
            Some(EchoProvider),
            catalogs(),
        );
        assert_eq!(
            d.handle(USER, "rough day").await,
            vec!["echo: rough day"]
        );
    }

    #[tokio::test]
    async fn test_unknown_command_does_not_disturb_session() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        let _ = d.handle(USER, "/daily").await;
        assert_eq!(d.handle(USER, "/frobnicate").await, vec!["unknown"]);
        assert!(matches!(
            d.sessions().get(USER),
            Some(FlowState::CheckIn { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_text_produces_no_reply() {
        let d = dispatcher(Arc::new(FakeJournal::default()));
        assert!(d.handle(USER, "   ").await.is_empty());
    }
}

//! Status poller
//!
//! Polls the grading API on a fixed period, announces status changes to
//! the chat and reports failures there once per distinct message.

use homework_client::ClientError;
use homework_core::check::check_response;
use homework_core::error::{CheckError, StatusError};
use homework_core::verdict::parse_status;
use std::sync::Arc;
use thiserror::Error;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::repository::{HomeworkRepository, NotificationRepository};
use crate::service::LoopState;

/// Prefix of every failure report sent to the chat
const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Why a poll cycle failed
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("homework statuses request failed: {0}")]
    Poll(#[from] ClientError),

    #[error("{0}")]
    Response(#[from] CheckError),

    #[error("{0}")]
    Status(#[from] StatusError),
}

impl CycleError {
    /// Text of the failure report sent to the chat
    ///
    /// Response bodies are left out: they may vary between requests
    /// (request ids, timestamps) and would defeat duplicate suppression.
    pub fn report(&self) -> String {
        let detail = match self {
            CycleError::Poll(e) => format!("homework statuses request failed: {}", e.summary()),
            other => other.to_string(),
        };
        format!("{}: {}", FAILURE_PREFIX, detail)
    }
}

/// What a single poll cycle ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered
    Announced,
    /// A new status was seen but could not be delivered
    Undelivered,
    /// The latest status was already announced
    Unchanged,
    /// The API had no updates
    Idle,
    /// The cycle failed and the failure was handled
    Failed,
}

/// Status poller that runs the polling loop until shutdown
pub struct StatusPoller {
    config: Config,
    homeworks: Arc<dyn HomeworkRepository>,
    notifier: Arc<dyn NotificationRepository>,
}

impl StatusPoller {
    /// Creates a new status poller
    pub fn new(
        config: Config,
        homeworks: Arc<dyn HomeworkRepository>,
        notifier: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            config,
            homeworks,
            notifier,
        }
    }

    /// Runs the polling loop
    ///
    /// Every cycle is followed by a wait of `retry_period`, whatever the
    /// cycle ended with. `shutdown` is only observed during that wait;
    /// once it completes the final state is returned.
    pub async fn run(&self, mut state: LoopState, shutdown: impl Future<Output = ()>) -> LoopState {
        info!(
            "Starting status poller (retry period: {:?}, from_date: {})",
            self.config.retry_period,
            state.cursor()
        );

        tokio::pin!(shutdown);

        loop {
            let outcome = self.poll_once(&mut state).await;
            debug!("Poll cycle finished: {:?}", outcome);

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping status poller");
                    return state;
                }
                _ = time::sleep(self.config.retry_period) => {}
            }
        }
    }

    /// Performs a single poll cycle
    ///
    /// Never fails: every error is logged and, the first time its message
    /// is seen, reported to the chat.
    pub async fn poll_once(&self, state: &mut LoopState) -> CycleOutcome {
        match self.check_for_update(state).await {
            Ok(Some(message)) => self.announce_status(state, message).await,
            Ok(None) => CycleOutcome::Unchanged,
            Err(CycleError::Response(CheckError::NoPendingData)) => {
                info!("{}", CheckError::NoPendingData);
                CycleOutcome::Idle
            }
            Err(e) => {
                self.handle_failure(state, e).await;
                CycleOutcome::Failed
            }
        }
    }

    /// Fetches and checks the latest status
    ///
    /// Returns the message to announce, or `None` if it was already
    /// announced. The cursor moves as soon as the answer passes checking.
    async fn check_for_update(&self, state: &mut LoopState) -> Result<Option<String>, CycleError> {
        let raw = self.homeworks.fetch_statuses(state.cursor()).await?;
        let result = check_response(&raw)?;

        state.advance_cursor(result.current_date);

        let Some(latest) = result.latest() else {
            return Ok(None);
        };

        if let Some(comment) = &latest.reviewer_comment {
            debug!("Reviewer comment: {}", comment);
        }

        let message = parse_status(latest)?;

        if state.should_announce_status(&message) {
            Ok(Some(message))
        } else {
            debug!("Homework status unchanged");
            Ok(None)
        }
    }

    async fn announce_status(&self, state: &mut LoopState, message: String) -> CycleOutcome {
        match self.notifier.send_message(&message).await {
            Ok(()) => {
                info!("Announced status change: {}", message);
                state.mark_status_announced(message);
                CycleOutcome::Announced
            }
            Err(e) => {
                // Not marked: the same status is announced again next cycle
                error!("Failed to send status message: {}", e);
                CycleOutcome::Undelivered
            }
        }
    }

    async fn handle_failure(&self, state: &mut LoopState, err: CycleError) {
        error!("{}: {}", FAILURE_PREFIX, err);
        let message = err.report();

        if matches!(&err, CycleError::Poll(e) if e.is_unauthorized()) {
            warn!("The grading API rejected the token, check PRACTICUM_TOKEN");
        }

        if !state.should_announce_error(&message) {
            debug!("Failure already reported to the chat");
            return;
        }

        if let Err(e) = self.notifier.send_message(&message).await {
            error!("Failed to send failure report: {}", e);
        }
        // Marked even when undelivered: each distinct failure gets one attempt
        state.mark_error_notified(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves scripted answers in order, repeating the last one
    struct ScriptedHomeworks {
        answers: Mutex<VecDeque<homework_client::Result<Value>>>,
        requested: Mutex<Vec<i64>>,
    }

    impl ScriptedHomeworks {
        fn new(answers: Vec<homework_client::Result<Value>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<i64> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HomeworkRepository for ScriptedHomeworks {
        async fn fetch_statuses(&self, from_date: i64) -> homework_client::Result<Value> {
            self.requested.lock().unwrap().push(from_date);
            let mut answers = self.answers.lock().unwrap();
            if answers.len() > 1 {
                answers.pop_front().unwrap()
            } else {
                // ClientError is not Clone, a repeated failure is always a 500
                match answers.front().unwrap() {
                    Ok(value) => Ok(value.clone()),
                    Err(_) => Err(ClientError::api_error(500, "Internal Server Error")),
                }
            }
        }
    }

    /// Records delivered messages; fails while `failing` is set
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        attempts: Mutex<usize>,
        failing: Mutex<bool>,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }

        fn set_failing(&self, failing: bool) {
            *self.failing.lock().unwrap() = failing;
        }
    }

    #[async_trait]
    impl NotificationRepository for RecordingNotifier {
        async fn send_message(&self, text: &str) -> homework_client::Result<()> {
            *self.attempts.lock().unwrap() += 1;
            if *self.failing.lock().unwrap() {
                return Err(ClientError::api_error(400, "Bad Request: chat not found"));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Collects formatted log output of the current thread
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let sink = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .with_writer(move || sink.clone())
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn count(&self, needle: &str) -> usize {
            let output = String::from_utf8_lossy(&self.0.lock().unwrap()).to_string();
            output.lines().filter(|line| line.contains(needle)).count()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn poller(
        homeworks: Arc<ScriptedHomeworks>,
        notifier: Arc<RecordingNotifier>,
    ) -> StatusPoller {
        let mut config = Config::new("p".to_string(), "t".to_string(), "42".to_string());
        config.retry_period = Duration::from_millis(5);
        StatusPoller::new(config, homeworks, notifier)
    }

    fn answer(name: &str, status: &str, current_date: i64) -> homework_client::Result<Value> {
        Ok(json!({
            "homeworks": [{"homework_name": name, "status": status}],
            "current_date": current_date
        }))
    }

    const REVIEWING: &str =
        "Изменился статус проверки работы \"hw1\". Работа взята на проверку ревьюером.";
    const APPROVED: &str =
        "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!";

    #[tokio::test]
    async fn test_new_status_announced_once() {
        let homeworks = ScriptedHomeworks::new(vec![
            answer("hw1", "reviewing", 100),
            answer("hw1", "reviewing", 105),
        ]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks.clone(), notifier.clone());
        let mut state = LoopState::new(50);

        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Announced);
        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Unchanged);

        assert_eq!(notifier.sent(), vec![REVIEWING.to_string()]);
        assert_eq!(homeworks.requested(), vec![50, 100]);
        assert_eq!(state.cursor(), 105);
    }

    #[tokio::test]
    async fn test_status_change_announced_again() {
        let homeworks = ScriptedHomeworks::new(vec![
            answer("hw1", "reviewing", 100),
            answer("hw1", "approved", 110),
        ]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(0);

        poller.poll_once(&mut state).await;
        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Announced);

        assert_eq!(
            notifier.sent(),
            vec![REVIEWING.to_string(), APPROVED.to_string()]
        );
        assert_eq!(state.last_status_message(), APPROVED);
        assert_eq!(state.cursor(), 110);
    }

    #[tokio::test]
    async fn test_empty_answer_is_silent() {
        let homeworks = ScriptedHomeworks::new(vec![Ok(json!({"homeworks": [], "current_date": 200}))]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(100);

        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Idle);
        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Idle);

        assert!(notifier.sent().is_empty());
        assert_eq!(state.cursor(), 100);
        assert_eq!(state.notified_error_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_homeworks_is_silent() {
        let homeworks = ScriptedHomeworks::new(vec![Ok(json!({"current_date": 200}))]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(100);

        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Idle);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_poll_failure_reported_once() {
        let homeworks = ScriptedHomeworks::new(vec![
            Err(ClientError::api_error(500, "Internal Server Error")),
            Err(ClientError::api_error(500, "Internal Server Error")),
        ]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks.clone(), notifier.clone());
        let mut state = LoopState::new(100);

        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Failed);
        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Failed);

        assert_eq!(
            notifier.sent(),
            vec![
                "Сбой в работе программы: homework statuses request failed: \
                 API error (status 500)"
                    .to_string()
            ]
        );
        // Failed polls keep the cursor
        assert_eq!(homeworks.requested(), vec![100, 100]);
        assert_eq!(state.cursor(), 100);
    }

    #[tokio::test]
    async fn test_distinct_failures_each_reported() {
        let homeworks = ScriptedHomeworks::new(vec![
            Err(ClientError::api_error(503, "Service Unavailable")),
            Ok(json!({"homeworks": "hw1", "current_date": 1})),
            Err(ClientError::api_error(503, "Service Unavailable")),
            Ok(json!({"homeworks": "hw1", "current_date": 1})),
        ]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(0);

        for _ in 0..4 {
            assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Failed);
        }

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].ends_with("API error (status 503)"));
        assert!(sent[1].starts_with("Сбой в работе программы: malformed response"));
    }

    #[tokio::test]
    async fn test_unknown_status_is_a_failure_but_advances_cursor() {
        let homeworks = ScriptedHomeworks::new(vec![answer("hw1", "lost", 120)]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(100);

        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Failed);
        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Failed);

        assert_eq!(
            notifier.sent(),
            vec!["Сбой в работе программы: unknown homework status: \"lost\"".to_string()]
        );
        assert_eq!(state.cursor(), 120);
        assert_eq!(state.last_status_message(), "");
    }

    #[tokio::test]
    async fn test_missing_name_is_a_failure() {
        let homeworks = ScriptedHomeworks::new(vec![Ok(json!({
            "homeworks": [{"status": "approved"}],
            "current_date": 1
        }))]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(0);

        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Failed);
        assert_eq!(
            notifier.sent(),
            vec!["Сбой в работе программы: missing field `homework_name` in homework".to_string()]
        );
    }

    #[tokio::test]
    async fn test_undelivered_status_is_retried() {
        let homeworks = ScriptedHomeworks::new(vec![answer("hw1", "reviewing", 100)]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(0);

        notifier.set_failing(true);
        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Undelivered);
        assert_eq!(state.last_status_message(), "");

        notifier.set_failing(false);
        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Announced);
        assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Unchanged);

        assert_eq!(notifier.sent(), vec![REVIEWING.to_string()]);
    }

    #[tokio::test]
    async fn test_undelivered_failure_report_is_not_resent() {
        let homeworks = ScriptedHomeworks::new(vec![Ok(json!("not an object"))]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(0);

        notifier.set_failing(true);
        for _ in 0..3 {
            assert_eq!(poller.poll_once(&mut state).await, CycleOutcome::Failed);
        }

        assert_eq!(notifier.attempts(), 1);
        assert!(notifier.sent().is_empty());
        assert_eq!(state.notified_error_count(), 1);
    }

    #[tokio::test]
    async fn test_repeated_failure_logged_every_time() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let homeworks = ScriptedHomeworks::new(vec![Err(ClientError::api_error(
            500,
            "Internal Server Error",
        ))]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(0);

        poller.poll_once(&mut state).await;
        poller.poll_once(&mut state).await;

        // Logged with the response body, reported without it
        assert_eq!(
            logs.count(
                "Сбой в работе программы: homework statuses request failed: \
                 API error (status 500): Internal Server Error"
            ),
            2
        );
        assert_eq!(notifier.attempts(), 1);
    }

    #[tokio::test]
    async fn test_changing_error_bodies_reported_once() {
        let homeworks = ScriptedHomeworks::new(vec![
            Err(ClientError::api_error(502, "<html>request id 1a2b</html>")),
            Err(ClientError::api_error(502, "<html>request id 3c4d</html>")),
            Ok(json!({"homeworks": [], "current_date": 1})),
        ]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks, notifier.clone());
        let mut state = LoopState::new(0);

        poller.poll_once(&mut state).await;
        poller.poll_once(&mut state).await;

        assert_eq!(
            notifier.sent(),
            vec![
                "Сбой в работе программы: homework statuses request failed: \
                 API error (status 502)"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let homeworks = ScriptedHomeworks::new(vec![Err(ClientError::api_error(
            500,
            "Internal Server Error",
        ))]);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = poller(homeworks.clone(), notifier.clone());

        let state = poller
            .run(LoopState::new(7), time::sleep(Duration::from_millis(60)))
            .await;

        // Polled on every period, reported once
        assert!(homeworks.requested().len() >= 2);
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(state.notified_error_count(), 1);
        assert_eq!(state.cursor(), 7);
    }
}

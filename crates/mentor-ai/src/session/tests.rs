use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::*;
use crate::prompt::{ChatRole, CompletionRequest, PromptBuilder};
use crate::turn::Author;
use crate::{Completion, CompletionGateway, FailureKind, GatewayError, TokenUsage};

const URL: &str = "https://leetcode.com/problems/two-sum/";

/// Replays canned results in order and records every request it sees.
#[derive(Default)]
struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<Completion, GatewayError>>>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    fn with(replies: Vec<Result<Completion, GatewayError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::default(),
        })
    }

    fn seen(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::ProviderUnavailable("script exhausted".into())))
    }
}

/// Blocks every call until the test hands out a permit.
struct GatedGateway {
    gate: Semaphore,
    text: String,
}

#[async_trait]
impl CompletionGateway for GatedGateway {
    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, GatewayError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| GatewayError::ProviderUnavailable(e.to_string()))?;
        permit.forget();
        Ok(reply(&self.text))
    }
}

fn reply(text: &str) -> Completion {
    Completion {
        text: text.into(),
        model: "gpt-4o-mini".into(),
        usage: TokenUsage {
            input_tokens: 100,
            output_tokens: 20,
        },
    }
}

fn controller(gateway: Arc<ScriptedGateway>) -> SessionController {
    SessionController::new(gateway)
}

#[tokio::test]
async fn successful_turn_appends_user_then_assistant() {
    let gateway = ScriptedGateway::with(vec![Ok(reply(
        "Let's think about it — what have you tried?",
    ))]);
    let session = controller(gateway.clone());

    let outcome = session
        .submit_turn("What's the time complexity?", URL)
        .await
        .unwrap();

    let turns = session.snapshot().await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].author, Author::User);
    assert_eq!(turns[0].text, "What's the time complexity?");
    assert_eq!(turns[0].problem_ref.as_deref(), Some(URL));
    assert_eq!(turns[1].author, Author::Assistant);
    assert_eq!(turns[1].text, "Let's think about it — what have you tried?");
    assert_eq!(outcome, TurnOutcome::Replied(turns[1].clone()));
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn empty_text_is_invalid_input() {
    let gateway = ScriptedGateway::with(vec![]);
    let session = controller(gateway.clone());

    for text in ["", "   \n\t"] {
        let err = session.submit_turn(text, URL).await.unwrap_err();
        assert!(matches!(err, SubmitError::InvalidInput(_)));
    }
    assert!(session.snapshot().await.is_empty());
    assert!(gateway.seen().is_empty());
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn missing_problem_url_is_missing_context() {
    let gateway = ScriptedGateway::with(vec![]);
    let session = controller(gateway.clone());

    for problem in ["", "two-sum", "ftp://leetcode.com/problems/two-sum"] {
        let err = session.submit_turn("hi", problem).await.unwrap_err();
        assert!(matches!(err, SubmitError::MissingContext(_)), "{problem:?}");
    }
    assert!(session.snapshot().await.is_empty());
    assert!(gateway.seen().is_empty());
}

#[tokio::test]
async fn empty_text_is_reported_before_missing_context() {
    let session = controller(ScriptedGateway::with(vec![]));
    let err = session.submit_turn("", "").await.unwrap_err();
    assert!(matches!(err, SubmitError::InvalidInput(_)));
}

#[tokio::test]
async fn provider_failure_appends_fixed_notice() {
    let gateway = ScriptedGateway::with(vec![Err(GatewayError::ProviderUnavailable(
        "connection refused: 10.0.0.1:443".into(),
    ))]);
    let session = controller(gateway);

    let outcome = session.submit_turn("hint please", URL).await.unwrap();

    let turns = session.snapshot().await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].author, Author::Assistant);
    assert_eq!(turns[1].text, FAILURE_NOTICE);
    assert!(!turns[1].text.contains("connection refused"));
    assert_eq!(
        outcome,
        TurnOutcome::Failed {
            kind: FailureKind::ProviderUnavailable,
            notice: turns[1].clone(),
        }
    );
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn every_failure_kind_yields_the_same_notice() {
    let errors = vec![
        Err(GatewayError::AuthFailure("401".into())),
        Err(GatewayError::RateLimited("429".into())),
        Err(GatewayError::MalformedResponse("no choices".into())),
    ];
    let session = controller(ScriptedGateway::with(errors));

    for _ in 0..3 {
        let outcome = session.submit_turn("again", URL).await.unwrap();
        assert_eq!(outcome.appended().unwrap().text, FAILURE_NOTICE);
    }
    assert_eq!(session.snapshot().await.len(), 6);
}

#[tokio::test]
async fn empty_completion_text_is_treated_as_malformed() {
    let session = controller(ScriptedGateway::with(vec![Ok(reply("  "))]));

    let outcome = session.submit_turn("question", URL).await.unwrap();
    assert!(matches!(
        outcome,
        TurnOutcome::Failed {
            kind: FailureKind::MalformedResponse,
            ..
        }
    ));
    assert_eq!(session.snapshot().await[1].text, FAILURE_NOTICE);
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn second_submission_while_awaiting_is_busy() {
    let gateway = ScriptedGateway::with(vec![Ok(reply("first reply"))]);
    let session = controller(gateway.clone());

    let pending = session.begin_turn("first", URL).await.unwrap();
    assert_eq!(session.status(), SessionStatus::AwaitingReply);

    let err = session.begin_turn("second", URL).await.unwrap_err();
    assert_eq!(err, SubmitError::Busy);
    assert_eq!(session.snapshot().await.len(), 1);

    pending.complete().await;
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(gateway.seen().len(), 1);
}

#[tokio::test]
async fn busy_is_reported_before_input_errors() {
    let session = controller(ScriptedGateway::with(vec![Ok(reply("ok"))]));
    let pending = session.begin_turn("first", URL).await.unwrap();

    let err = session.begin_turn("", "").await.unwrap_err();
    assert_eq!(err, SubmitError::Busy);

    pending.complete().await;
}

#[tokio::test]
async fn pending_turn_debug_shows_epoch_and_history() {
    let session = controller(ScriptedGateway::with(vec![Ok(reply("ok"))]));
    let pending = session.begin_turn("q", URL).await.unwrap();

    let debug = format!("{pending:?}");
    assert!(debug.contains("epoch: 0"));
    assert!(debug.contains("history: 2"));

    pending.complete().await;
}

#[tokio::test]
async fn zero_history_limit_still_sends_the_new_turn() {
    let gateway = ScriptedGateway::with(vec![Ok(reply("a")), Ok(reply("b"))]);
    let session = SessionController::new(gateway.clone())
        .with_prompt_builder(PromptBuilder::new().with_history_limit(0));

    session.submit_turn("q1", URL).await.unwrap();
    session.submit_turn("q2", URL).await.unwrap();

    for request in gateway.seen() {
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[1].role, ChatRole::User);
    }
    assert_eq!(gateway.seen()[1].history[1].text, "q2");
}

#[tokio::test]
async fn gateway_sees_directive_plus_every_turn() {
    let gateway = ScriptedGateway::with(vec![Ok(reply("one")), Ok(reply("two"))]);
    let session = controller(gateway.clone());

    session.submit_turn("first question", URL).await.unwrap();
    session.submit_turn("second question", URL).await.unwrap();

    let seen = gateway.seen();
    assert_eq!(seen.len(), 2);
    // Each request holds the directive plus every turn stored at send time.
    assert_eq!(seen[0].history.len(), 2);
    assert_eq!(seen[1].history.len(), 4);
    assert_eq!(seen[1].history[0].role, ChatRole::System);
    assert_eq!(seen[1].history[3].text, "second question");
}

#[tokio::test]
async fn directive_never_enters_the_transcript() {
    let gateway = ScriptedGateway::with(vec![Ok(reply("a")), Ok(reply("b"))]);
    let session = controller(gateway.clone());

    session.submit_turn("q1", URL).await.unwrap();
    session.submit_turn("q2", URL).await.unwrap();

    let directive = gateway.seen()[0].directive.clone();
    assert!(session
        .snapshot()
        .await
        .iter()
        .all(|turn| turn.text != directive));
}

#[tokio::test]
async fn reset_discards_in_flight_reply() {
    let gateway = ScriptedGateway::with(vec![Ok(reply("stale reply"))]);
    let session = controller(gateway);

    let pending = session.begin_turn("old question", URL).await.unwrap();
    let epoch = pending.epoch();

    session.reset().await;
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.epoch().await, epoch + 1);

    let outcome = pending.complete().await;
    assert_eq!(outcome, TurnOutcome::Discarded);
    assert!(session.snapshot().await.is_empty());
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn stale_reply_does_not_disturb_new_conversation() {
    let gateway = Arc::new(GatedGateway {
        gate: Semaphore::new(0),
        text: "late reply".into(),
    });
    let session = SessionController::new(gateway.clone());

    let old = session.begin_turn("old question", URL).await.unwrap();
    let old_call = tokio::spawn(old.complete());

    session.reset().await;
    let fresh = session.begin_turn("new question", URL).await.unwrap();
    assert_eq!(session.status(), SessionStatus::AwaitingReply);

    gateway.gate.add_permits(1);
    assert_eq!(old_call.await.unwrap(), TurnOutcome::Discarded);
    // The fresh turn is still pending; the stale reply must not have settled it.
    assert_eq!(session.status(), SessionStatus::AwaitingReply);

    gateway.gate.add_permits(1);
    let outcome = fresh.complete().await;
    assert!(matches!(outcome, TurnOutcome::Replied(_)));

    let texts: Vec<_> = session
        .snapshot()
        .await
        .into_iter()
        .map(|t| t.text)
        .collect();
    assert_eq!(texts, vec!["new question", "late reply"]);
}

#[tokio::test]
async fn reset_clears_transcript_and_usage() {
    let session = controller(ScriptedGateway::with(vec![Ok(reply("hi"))]));
    let first_id = session.session_id().await;

    session.submit_turn("hello", URL).await.unwrap();
    assert_eq!(session.usage().await.call_count(), 1);
    assert_eq!(session.usage().await.total_tokens(), 120);

    session.reset().await;
    assert!(session.snapshot().await.is_empty());
    assert_eq!(session.usage().await.call_count(), 0);
    assert_ne!(session.session_id().await, first_id);
}

#[tokio::test]
async fn subscribers_observe_status_transitions() {
    let session = controller(ScriptedGateway::with(vec![Ok(reply("ok"))]));
    let mut rx = session.subscribe();
    assert_eq!(*rx.borrow(), SessionStatus::Idle);

    let pending = session.begin_turn("q", URL).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SessionStatus::AwaitingReply);

    pending.complete().await;
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SessionStatus::Idle);
}

#[tokio::test]
async fn dropped_pending_turn_releases_the_session() {
    let gateway = ScriptedGateway::with(vec![]);
    let session = controller(gateway.clone());

    let pending = session.begin_turn("q", URL).await.unwrap();
    drop(pending);

    assert_eq!(session.status(), SessionStatus::Idle);
    let turns = session.snapshot().await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].text, FAILURE_NOTICE);
    assert!(gateway.seen().is_empty());
}

#[tokio::test]
async fn history_limit_applies_to_outgoing_requests() {
    let gateway = ScriptedGateway::with(vec![Ok(reply("a")), Ok(reply("b"))]);
    let session = SessionController::new(gateway.clone())
        .with_prompt_builder(PromptBuilder::new().with_history_limit(1));

    session.submit_turn("q1", URL).await.unwrap();
    session.submit_turn("q2", URL).await.unwrap();

    let seen = gateway.seen();
    assert_eq!(seen[1].history.len(), 2);
    assert_eq!(seen[1].history[1].text, "q2");
    assert_eq!(session.snapshot().await.len(), 4);
}

#[tokio::test]
async fn problem_ref_is_stored_trimmed() {
    let session = controller(ScriptedGateway::with(vec![Ok(reply("ok"))]));
    session
        .submit_turn("q", &format!("  {URL}  "))
        .await
        .unwrap();
    assert_eq!(session.snapshot().await[0].problem_ref.as_deref(), Some(URL));
}

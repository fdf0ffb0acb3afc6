use super::*;
use crate::application::tooling::{ProtocolError, ToolCatalog, ToolResultPayload};
use crate::model::{ModelError, ModelResponse};
use crate::rpc::types::ClientInfo;
use crate::types::{ToolDescriptor, history_is_consistent};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

const BAKERY: &str = "http://bakery.test";

struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ModelResponse, ModelError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<ModelResponse, ModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("provider called more times than scripted")
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RecordedCall {
    endpoint: String,
    session_id: String,
    tool: String,
    arguments: Value,
}

struct RecordingBridge {
    outcome: Mutex<Option<Result<ToolResultPayload, ProtocolError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingBridge {
    fn answering(outcome: Result<ToolResultPayload, ProtocolError>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Some(outcome)),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn unused() -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolServerInterface for RecordingBridge {
    async fn check_availability(&self, _endpoint: &str) -> bool {
        true
    }

    async fn register_session(&self, _: &str, _: &str) -> Result<(), ProtocolError> {
        Ok(())
    }

    async fn initialize(&self, _: &str, _: &str, _: &ClientInfo) -> Result<(), ProtocolError> {
        Ok(())
    }

    async fn list_tools(&self, _: &str, _: &str) -> Result<Vec<ToolDescriptor>, ProtocolError> {
        Ok(Vec::new())
    }

    async fn call_tool(
        &self,
        endpoint: &str,
        session_id: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<ToolResultPayload, ProtocolError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            session_id: session_id.to_string(),
            tool: tool.to_string(),
            arguments,
        });
        self.outcome
            .lock()
            .unwrap()
            .take()
            .expect("tool called more than once")
    }
}

fn settings() -> TurnSettings {
    TurnSettings {
        model: "claude-test".into(),
        max_tokens: 256,
        temperature: 0.7,
        system_prompt: Some("You sell cakes.".into()),
    }
}

fn bakery_session() -> Session {
    Session::new(
        "session-1",
        ToolCatalog::from_tools(vec![ToolDescriptor {
            name: "fetchWebsite".into(),
            description: "Fetch a web page".into(),
            input_schema: json!({"type": "object", "properties": {"url": {"type": "string"}}}),
            owner_endpoint: BAKERY.into(),
        }]),
    )
}

fn text_reply(parts: &[&str]) -> Result<ModelResponse, ModelError> {
    Ok(ModelResponse::new(
        parts.iter().map(|part| ContentBlock::text(*part)).collect(),
    ))
}

fn tool_use(id: &str, name: &str, input: Value) -> ContentBlock {
    ContentBlock::ToolUse {
        id: id.into(),
        name: name.into(),
        input,
    }
}

fn api_failure() -> ModelError {
    ModelError::Api {
        provider: "anthropic".into(),
        status: 529,
        body: "overloaded".into(),
    }
}

fn orchestrator(
    provider: &Arc<ScriptedProvider>,
    bridge: &Arc<RecordingBridge>,
) -> ConversationOrchestrator<ScriptedProvider> {
    let bridge: Arc<dyn ToolServerInterface> = bridge.clone();
    ConversationOrchestrator::new(Arc::clone(provider), bridge, settings())
}

#[tokio::test]
async fn plain_reply_joins_text_and_calls_no_tool() {
    let provider = Arc::new(ScriptedProvider::new(vec![text_reply(&[
        "We have chocolate cake.",
        "And lemon tarts.",
    ])]));
    let bridge = RecordingBridge::unused();
    let mut session = bakery_session();

    let outcome = orchestrator(&provider, &bridge)
        .run_turn(&mut session, "What cakes do you have?")
        .await
        .expect("turn succeeds");

    assert_eq!(
        outcome,
        TurnOutcome {
            response: "We have chocolate cake.\nAnd lemon tarts.".into(),
            tool_used: None,
        }
    );
    assert!(bridge.calls().is_empty());
    assert_eq!(session.history.len(), 2);

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].tools.len(), 1);
    assert_eq!(requests[0].system.as_deref(), Some("You sell cakes."));
    assert_eq!(requests[0].messages, vec![ChatMessage::user("What cakes do you have?")]);
}

#[tokio::test]
async fn tool_round_trip_dispatches_once_and_records_result() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(ModelResponse::new(vec![
            ContentBlock::text("Let me check the menu."),
            tool_use("toolu_1", "fetchWebsite", json!({"url": "https://flour.test/menu"})),
        ])),
        text_reply(&["The Midnight Chocolate cake is $58."]),
    ]));
    let bridge = RecordingBridge::answering(Ok(vec![json!({"type": "text", "text": "menu..."})]));
    let mut session = bakery_session();

    let outcome = orchestrator(&provider, &bridge)
        .run_turn(&mut session, "How much is the chocolate cake?")
        .await
        .expect("turn succeeds");

    assert_eq!(outcome.response, "The Midnight Chocolate cake is $58.");
    assert_eq!(outcome.tool_used.as_deref(), Some("fetchWebsite"));
    assert_eq!(
        bridge.calls(),
        vec![RecordedCall {
            endpoint: BAKERY.into(),
            session_id: "session-1".into(),
            tool: "fetchWebsite".into(),
            arguments: json!({"url": "https://flour.test/menu"}),
        }]
    );

    // user, assistant(tool_use), user(tool_result), assistant
    assert_eq!(session.history.len(), 4);
    assert_eq!(
        session.history[2],
        ChatMessage::tool_result("toolu_1", vec![json!({"type": "text", "text": "menu..."})])
    );
    assert_eq!(
        session
            .history
            .iter()
            .flat_map(|message| message.tool_result_ids())
            .count(),
        1
    );
    assert!(history_is_consistent(&session.history));

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages.len(), 3);
}

#[tokio::test]
async fn only_first_tool_use_is_dispatched() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(ModelResponse::new(vec![
            tool_use("toolu_1", "fetchWebsite", json!({"url": "a"})),
            tool_use("toolu_2", "fetchWebsite", json!({"url": "b"})),
            tool_use("toolu_3", "fetchWebsite", json!({"url": "c"})),
        ])),
        text_reply(&["done"]),
    ]));
    let bridge = RecordingBridge::answering(Ok(vec![json!({"type": "text", "text": "page"})]));
    let mut session = bakery_session();

    orchestrator(&provider, &bridge)
        .run_turn(&mut session, "compare three pages")
        .await
        .expect("turn succeeds");

    let calls = bridge.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].arguments, json!({"url": "a"}));

    let stored_ids: Vec<&str> = session
        .history
        .iter()
        .flat_map(|message| message.tool_use_ids())
        .collect();
    assert_eq!(stored_ids, vec!["toolu_1"]);
    assert!(history_is_consistent(&session.history));
    assert_eq!(provider.requests()[1].messages.len(), 3);
}

#[tokio::test]
async fn empty_tool_payload_is_replaced_by_placeholder() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(ModelResponse::new(vec![tool_use("toolu_1", "fetchWebsite", json!({}))])),
        text_reply(&["Nothing there."]),
    ]));
    let bridge = RecordingBridge::answering(Ok(Vec::new()));
    let mut session = bakery_session();

    orchestrator(&provider, &bridge)
        .run_turn(&mut session, "check")
        .await
        .expect("turn succeeds");

    assert_eq!(
        session.history[2],
        ChatMessage::tool_result(
            "toolu_1",
            vec![json!({"type": "text", "text": "No content returned"})]
        )
    );
}

#[tokio::test]
async fn empty_blocks_are_not_stored() {
    let provider = Arc::new(ScriptedProvider::new(vec![text_reply(&["", "  ", "Hello!"])]));
    let bridge = RecordingBridge::unused();
    let mut session = bakery_session();

    let outcome = orchestrator(&provider, &bridge)
        .run_turn(&mut session, "hi")
        .await
        .expect("turn succeeds");

    assert_eq!(outcome.response, "Hello!");
    assert_eq!(session.history[1].blocks(), &[ContentBlock::text("Hello!")]);
}

#[tokio::test]
async fn unknown_tool_rolls_back_the_turn() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        text_reply(&["Welcome!"]),
        Ok(ModelResponse::new(vec![tool_use("toolu_9", "orderPizza", json!({}))])),
    ]));
    let bridge = RecordingBridge::unused();
    let mut session = bakery_session();
    let orchestrator = orchestrator(&provider, &bridge);

    orchestrator.run_turn(&mut session, "hi").await.expect("first turn");
    let before = session.history.clone();

    let err = orchestrator
        .run_turn(&mut session, "order a pizza")
        .await
        .expect_err("unknown tool");

    assert!(matches!(&err, TurnError::UnknownTool { tool } if tool == "orderPizza"));
    assert_eq!(err.user_message(), "Tool orderPizza not found in any connected server");
    assert_eq!(session.history, before);
    assert!(bridge.calls().is_empty());
}

#[tokio::test]
async fn dispatch_failure_rolls_back_and_carries_remote_text() {
    let provider = Arc::new(ScriptedProvider::new(vec![Ok(ModelResponse::new(vec![
        tool_use("toolu_1", "fetchWebsite", json!({"url": "x"})),
    ]))]));
    let bridge = RecordingBridge::answering(Err(ProtocolError::Status {
        endpoint: BAKERY.into(),
        status: 500,
        body: "upstream exploded".into(),
    }));
    let mut session = bakery_session();

    let err = orchestrator(&provider, &bridge)
        .run_turn(&mut session, "menu?")
        .await
        .expect_err("dispatch fails");

    assert!(matches!(err, TurnError::ToolDispatchFailed { ref tool, .. } if tool == "fetchWebsite"));
    assert!(err.user_message().contains("upstream exploded"));
    assert!(session.history.is_empty());
}

#[tokio::test]
async fn failed_follow_up_call_also_restores_history() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(ModelResponse::new(vec![tool_use("toolu_1", "fetchWebsite", json!({}))])),
        Err(api_failure()),
    ]));
    let bridge = RecordingBridge::answering(Ok(vec![json!({"type": "text", "text": "menu"})]));
    let mut session = bakery_session();

    let err = orchestrator(&provider, &bridge)
        .run_turn(&mut session, "menu?")
        .await
        .expect_err("follow-up fails");

    assert!(matches!(err, TurnError::LlmCallFailed(ModelError::Api { status: 529, .. })));
    assert_eq!(bridge.calls().len(), 1);
    assert!(session.history.is_empty());
}

#[tokio::test]
async fn failed_first_call_leaves_no_user_message() {
    let provider = Arc::new(ScriptedProvider::new(vec![Err(api_failure())]));
    let bridge = RecordingBridge::unused();
    let mut session = bakery_session();

    orchestrator(&provider, &bridge)
        .run_turn(&mut session, "hello?")
        .await
        .expect_err("model down");

    assert!(session.history.is_empty());
}

#[tokio::test]
async fn follow_up_tool_requests_are_not_stored() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(ModelResponse::new(vec![tool_use("toolu_1", "fetchWebsite", json!({}))])),
        Ok(ModelResponse::new(vec![
            ContentBlock::text("Here it is."),
            tool_use("toolu_2", "fetchWebsite", json!({})),
        ])),
    ]));
    let bridge = RecordingBridge::answering(Ok(vec![json!({"type": "text", "text": "menu"})]));
    let mut session = bakery_session();

    let outcome = orchestrator(&provider, &bridge)
        .run_turn(&mut session, "menu?")
        .await
        .expect("turn succeeds");

    assert_eq!(outcome.response, "Here it is.");
    assert_eq!(bridge.calls().len(), 1);
    assert_eq!(session.history[3].blocks(), &[ContentBlock::text("Here it is.")]);
    assert!(history_is_consistent(&session.history));
}

#[tokio::test]
async fn history_stays_consistent_across_mixed_turns() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        text_reply(&["Hi there"]),
        Ok(ModelResponse::new(vec![tool_use("toolu_1", "fetchWebsite", json!({}))])),
        text_reply(&["Menu loaded"]),
        Ok(ModelResponse::new(vec![tool_use("toolu_2", "missingTool", json!({}))])),
        text_reply(&["Anything else?"]),
    ]));
    let bridge = RecordingBridge::answering(Ok(vec![json!({"type": "text", "text": "menu"})]));
    let mut session = bakery_session();
    let orchestrator = orchestrator(&provider, &bridge);

    for utterance in ["hello", "show menu", "use the missing tool", "thanks"] {
        let _ = orchestrator.run_turn(&mut session, utterance).await;
        assert!(history_is_consistent(&session.history));
    }
    // 2 + 4 + 0 (rolled back) + 2
    assert_eq!(session.history.len(), 8);
}

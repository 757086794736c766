use super::*;
use skycall_llm_sdk::openai::types::{
    OpenAIChoice, OpenAIFunctionCall, OpenAIRole, OpenAIToolCall, OpenAIUsage,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned responses and records every request it receives
struct ScriptedClient {
    responses: Mutex<VecDeque<OpenAIChatCompletionResponse>>,
    requests: Mutex<Vec<OpenAIChatCompletionRequest>>,
}

impl ScriptedClient {
    fn new(responses: Vec<OpenAIChatCompletionResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<OpenAIChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn create_chat_completion(
        &self,
        request: OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::internal("No scripted response left"))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

struct FakeWeather {
    reply: String,
    locations: Mutex<Vec<String>>,
}

impl FakeWeather {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            locations: Mutex::new(Vec::new()),
        })
    }

    fn locations(&self) -> Vec<String> {
        self.locations.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherLookup for FakeWeather {
    async fn lookup(&self, location: &str) -> String {
        self.locations.lock().unwrap().push(location.to_string());
        self.reply.clone()
    }
}

fn response_with(message: OpenAIMessage, finish_reason: &str) -> OpenAIChatCompletionResponse {
    OpenAIChatCompletionResponse {
        id: "chatcmpl-test".to_string(),
        object: "chat.completion".to_string(),
        created: 0,
        model: "gpt-4o".to_string(),
        choices: vec![OpenAIChoice {
            index: 0,
            message,
            finish_reason: Some(finish_reason.to_string()),
        }],
        usage: OpenAIUsage::default(),
    }
}

fn text_response(text: &str) -> OpenAIChatCompletionResponse {
    response_with(OpenAIMessage::assistant(text), "stop")
}

fn tool_call(id: &str, name: &str, arguments: &str) -> OpenAIToolCall {
    OpenAIToolCall {
        id: id.to_string(),
        r#type: "function".to_string(),
        function: OpenAIFunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
    }
}

fn tool_response(calls: Vec<OpenAIToolCall>) -> OpenAIChatCompletionResponse {
    response_with(OpenAIMessage::assistant_with_tools(None, calls), "tool_calls")
}

const DA_NANG_SENTENCE: &str =
    "The current temperature in Da Nang, Vietnam is 72°F with clear sky";

#[tokio::test]
async fn test_text_answer_is_returned_after_one_request() {
    let client = ScriptedClient::new(vec![text_response("It is always sunny somewhere.")]);
    let weather = FakeWeather::new(DA_NANG_SENTENCE);
    let agent = WeatherAgent::new(client.clone(), weather.clone(), "gpt-4o").unwrap();

    let answer = agent.run("Tell me a joke").await.unwrap();

    assert_eq!(answer, "It is always sunny somewhere.");
    assert_eq!(client.requests().len(), 1);
    assert!(weather.locations().is_empty());
}

#[tokio::test]
async fn test_tool_request_round_trip() {
    let client = ScriptedClient::new(vec![
        tool_response(vec![tool_call(
            "call_dn_1",
            GET_CURRENT_WEATHER,
            r#"{"location":"Da Nang, Vietnam"}"#,
        )]),
        text_response("It's 72°F and clear in Da Nang right now."),
    ]);
    let weather = FakeWeather::new(DA_NANG_SENTENCE);
    let agent = WeatherAgent::new(client.clone(), weather.clone(), "gpt-4o").unwrap();

    let answer = agent.run(DEFAULT_PROMPT).await.unwrap();
    assert_eq!(answer, "It's 72°F and clear in Da Nang right now.");
    assert_eq!(weather.locations(), vec!["Da Nang, Vietnam".to_string()]);

    let requests = client.requests();
    assert_eq!(requests.len(), 2);

    // First request: just the user prompt
    assert_eq!(requests[0].messages, vec![OpenAIMessage::user(DEFAULT_PROMPT)]);

    // Second request: prior messages untouched, then call and result
    let second = &requests[1].messages;
    assert_eq!(second.len(), 3);
    assert_eq!(second[0], requests[0].messages[0]);
    assert_eq!(second[1].role, OpenAIRole::Assistant);
    let issued = second[1].tool_calls.as_ref().unwrap();
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].id, "call_dn_1");
    assert_eq!(second[2].role, OpenAIRole::Tool);
    assert_eq!(second[2].tool_call_id.as_deref(), Some("call_dn_1"));
    assert_eq!(second[2].content.as_deref(), Some(DA_NANG_SENTENCE));
}

#[tokio::test]
async fn test_requests_carry_strict_tool_and_single_call_hint() {
    let client = ScriptedClient::new(vec![text_response("ok")]);
    let agent = WeatherAgent::new(client.clone(), FakeWeather::new(""), "gpt-4o-mini").unwrap();

    agent.run("hi").await.unwrap();

    let request = &client.requests()[0];
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.parallel_tool_calls, Some(false));
    assert_eq!(request.tool_choice, Some(serde_json::json!("auto")));
    let tools = request.tools.as_ref().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].function.name, GET_CURRENT_WEATHER);
    assert_eq!(tools[0].function.strict, Some(true));
}

#[tokio::test]
async fn test_only_first_of_several_tool_calls_is_served() {
    let client = ScriptedClient::new(vec![
        tool_response(vec![
            tool_call("call_a", GET_CURRENT_WEATHER, r#"{"location":"Hanoi"}"#),
            tool_call("call_b", GET_CURRENT_WEATHER, r#"{"location":"Hue"}"#),
        ]),
        text_response("Hanoi is mild."),
    ]);
    let weather = FakeWeather::new("The current temperature in Hanoi is 70°F with overcast");
    let agent = WeatherAgent::new(client.clone(), weather.clone(), "gpt-4o").unwrap();

    let answer = agent.run("Weather in Hanoi and Hue?").await.unwrap();
    assert_eq!(answer, "Hanoi is mild.");
    assert_eq!(weather.locations(), vec!["Hanoi".to_string()]);

    let second = &client.requests()[1].messages;
    let issued = second[1].tool_calls.as_ref().unwrap();
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].id, "call_a");
    assert_eq!(second[2].tool_call_id.as_deref(), Some("call_a"));
}

#[tokio::test]
async fn test_unknown_tool_is_an_error() {
    let client = ScriptedClient::new(vec![tool_response(vec![tool_call(
        "call_x",
        "get_stock_price",
        r#"{"ticker":"ACME"}"#,
    )])]);
    let weather = FakeWeather::new("");
    let agent = WeatherAgent::new(client.clone(), weather.clone(), "gpt-4o").unwrap();

    let err = agent.run("ACME price?").await.unwrap_err();
    match err {
        AgentError::UnknownTool { name } => assert_eq!(name, "get_stock_price"),
        other => panic!("Expected unknown tool error, got: {:?}", other),
    }
    assert_eq!(client.requests().len(), 1);
    assert!(weather.locations().is_empty());
}

#[tokio::test]
async fn test_unexpected_argument_fields_are_rejected() {
    let client = ScriptedClient::new(vec![tool_response(vec![tool_call(
        "call_1",
        GET_CURRENT_WEATHER,
        r#"{"location":"Hue","unit":"celsius"}"#,
    )])]);
    let weather = FakeWeather::new("");
    let agent = WeatherAgent::new(client.clone(), weather.clone(), "gpt-4o").unwrap();

    let err = agent.run("Weather in Hue?").await.unwrap_err();
    assert!(matches!(
        err,
        AgentError::Llm(LlmError::ToolArgumentParse { .. })
    ));
    assert!(weather.locations().is_empty());
}

#[tokio::test]
async fn test_missing_location_is_rejected() {
    let client = ScriptedClient::new(vec![tool_response(vec![tool_call(
        "call_1",
        GET_CURRENT_WEATHER,
        "{}",
    )])]);
    let agent = WeatherAgent::new(client, FakeWeather::new(""), "gpt-4o").unwrap();

    assert!(matches!(
        agent.run("Weather?").await,
        Err(AgentError::Llm(LlmError::ToolArgumentParse { .. }))
    ));
}

#[tokio::test]
async fn test_lookup_error_text_is_relayed_to_model() {
    let client = ScriptedClient::new(vec![
        tool_response(vec![tool_call(
            "call_1",
            GET_CURRENT_WEATHER,
            r#"{"location":"Atlantis"}"#,
        )]),
        text_response("I couldn't find Atlantis."),
    ]);
    let weather = FakeWeather::new("Error: Could not find location 'Atlantis'");
    let agent = WeatherAgent::new(client.clone(), weather, "gpt-4o").unwrap();

    let answer = agent.run("Weather in Atlantis?").await.unwrap();
    assert_eq!(answer, "I couldn't find Atlantis.");
    assert_eq!(
        client.requests()[1].messages[2].content.as_deref(),
        Some("Error: Could not find location 'Atlantis'")
    );
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let mut empty = text_response("unused");
    empty.choices.clear();
    let client = ScriptedClient::new(vec![empty]);
    let agent = WeatherAgent::new(client, FakeWeather::new(""), "gpt-4o").unwrap();

    assert!(matches!(
        agent.run("hi").await,
        Err(AgentError::EmptyResponse)
    ));
}

#[tokio::test]
async fn test_unknown_tool_wins_over_malformed_arguments() {
    let client = ScriptedClient::new(vec![tool_response(vec![tool_call(
        "call_x",
        "get_stock_price",
        "{ticker: ACME",
    )])]);
    let agent = WeatherAgent::new(client, FakeWeather::new(""), "gpt-4o").unwrap();

    match agent.run("ACME price?").await {
        Err(AgentError::UnknownTool { name }) => assert_eq!(name, "get_stock_price"),
        other => panic!("Expected unknown tool error, got: {:?}", other),
    }
}

fn follow_up_with_tool(content: &str, arguments: &str) -> OpenAIChatCompletionResponse {
    response_with(
        OpenAIMessage::assistant_with_tools(
            Some(content.to_string()),
            vec![tool_call("call_2", GET_CURRENT_WEATHER, arguments)],
        ),
        "tool_calls",
    )
}

#[tokio::test]
async fn test_follow_up_tool_request_returns_its_text() {
    let client = ScriptedClient::new(vec![
        tool_response(vec![tool_call(
            "call_1",
            GET_CURRENT_WEATHER,
            r#"{"location":"Da Nang, Vietnam"}"#,
        )]),
        follow_up_with_tool("partial answer", r#"{"location":"Hue"}"#),
    ]);
    let weather = FakeWeather::new(DA_NANG_SENTENCE);
    let agent = WeatherAgent::new(client.clone(), weather.clone(), "gpt-4o").unwrap();

    let answer = agent.run(DEFAULT_PROMPT).await.unwrap();
    assert_eq!(answer, "partial answer");
    assert_eq!(client.requests().len(), 2);
    assert_eq!(weather.locations(), vec!["Da Nang, Vietnam".to_string()]);
}

#[tokio::test]
async fn test_follow_up_tool_request_with_malformed_arguments_returns_its_text() {
    let client = ScriptedClient::new(vec![
        tool_response(vec![tool_call(
            "call_1",
            GET_CURRENT_WEATHER,
            r#"{"location":"Da Nang, Vietnam"}"#,
        )]),
        follow_up_with_tool("partial answer", "{not json"),
    ]);
    let agent = WeatherAgent::new(client, FakeWeather::new(DA_NANG_SENTENCE), "gpt-4o").unwrap();

    assert_eq!(agent.run(DEFAULT_PROMPT).await.unwrap(), "partial answer");
}

#[tokio::test]
async fn test_follow_up_tool_request_without_text_returns_empty() {
    let client = ScriptedClient::new(vec![
        tool_response(vec![tool_call(
            "call_1",
            GET_CURRENT_WEATHER,
            r#"{"location":"Hue"}"#,
        )]),
        tool_response(vec![tool_call(
            "call_2",
            GET_CURRENT_WEATHER,
            r#"{"location":"Hanoi"}"#,
        )]),
    ]);
    let agent = WeatherAgent::new(client, FakeWeather::new("sunny"), "gpt-4o").unwrap();

    assert_eq!(agent.run("Weather in Hue?").await.unwrap(), "");
}

#[test]
fn test_model_reply_classification() {
    let reply = ModelReply::from_response(&text_response("plain")).unwrap();
    assert_eq!(reply, ModelReply::TextAnswer("plain".to_string()));

    // Arguments stay undecoded until the call is served
    let raw = tool_call("call_1", GET_CURRENT_WEATHER, "{not json");
    let reply = ModelReply::from_response(&tool_response(vec![raw.clone()])).unwrap();
    assert_eq!(reply, ModelReply::ToolRequest(raw));

    let reply = ModelReply::from_response(&tool_response(vec![tool_call(
        "call_1",
        GET_CURRENT_WEATHER,
        r#"{"location":"Hue"}"#,
    )]))
    .unwrap();
    match reply {
        ModelReply::ToolRequest(raw) => {
            let call = raw.to_tool_call().unwrap();
            assert_eq!(call.id(), "call_1");
            let args: GetWeatherArgs = call.parse_arguments().unwrap();
            assert_eq!(
                args,
                GetWeatherArgs {
                    location: "Hue".to_string()
                }
            );
        }
        other => panic!("Expected tool request, got: {:?}", other),
    }
}

//! The Assistant orchestrator — one user message in, one committed reply out.
//!
//! `handle_message` appends the user message, then alternates generation
//! rounds with function dispatch until a round yields no detectable call.
//! Two ceilings keep a confused model from looping forever: a per-turn
//! round cap, and an identical-call cap that stops re-dispatching the same
//! (name, args) pair.

use crate::dispatch::Dispatcher;
use crate::extract::extract_function_call;
use crate::generate::generate;
use crate::prompt::system_prompt;
use marquee_core::{
    CompletionClient, CompletionRequest, Error, FunctionCall, Message, OutputSink, Transcript,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Assistant {
    client: Arc<dyn CompletionClient>,
    dispatcher: Dispatcher,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    max_rounds: u32,
    repeat_limit: u32,
}

impl Assistant {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        dispatcher: Dispatcher,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            dispatcher,
            model: model.into(),
            temperature: 0.2,
            max_tokens: Some(500),
            max_rounds: 8,
            repeat_limit: 3,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Cap on generation rounds per user message.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Cap on dispatches of an identical (name, args) call per user message.
    pub fn with_repeat_limit(mut self, repeat_limit: u32) -> Self {
        self.repeat_limit = repeat_limit.max(1);
        self
    }

    /// Start a fresh session seeded with the instruction prompt for this
    /// assistant's capability set.
    pub fn new_transcript(&self) -> Transcript {
        Transcript::new(system_prompt(self.dispatcher.capabilities()))
    }

    /// Process one user message to completion.
    ///
    /// Appends the user message, runs the generate / extract / dispatch
    /// loop, commits the final reply as an assistant message, and returns
    /// its text. Function-call JSON and function results pass through the
    /// transcript only as system messages, never as assistant ones.
    pub async fn handle_message(
        &self,
        transcript: &mut Transcript,
        user_text: &str,
        sink: &dyn OutputSink,
    ) -> Result<String, Error> {
        transcript.push(Message::user(user_text));
        info!(session = %transcript.id, "Handling user message");

        let mut dispatch_counts: HashMap<String, u32> = HashMap::new();
        let mut last_text = String::new();

        for round in 1..=self.max_rounds {
            let request = CompletionRequest {
                model: self.model.clone(),
                messages: transcript.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let text = generate(self.client.as_ref(), request, sink).await?;
            last_text = text.clone();

            let Some(call) = extract_function_call(&text) else {
                transcript.push(Message::assistant(&text));
                debug!(round, "Turn complete");
                return Ok(text);
            };

            debug!(round, function = %call.function_name, "Function call detected");

            let key = repeat_key(&call);
            let count = dispatch_counts.entry(key).or_insert(0);
            *count += 1;
            if *count > self.repeat_limit {
                warn!(
                    function = %call.function_name,
                    limit = self.repeat_limit,
                    "Identical call repeated past the limit"
                );
                transcript.push(Message::system(format!(
                    "Function '{}' has already been called {} times with identical \
                     arguments. Do not call it again; answer the user with the \
                     information already available.",
                    call.function_name, self.repeat_limit
                )));
                continue;
            }

            let result = self.dispatcher.dispatch(&call).await;
            transcript.push(Message::system(result));
        }

        // Round ceiling reached; keep the last round's output as the reply
        // so the transcript ends on an assistant message.
        warn!(max_rounds = self.max_rounds, "Round ceiling reached");
        transcript.push(Message::assistant(&last_text));
        Ok(last_text)
    }
}

/// Identity of a dispatch for repeat counting. serde_json::Map serializes
/// with sorted keys, so equal argument sets produce equal keys regardless
/// of the order the model wrote them in.
fn repeat_key(call: &FunctionCall) -> String {
    format!(
        "{}:{}",
        call.function_name,
        serde_json::Value::Object(call.args.clone())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use marquee_core::error::{FunctionError, ProviderError};
    use marquee_core::function::CapabilitySet;
    use marquee_core::sink::NullSink;
    use marquee_core::MovieData;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed sequence of responses, one per generation round.
    struct ScriptedClient {
        responses: Mutex<VecDeque<String>>,
    }

    impl ScriptedClient {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<String, ProviderError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ProviderError::StreamInterrupted("script exhausted".into()))
        }
    }

    struct StubMovies;

    #[async_trait]
    impl MovieData for StubMovies {
        async fn now_playing(&self) -> Result<String, FunctionError> {
            Ok("1. Despicable Me 4\n2. Twisters".into())
        }

        async fn showtimes(&self, title: &str, location: &str) -> Result<String, FunctionError> {
            Ok(format!("Showtimes for {title} in {location}: 7:00pm"))
        }

        async fn buy_ticket(&self, _: &str, _: &str, _: &str) -> Result<String, FunctionError> {
            Ok("pending confirmation".into())
        }

        async fn confirm_ticket_purchase(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<String, FunctionError> {
            Ok("Ticket purchased!".into())
        }

        async fn reviews(&self, movie_id: &str) -> Result<String, FunctionError> {
            Ok(format!("Reviews for {movie_id}"))
        }
    }

    fn assistant(client: Arc<dyn CompletionClient>) -> Assistant {
        let dispatcher = Dispatcher::new(Arc::new(StubMovies), CapabilitySet::two_step());
        Assistant::new(client, dispatcher, "gpt-4o-mini")
    }

    #[tokio::test]
    async fn plain_reply_commits_directly() {
        let client = ScriptedClient::new(&["Christopher Nolan directed The Dark Knight."]);
        let assistant = assistant(client);
        let mut transcript = assistant.new_transcript();

        let reply = assistant
            .handle_message(&mut transcript, "Who directed The Dark Knight?", &NullSink)
            .await
            .unwrap();

        assert_eq!(reply, "Christopher Nolan directed The Dark Knight.");
        // system prompt, user, assistant
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last_assistant().unwrap().content, reply);
    }

    #[tokio::test]
    async fn function_round_feeds_result_back_as_system_message() {
        let client = ScriptedClient::new(&[
            r#"{"function_name": "get_now_playing_movies", "args": {}}"#,
            "Now playing: Despicable Me 4 and Twisters.",
        ]);
        let assistant = assistant(client);
        let mut transcript = assistant.new_transcript();

        let reply = assistant
            .handle_message(&mut transcript, "What's playing?", &NullSink)
            .await
            .unwrap();

        assert_eq!(reply, "Now playing: Despicable Me 4 and Twisters.");
        // system prompt, user, function result (system), assistant
        assert_eq!(transcript.len(), 4);
        assert_eq!(
            transcript.messages[2].role,
            marquee_core::Role::System
        );
        assert!(transcript.messages[2].content.contains("Despicable Me 4"));
        // The raw call JSON never lands in the transcript
        assert!(!transcript
            .messages
            .iter()
            .any(|m| m.content.contains("function_name")));
    }

    #[tokio::test]
    async fn unknown_function_result_reaches_the_model() {
        let client = ScriptedClient::new(&[
            r#"{"function_name": "foo", "args": {}}"#,
            "I can't do that, sorry.",
        ]);
        let assistant = assistant(client);
        let mut transcript = assistant.new_transcript();

        assistant
            .handle_message(&mut transcript, "Do the foo", &NullSink)
            .await
            .unwrap();

        assert!(transcript.messages[2]
            .content
            .contains("Unknown function 'foo' cannot be called"));
    }

    #[tokio::test]
    async fn ill_typed_call_object_dispatches_instead_of_committing_as_prose() {
        let client = ScriptedClient::new(&[
            r#"{"function_name": 3, "args": {}}"#,
            "Sorry, I can't help with that.",
        ]);
        let assistant = assistant(client);
        let mut transcript = assistant.new_transcript();

        let reply = assistant
            .handle_message(&mut transcript, "Do the thing", &NullSink)
            .await
            .unwrap();

        // The object is a detected call despite the non-string name; the
        // unknown-name result goes back to the model rather than the raw
        // JSON becoming the assistant reply.
        assert_eq!(reply, "Sorry, I can't help with that.");
        assert!(transcript.messages[2]
            .content
            .contains("Unknown function '3' cannot be called"));
    }

    #[tokio::test]
    async fn repeated_identical_call_is_cut_off() {
        let call = r#"{"function_name": "get_now_playing_movies", "args": {}}"#;
        // repeat_limit 2: two dispatches, then a cut-off notice, then prose.
        let client = ScriptedClient::new(&[call, call, call, "Here is what I found."]);
        let assistant = assistant(client).with_repeat_limit(2);
        let mut transcript = assistant.new_transcript();

        let reply = assistant
            .handle_message(&mut transcript, "What's playing?", &NullSink)
            .await
            .unwrap();

        assert_eq!(reply, "Here is what I found.");
        let cut_off = transcript
            .messages
            .iter()
            .filter(|m| m.content.contains("Do not call it again"))
            .count();
        assert_eq!(cut_off, 1);
    }

    #[tokio::test]
    async fn round_ceiling_commits_last_output() {
        let call = r#"{"function_name": "get_showtimes", "args": {"title": "Dune"}}"#;
        let client = ScriptedClient::new(&[call, call, call]);
        // repeat_limit above the ceiling so only the ceiling fires.
        let assistant = assistant(client).with_max_rounds(3).with_repeat_limit(10);
        let mut transcript = assistant.new_transcript();

        let reply = assistant
            .handle_message(&mut transcript, "Showtimes for Dune", &NullSink)
            .await
            .unwrap();

        // The last round's raw output becomes the committed reply.
        assert_eq!(reply, call);
        assert_eq!(transcript.last_assistant().unwrap().content, call);
    }

    #[tokio::test]
    async fn provider_failure_leaves_transcript_at_user_message() {
        let client = ScriptedClient::new(&[]);
        let assistant = assistant(client);
        let mut transcript = assistant.new_transcript();

        let result = assistant
            .handle_message(&mut transcript, "hello", &NullSink)
            .await;

        assert!(result.is_err());
        // system prompt + user; the failed round appended nothing.
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn repeat_key_is_order_insensitive() {
        let a = FunctionCall {
            function_name: "get_showtimes".into(),
            args: serde_json::from_str(r#"{"title": "Dune", "location": "94110"}"#).unwrap(),
        };
        let b = FunctionCall {
            function_name: "get_showtimes".into(),
            args: serde_json::from_str(r#"{"location": "94110", "title": "Dune"}"#).unwrap(),
        };
        assert_eq!(repeat_key(&a), repeat_key(&b));
    }
}

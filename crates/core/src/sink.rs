//! OutputSink trait — the user-visible message surface.
//!
//! The response generator emits every token to the sink as it arrives from
//! the model, then commits the assembled text exactly once. The CLI
//! implements this by printing to stdout; tests collect into a buffer.

use async_trait::async_trait;

/// The incremental output surface for one generation round.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Emit one token as it is produced.
    async fn emit(&self, token: &str);

    /// Commit the fully assembled response text. Called exactly once per
    /// generation round, after the last `emit`.
    async fn commit(&self, text: &str);
}

/// A sink that discards everything. Useful when a generation round's raw
/// output must not reach the user (and in tests).
pub struct NullSink;

#[async_trait]
impl OutputSink for NullSink {
    async fn emit(&self, _token: &str) {}
    async fn commit(&self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    pub struct CollectingSink {
        pub tokens: Mutex<Vec<String>>,
        pub committed: Mutex<Option<String>>,
    }

    #[async_trait]
    impl OutputSink for CollectingSink {
        async fn emit(&self, token: &str) {
            self.tokens.lock().unwrap().push(token.to_string());
        }

        async fn commit(&self, text: &str) {
            *self.committed.lock().unwrap() = Some(text.to_string());
        }
    }

    #[tokio::test]
    async fn collecting_sink_accumulates() {
        let sink = CollectingSink {
            tokens: Mutex::new(vec![]),
            committed: Mutex::new(None),
        };
        sink.emit("Hel").await;
        sink.emit("lo").await;
        sink.commit("Hello").await;

        assert_eq!(sink.tokens.lock().unwrap().join(""), "Hello");
        assert_eq!(sink.committed.lock().unwrap().as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn null_sink_accepts_anything() {
        NullSink.emit("token").await;
        NullSink.commit("text").await;
    }
}

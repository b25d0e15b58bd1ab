//! Stdout output sink — streams tokens to the terminal as they arrive.

use async_trait::async_trait;
use marquee_core::OutputSink;
use std::io::Write;

pub struct StdoutSink;

#[async_trait]
impl OutputSink for StdoutSink {
    async fn emit(&self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    async fn commit(&self, _text: &str) {
        // Tokens already reached the terminal; just end the line.
        println!();
        let _ = std::io::stdout().flush();
    }
}

//! # Marquee Core
//!
//! Domain types, traits, and error definitions for the Marquee movie
//! assistant. This crate stays at the domain layer — no HTTP, no CLI, no
//! backend code — carrying only the primitives its trait seams need
//! (async-trait, tokio's mpsc for stream chunks). All other crates
//! implement against the model defined here.
//!
//! ## Design Philosophy
//!
//! Every external seam is defined as a trait here: the completion backend
//! (`CompletionClient`), the movie-data collaborators (`MovieData`), and
//! the user-visible output surface (`OutputSink`). Implementations live in
//! their respective crates, so the assistant loop can be tested with
//! scripted fakes and wired to real services by the CLI.

pub mod completion;
pub mod error;
pub mod function;
pub mod message;
pub mod sink;

// Re-export key types at crate root for ergonomics
pub use completion::{CompletionClient, CompletionRequest, StreamChunk, Usage};
pub use error::{Error, FunctionError, ProviderError, Result};
pub use function::{Capability, CapabilitySet, FunctionCall, MovieData};
pub use message::{Message, Role, SessionId, Transcript};
pub use sink::OutputSink;

//! The core turn loop — the heart of Marquee.
//!
//! Each user message drives one **turn**:
//!
//! 1. **Append** the user message to the transcript
//! 2. **Generate** a streamed response over the full transcript
//! 3. **Extract**: scan the response for an embedded JSON function call
//! 4. **If a call is found**: dispatch it, append the text result as a
//!    system message, loop back to step 2
//! 5. **If not**: commit the response as the assistant message
//!
//! The loop continues until a generation round yields no detectable call,
//! or the round ceiling / identical-call limit cuts it short.

pub mod dispatch;
pub mod extract;
pub mod generate;
pub mod prompt;
pub mod turn;

pub use dispatch::Dispatcher;
pub use extract::extract_function_call;
pub use generate::generate;
pub use prompt::system_prompt;
pub use turn::Assistant;

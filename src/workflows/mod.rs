//! Workflows
//!
//! Workflows compose agents and tools into fixed sequences:
//!
//! - [`pipeline`] - the sequential [`Pipeline`] and its [`WorkflowOutput`]
//! - [`story`] - the deterministic, advanced and combined story flows
//!
//! # Usage
//!
//! ```ignore
//! let output = story::deterministic_story()
//!     .run(&runner, "a cat named Whiskers", &NoopHooks)
//!     .await?;
//! println!("Final response: {}", output.final_response);
//! println!("Steps: {:?}", output.reasoning_path);
//! ```

pub mod pipeline;
pub mod story;

pub use pipeline::{Pipeline, Step, WorkflowOutput, WorkflowStep};

//! Built-in tools for agents and pipelines
//!
//! Each tool is a small, deterministic function exposed to the model through a
//! JSON-schema description. Agents are only offered the tools they list by
//! name; pipelines call tools directly through the [`ToolRegistry`].
//!
//! # Module Structure
//!
//! - [`registry`] - the [`Tool`] trait and tool registration/dispatch
//! - [`greeting`] - canned greeting
//! - [`story`] - outlines, story bodies and endings
//! - [`text`] - echo, concatenation, uppercase
//! - [`math`] - addition and multiplication
//! - [`datetime`] - current time and date arithmetic
//! - [`data`] - mock data source and list helpers
//!
//! # Example
//!
//! ```ignore
//! let registry = ToolRegistry::with_default_tools();
//! let out = registry.execute("echo", json!({"message": "hi"})).await?;
//! assert_eq!(out, "Echo: hi");
//! ```

/// Mock data and list tools.
pub mod data;
/// Date and time tools.
pub mod datetime;
/// Greeting tool.
pub mod greeting;
/// Arithmetic tools.
pub mod math;
/// Tool registry for managing available tools.
pub mod registry;
/// Story outline and writing tools.
pub mod story;
/// Text manipulation tools.
pub mod text;

pub use registry::{output_text, parse_args, Tool, ToolRegistry};
pub use story::StoryOutline;

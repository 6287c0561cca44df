//! HTTP API handlers and routes
//!
//! # Module Structure
//!
//! - [`handlers`] - request handlers, one module per endpoint group
//! - [`routes`] - router configuration
//! - [`extract`] - the validating JSON extractor
//! - [`openapi`] - the OpenAPI document
//!
//! # API Endpoints
//!
//! ## Health
//! - `GET /` - service banner
//! - `GET /health` - health check with the default model
//!
//! ## Hello world (`/agent`)
//! - `POST /agent/hello` - hello agent
//! - `POST /agent/deterministic` - outline, story and ending tools in sequence
//!
//! ## Story (`/agents/story`)
//! - `POST /agents/story/{baseline,custom,advanced}`
//!
//! ## Basic agents (`/agents/basic`)
//! - `POST /agents/basic/generic-lifecycle/execute`
//! - `POST /agents/basic/dynamic-prompt/{update,execute}`
//! - `POST /agents/basic/stream-text` - server-sent events
//!
//! ## LLM providers (`/agents/llm-provider`)
//! - `POST /agents/llm-provider/{provider}`
//! - `POST /agents/llm-provider/recommend-model`
//!
//! ## Orchestration (`/agents/orchestration`)
//! - `POST /agents/orchestration/{handoffs,combined,input-guardrails,output-guardrails}`
//! - `GET /agents/orchestration/trace-status[/{trace_id}]`
//!
//! # Authentication
//!
//! Everything except `/` and `/health` requires the shared key:
//! ```text
//! X-API-KEY: <API_KEY>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The document is served at `/api-docs/openapi.json`. With the `swagger-ui`
//! feature, interactive documentation is available at `/swagger-ui/`.

/// Validating JSON body extractor.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// OpenAPI document.
pub mod openapi;
/// Router configuration and route definitions.
pub mod routes;

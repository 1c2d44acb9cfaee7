//! Function Runner Module
//!
//! Two calculator cards, ticket pricing and sum, each posting its inputs to a
//! remote serverless function and rendering the reply.
//!
//! ## Architecture
//!
//! - `domain` holds the calculations, the per-card interaction state, the
//!   per-visitor sessions and the transport seam
//! - `api::rest` renders the page and handles the form posts
//! - [`FunctionRunner`] keeps the visitor sessions and builds the router
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// === MODULE DEFINITION ===
pub mod module;
pub use module::FunctionRunner;

// === PUBLIC EXPORTS ===
pub mod domain;
pub use domain::{
    CallError, DEFAULT_MAX_SESSIONS, FunctionTransport, HttpFunctionTransport, Interaction, Phase,
    RawReply, Session, SessionStore, Snapshot, Submission, TransportError,
};

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;

//! Diagnostics for Tern tools.
//!
//! Parse problems ([`Problem`](tern_ir::Problem)) and binding errors
//! ([`BindError`](tern_bind::BindError)) are turned into [`Diagnostic`]s,
//! collected in a [`DiagnosticQueue`] and rendered by an emitter.

mod diagnostic;
pub mod emitter;
mod queue;

pub use diagnostic::{Diagnostic, Excerpt, Severity};
pub use queue::DiagnosticQueue;

// core/src/lib.rs

//! Step pipelines for MealSaver's mutation actions.
//!
//! Every server-side action (create a meal, toggle a message's read flag, send
//! a message) is expressed as an [`ActionPipeline`]: an ordered list of named
//! steps, each with `before`, `on`, and `after` handlers that share one
//! lockable context ([`ContextData`]). A handler returns
//! [`StepControl::Continue`] to move on or [`StepControl::Stop`] to end the run
//! early; any error aborts the run and is handed back to the caller unchanged.
//!
//! Pipelines are registered once at startup in an [`ActionRegistry`], keyed by
//! their context type, and dispatched per request:
//!
//! ```ignore
//! let registry = ActionRegistry::<AppError>::new();
//! registry.register(toggle_read_pipeline());
//! let ctx = ContextData::new(ToggleReadCtx { .. });
//! match registry.run(ctx.clone()).await? {
//!   FlowOutcome::Completed => { /* read results out of ctx */ }
//!   FlowOutcome::Stopped => { /* a step halted the action */ }
//! }
//! ```

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{FlowOutcome, StepControl};
pub use crate::core::handler::{Handler, HandlerFuture};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::ActionPipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::ActionRegistry;

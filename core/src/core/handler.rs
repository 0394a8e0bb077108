// core/src/core/handler.rs

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every step handler.
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>;

/// A step handler.
///
/// Handlers receive their own clone of the shared [`ContextData`]. Lock guards
/// taken from it are blocking and must be dropped before the handler awaits.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;

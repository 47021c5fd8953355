//! # polyscript: compile once, evaluate many
//!
//! polyscript is the engine-agnostic front end of a script runtime. A host
//! compiles a script once into an [`ExecutableUnit`](script::ExecutableUnit)
//! and evaluates it any number of times, concurrently, with different input
//! data.
//!
//! ## Building blocks
//!
//! - Request-scoped state: an immutable value chain ([`context`])
//! - Input data: composable providers and deep merge ([`data`])
//! - Compiled units and the loader/compiler seams ([`script`])
//! - The contract engine backends implement ([`evaluation`])
//! - Settings ([`config`]), errors ([`error`]) and time ([`timestamp`])
//!
//! ## Request flow
//!
//! ```text
//! Provider chain → ExecutableUnit (compile) → Evaluator
//!     per request: prepare_context(ctx, items) → eval(ctx)
//! ```
//!
//! Static data is fixed when the unit is built. Per-request data travels in
//! the [`Context`](context::Context) returned by `prepare_context`. Neither
//! the caller's context nor the unit is ever modified, so a single unit can
//! be shared between concurrent evaluations.

pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod script;
pub mod timestamp;


// Re-exports
pub use context::Context;
pub use data::{CompositeProvider, ContextProvider, DataItem, DataMap, Provider, StaticProvider};
pub use error::*;
pub use evaluation::{EvalError, EvalResult, Evaluator, EvaluatorResponse};
pub use script::{ExecutableUnit, MachineType};

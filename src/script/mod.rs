//! Compiled-unit lifecycle and the contracts engine backends implement.
//!
//! A [`Loader`] supplies source bytes, a [`Compiler`] turns them into
//! [`ExecutableContent`], and an [`ExecutableUnit`] binds that content to a
//! [`Provider`](crate::data::Provider) and a stable ID.

pub mod compiler;
pub mod loader;
pub mod machine;
pub mod unit;

pub use compiler::{CompileError, Compiler, ExecutableContent};
pub use loader::{FileLoader, Loader, LoaderError, MockLoader, StringLoader};
pub use machine::MachineType;
pub use unit::{content_id, ExecutableUnit, ExecutableUnitBuilder, UnitError, CONTENT_ID_LEN};

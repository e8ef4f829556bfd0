// Core types and functionality for the Toolhub tool invocation engine

pub mod types;
pub mod error;
pub mod registry;
pub mod executions;
pub mod handlers;
pub mod dispatcher;
pub mod resources;

pub use dispatcher::{Dispatcher, ToolStats};
pub use error::{DispatchError, HandlerError, RegistryError};
pub use executions::ExecutionStore;
pub use handlers::HandlerRegistry;
pub use registry::ToolRegistry;
pub use resources::{ResourceStats, ResourceStore};
pub use types::*;

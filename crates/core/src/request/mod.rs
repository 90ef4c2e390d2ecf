//! Outgoing request preparation

pub mod context;
pub mod injector;

pub use context::{FetchPolicy, OperationContext};
pub use injector::{strip_typename, PreparedRequest, RequestContextInjector};

//! Commands - the operations the `lago` binary exposes

mod feature_flags;
mod graphql;
mod session;

pub use feature_flags::*;
pub use graphql::*;
pub use session::*;

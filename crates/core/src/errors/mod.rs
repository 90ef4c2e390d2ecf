//! GraphQL error classification
//!
//! [`classifier`] answers call-site questions about a response ("does it
//! carry code X for field Y?", "what did the payment provider say?").
//! [`policy`] decides how the central guard treats each error.

pub mod classifier;
pub mod policy;

pub use classifier::{extract_third_party_message, has_defined_error, ErrorSource};
pub use policy::{classify, ErrorClass, SilentCodes, AUTH_ERRORS, PERMISSION_ERRORS};

//! Domain types and models

pub mod feature_flags;
pub mod graphql;
pub mod navigation;
pub mod session;

pub use feature_flags::{FeatureFlag, FeatureFlagSelection};
pub use graphql::{
    ApiErrorCode, DetailValue, ErrorDetails, ErrorExtensions, ErrorLocation, GraphqlError,
    GraphqlRequest, GraphqlResponse, PathSegment,
};
pub use navigation::{Notification, Route, Severity};
pub use session::{SessionSnapshot, SessionStatus};

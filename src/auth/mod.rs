//! Identifies the user making a request to a protected route.

mod middleware;

pub use middleware::{USER_ID_HEADER, identify_user};

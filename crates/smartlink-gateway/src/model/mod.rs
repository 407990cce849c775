mod link;

pub use link::{CreateLinkRequest, ErrorResponse, HealthResponse, LinkResponse};

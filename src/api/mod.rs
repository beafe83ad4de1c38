pub mod request;
pub mod response;
pub mod routes;

pub use request::ScoreRequest;
pub use response::{ErrorResponse, ScoreResponse};
pub use routes::{create_router, AppState};

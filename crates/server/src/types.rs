use serde::{Deserialize, Serialize};

/// The uniform envelope for successful API responses.
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub result: T,
}

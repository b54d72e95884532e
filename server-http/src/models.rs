use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
    pub cache_backend: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

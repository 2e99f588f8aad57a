pub mod fetcher;
pub mod generator;
pub mod intake;
pub mod lookup;

#[cfg(test)]
pub(crate) mod testing;

use crate::{
    error::PipelineError,
    models::http::ApiResponse,
};

pub use fetcher::{FetchInvocation, ImageFetcher};
pub use generator::{GeneratedImageResult, ImageGenerator, ImageLocation};
pub use intake::PromptIntake;
pub use lookup::ImageLookup;

/// Status-coded response for a failed synchronous request: input errors are
/// the caller's (400), everything else is an upstream or deployment failure (502).
pub fn error_response(err: &PipelineError) -> ApiResponse {
    if err.is_client_error() {
        ApiResponse::message(400, err.to_string())
    } else {
        ApiResponse::message(502, err.to_string())
    }
}

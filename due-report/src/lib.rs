use anyhow::{Error, anyhow};
use canvas_api::error::ApiError;

pub mod args;
pub mod report;

/// Rewords a failure that the user can act on; anything else passes through.
pub fn explain(err: Error) -> Error {
    match err.downcast_ref::<ApiError>() {
        Some(api) if api.is_auth() => {
            anyhow!("Canvas rejected the access token. Run `due-report login` again.")
        }
        Some(_) => err.context("could not reach Canvas, try again"),
        None => err,
    }
}

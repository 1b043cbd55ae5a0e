//! Response parsing utilities for the HTTP client

use {
    crate::ClientResult,
    ::tracing::{instrument, trace, warn},
    reqwest::Response,
    serde_json::Value,
};

/// Reads the whole body and parses it as JSON.
///
/// Error payloads (`{"code": .., "error": ..}`) come back as regular values;
/// only transport and decoding failures are errors.
#[instrument(
    name = "parse.response.parse",
    skip(res),
    fields(status = res.status().as_u16()),
    err
)]
pub(crate) async fn parse_response(res: Response) -> ClientResult<Value> {
    let status = res.status();
    let full = res.bytes().await?;

    let json: Value = serde_json::from_slice(&full).inspect_err(|e| {
        ::tracing::error!(
            "failed to parse response as JSON ({:?}): {}",
            e,
            String::from_utf8_lossy(&full)
        );
    })?;

    if !status.is_success() {
        warn!(%status, "Parse Server returned an error response");
    }
    trace!("[HttpExecutor] response: {:#?}", &json);

    Ok(json)
}

//! Classifies transport outcomes into payloads or `RequestError`s.
//!
//! Precedence, applied identically to data and download tasks:
//! - no response at all: the transport error, if any, otherwise the payload;
//! - status outside `200..300`: the transport error if one was reported,
//!   otherwise `UnsuccessfulStatusCode`;
//! - 2xx: the transport error if one was reported, otherwise the payload.

use std::any::type_name;

use serde::de::DeserializeOwned;

use crate::error::{DecodeError, RequestError};
use crate::transport::TransportOutcome;

/// Turns response bytes into a typed value.
pub trait Decoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError>;
}

/// `serde_json` backed decoder used by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        serde_json::from_slice(bytes).map_err(|e| DecodeError {
            type_name: type_name::<T>(),
            message: e.to_string(),
        })
    }
}

/// Apply the status check to a raw outcome.
///
/// `Ok(None)` means the exchange succeeded but carried no payload.
pub fn check_status<P>(outcome: TransportOutcome<P>) -> Result<Option<P>, RequestError> {
    let TransportOutcome {
        payload,
        response,
        error,
    } = outcome;

    let status_error = response
        .filter(|response| !response.is_success())
        .map(|response| RequestError::unsuccessful_status(response.status));

    match (error, status_error) {
        (Some(error), _) => Err(RequestError::Network(error)),
        (None, Some(status_error)) => Err(status_error),
        (None, None) => Ok(payload),
    }
}

/// Status-check `outcome` and decode its body as `T`.
///
/// A missing or empty body is `MissingData`; the decoder is not consulted.
pub fn decode_response<T, D>(outcome: TransportOutcome<Vec<u8>>, decoder: &D) -> Result<T, RequestError>
where
    T: DeserializeOwned,
    D: Decoder,
{
    let data = match check_status(outcome)? {
        Some(data) if !data.is_empty() => data,
        _ => return Err(RequestError::MissingData),
    };

    decoder.decode::<T>(&data).map_err(|err| {
        if cfg!(debug_assertions) {
            log_decode_failure(&err, &data);
        }
        RequestError::Decode(err)
    })
}

fn log_decode_failure(err: &DecodeError, data: &[u8]) {
    match serde_json::from_slice::<serde_json::Value>(data) {
        Ok(json) => tracing::debug!(error = %err, %json, "error decoding response, check the target type"),
        Err(_) => tracing::debug!(error = %err, bytes = data.len(), "error decoding response, body is not JSON"),
    }
}

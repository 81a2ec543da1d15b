//! Response envelope and response-body destinations.

use reqwest::StatusCode;
use reqwest::blocking::Response;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};
use url::Url;

/// Status line, headers and final URL of an API response.
///
/// Returned by [`Music163Client::execute`](crate::Music163Client::execute)
/// and carried by the errors raised after a response arrived, so callers can
/// still see the status when decoding fails.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Final URL, after redirects.
    pub url: Url,
}

impl ResponseInfo {
    pub(crate) fn from_response(response: &Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
        }
    }
}

/// A value a JSON response body can be decoded into.
///
/// Implemented for every `DeserializeOwned` type. The target is only
/// overwritten once the whole body decoded successfully.
pub trait JsonTarget {
    fn decode_json(&mut self, reader: &mut dyn Read) -> serde_json::Result<()>;
}

impl<T: DeserializeOwned> JsonTarget for T {
    fn decode_json(&mut self, reader: &mut dyn Read) -> serde_json::Result<()> {
        *self = serde_json::from_reader(reader)?;
        Ok(())
    }
}

/// Where a successful response body goes.
pub enum Destination<'a> {
    /// Drain and drop the body.
    Discard,
    /// Copy the body verbatim.
    Sink(&'a mut dyn Write),
    /// Decode the body as JSON.
    Json(&'a mut dyn JsonTarget),
}

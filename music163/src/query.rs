//! Query-string encoding for endpoint options.
//!
//! Each options type lists its parameters explicitly through
//! [`QueryOptions`]; [`add_options`] percent-encodes them and sets them as
//! the query component of a path.

use crate::error::{Music163Error, Result};
use url::Url;

/// Resolves relative references during syntax checking only.
const CHECK_BASE: &str = "http://music.163.com/";

/// A value that maps onto URL query parameters.
pub trait QueryOptions {
    /// The `(key, value)` pairs to send. Keys may repeat.
    fn query_pairs(&self) -> Result<Vec<(&'static str, String)>>;
}

impl QueryOptions for [(&'static str, String)] {
    fn query_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(self.to_vec())
    }
}

/// `?id=<id>`, used by the detail endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdQuery(pub u64);

impl QueryOptions for IdQuery {
    fn query_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![("id", self.0.to_string())])
    }
}

/// Append `options` to `path` as its query string.
///
/// `None` returns `path` unchanged. Otherwise any existing query is replaced
/// (the fragment is kept), pairs are ordered by key, and an empty pair list
/// leaves no `?` behind.
pub fn add_options<O: QueryOptions + ?Sized>(path: &str, options: Option<&O>) -> Result<String> {
    let Some(options) = options else {
        return Ok(path.to_owned());
    };
    check_reference(path)?;

    let mut pairs = options.query_pairs()?;
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let (rest, fragment) = match path.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (path, None),
    };
    let stem = rest.split_once('?').map_or(rest, |(stem, _)| stem);

    let mut out = String::with_capacity(stem.len() + query.len() + 1);
    out.push_str(stem);
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    Ok(out)
}

/// Fail with [`Music163Error::Parse`] unless `path` is a valid absolute URL
/// or relative reference.
fn check_reference(path: &str) -> Result<()> {
    match Url::parse(path) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(CHECK_BASE)?.join(path)?;
            Ok(())
        }
        Err(e) => Err(Music163Error::Parse(e)),
    }
}

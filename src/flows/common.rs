//! Shared helpers for flow implementations: required fields, bearer headers and redirect
//! targets.

// crates.io
use url::{ParseError, Position};
// self
use crate::_prelude::*;

const BEARER_SCHEME: &str = "Bearer";
// Relative targets are resolved against this placeholder and rendered without it.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Returns the field value, or [`Error::BadRequest`] naming the field when missing or empty.
pub(crate) fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str> {
	match value {
		Some(v) if !v.is_empty() => Ok(v),
		_ => Err(Error::bad_request(format!("Missing required field `{field}`"))),
	}
}

/// Extracts the token from a `Bearer <token>` header value.
///
/// The scheme matches case-insensitively and must be followed by exactly one whitespace
/// character; everything after it up to the end of the line is the token, which may be
/// empty. Returns `None` when the value does not have that shape.
pub fn parse_bearer(header: &str) -> Option<&str> {
	let scheme = header.get(..BEARER_SCHEME.len())?;

	if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
		return None;
	}

	let mut rest = header[BEARER_SCHEME.len()..].chars();
	let separator = rest.next()?;

	if !separator.is_whitespace() || separator == '\n' {
		return None;
	}

	let token = rest.as_str();

	if token.contains('\n') {
		return None;
	}

	Some(token)
}

/// Redirect target taken from a request: an absolute URL, or a reference relative to the
/// authority's own origin (`/login`, `done?x=1`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RedirectTarget {
	url: Url,
	relative: bool,
}
impl RedirectTarget {
	/// Validates `raw`. Control characters and relative references that name another host
	/// (`//evil.example/`) are rejected.
	pub(crate) fn parse(field: &'static str, raw: &str) -> Result<Self> {
		if raw.chars().any(char::is_control) {
			return Err(Error::bad_request(format!("Invalid {field}: control characters")));
		}

		match Url::parse(raw) {
			Ok(url) => Ok(Self { url, relative: false }),
			Err(ParseError::RelativeUrlWithoutBase) => {
				let (base, url) = Url::parse(RELATIVE_BASE)
					.and_then(|base| base.join(raw).map(|url| (base, url)))
					.map_err(|e| Error::bad_request(format!("Invalid {field}: {e}")))?;

				if url.origin() != base.origin() {
					return Err(Error::bad_request(format!(
						"Invalid {field}: relative target must not name a host"
					)));
				}

				Ok(Self { url, relative: true })
			},
			Err(e) => Err(Error::bad_request(format!("Invalid {field}: {e}"))),
		}
	}

	/// Appends `key=value` to the query string.
	pub(crate) fn append_pair(&mut self, key: &str, value: &str) {
		self.url.query_pairs_mut().append_pair(key, value);
	}

	/// Renders the target; relative inputs stay relative.
	pub(crate) fn into_string(self) -> String {
		if self.relative { self.url[Position::BeforePath..].to_owned() } else { self.url.into() }
	}
}

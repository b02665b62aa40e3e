// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Request signing
//!
//! Webhook endpoints that require signing verify two query parameters:
//!
//! ```text
//! timestamp = <unix milliseconds>
//! sign      = base64(HMAC-SHA256(key = secret, message = timestamp + "\n" + secret))
//! ```
//!
//! `sign` is form-urlencoded when appended, so `+`, `/` and `=` from the
//! base64 alphabet arrive intact.

use crate::error::{NotifyError, NotifyResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter carrying the signing timestamp
pub const TIMESTAMP_PARAM: &str = "timestamp";

/// Query parameter carrying the signature
pub const SIGN_PARAM: &str = "sign";

/// Milliseconds since the Unix epoch, as used for signing
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Base64 HMAC-SHA256 signature for `secret` at `timestamp_ms`.
///
/// Deterministic: the same inputs always produce the same signature.
pub fn generate_signature(secret: &str, timestamp_ms: i64) -> NotifyResult<String> {
    let string_to_sign = format!("{timestamp_ms}\n{secret}");
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| NotifyError::InvalidSecret)?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Parse `endpoint`, rejecting anything but absolute http(s) URLs
pub fn parse_endpoint(endpoint: &str) -> NotifyResult<Url> {
    let url = Url::parse(endpoint)
        .map_err(|err| NotifyError::invalid_endpoint(endpoint, err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(NotifyError::invalid_endpoint(
            endpoint,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// `endpoint` with `timestamp` and `sign` appended to its query string.
///
/// Existing query parameters, such as an access token, are preserved.
pub fn sign_endpoint(endpoint: &str, secret: &str, timestamp_ms: i64) -> NotifyResult<Url> {
    let mut url = parse_endpoint(endpoint)?;
    let signature = generate_signature(secret, timestamp_ms)?;
    url.query_pairs_mut()
        .append_pair(TIMESTAMP_PARAM, &timestamp_ms.to_string())
        .append_pair(SIGN_PARAM, &signature);
    Ok(url)
}

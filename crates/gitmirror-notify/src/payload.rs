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
//! Webhook payloads

use crate::error::NotifyResult;
use crate::signing::{generate_signature, SIGN_PARAM, TIMESTAMP_PARAM};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// JSON body of a text message
///
/// Serializes as `{"msgtype":"text","text":{"content":"..."}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WebhookBody {
    pub msgtype: String,
    pub text: TextContent,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TextContent {
    pub content: String,
}

impl WebhookBody {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            msgtype: "text".to_string(),
            text: TextContent {
                content: content.into(),
            },
        }
    }
}

/// One outgoing notification, built per send and never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub message: String,
    pub signature: Option<String>,
    pub signed_timestamp: Option<i64>,
}

impl NotificationPayload {
    /// Unsigned payload for `message`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            signature: None,
            signed_timestamp: None,
        }
    }

    /// Attach a signature for `secret` at `timestamp_ms`
    pub fn signed(mut self, secret: &str, timestamp_ms: i64) -> NotifyResult<Self> {
        self.signature = Some(generate_signature(secret, timestamp_ms)?);
        self.signed_timestamp = Some(timestamp_ms);
        Ok(self)
    }

    pub fn body(&self) -> WebhookBody {
        WebhookBody::text(self.message.clone())
    }

    /// `endpoint` with the signing parameters appended, if signed
    pub fn target(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        if let (Some(signature), Some(timestamp)) = (&self.signature, self.signed_timestamp) {
            url.query_pairs_mut()
                .append_pair(TIMESTAMP_PARAM, &timestamp.to_string())
                .append_pair(SIGN_PARAM, signature);
        }
        url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::signing::sign_endpoint;

    #[test]
    fn test_body_shape() {
        let json = serde_json::to_value(WebhookBody::text("hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"msgtype": "text", "text": {"content": "hello"}})
        );
    }

    #[test]
    fn test_body_escapes_content() {
        let raw = serde_json::to_string(&WebhookBody::text("line \"1\"\n- a.txt")).unwrap();
        let back: WebhookBody = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.text.content, "line \"1\"\n- a.txt");
    }

    #[test]
    fn test_unsigned_target_is_unchanged() {
        let endpoint = Url::parse("https://example.com/hook?token=t").unwrap();
        let payload = NotificationPayload::new("m");
        assert_eq!(payload.target(&endpoint), endpoint);
    }

    #[test]
    fn test_signed_target_matches_sign_endpoint() {
        let endpoint = "https://example.com/hook?token=t";
        let payload = NotificationPayload::new("m").signed("s3cret", 99).unwrap();
        assert_eq!(payload.signed_timestamp, Some(99));
        assert_eq!(
            payload.target(&Url::parse(endpoint).unwrap()),
            sign_endpoint(endpoint, "s3cret", 99).unwrap()
        );
    }
}

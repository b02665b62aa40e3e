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
//! HTTP delivery of notifications

use crate::error::{NotifyError, NotifyResult};
use crate::payload::NotificationPayload;
use crate::signing::{current_timestamp_ms, parse_endpoint};
use async_trait::async_trait;
use gitmirror_config::NotificationTarget;
use reqwest::{StatusCode, Url};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Longest response body kept in a [`NotifyError::Delivery`]
const MAX_ERROR_BODY: usize = 512;

/// Something that can deliver a text message.
#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Deliver `message` once. Failures are not retried.
    async fn send(&self, message: &str) -> NotifyResult<()>;
}

/// Posts text messages to a webhook, signing the URL when a secret is set.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: Url,
    secret: Option<String>,
}

impl WebhookNotifier {
    /// Notifier for `endpoint`; an empty secret disables signing
    pub fn new(endpoint: &str, secret: Option<String>) -> NotifyResult<Self> {
        Self::with_timeout(endpoint, secret, None)
    }

    /// Like [`new`](Self::new), aborting requests after `timeout`
    pub fn with_timeout(
        endpoint: &str,
        secret: Option<String>,
        timeout: Option<Duration>,
    ) -> NotifyResult<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
            secret: secret.filter(|s| !s.is_empty()),
        })
    }

    pub fn from_target(target: &NotificationTarget, timeout: Option<Duration>) -> NotifyResult<Self> {
        Self::with_timeout(
            target.endpoint(),
            target.secret().map(str::to_string),
            timeout,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn is_signed(&self) -> bool {
        self.secret.is_some()
    }

    /// Build the payload for `message`, signed with the current time if needed
    pub fn payload(&self, message: &str) -> NotifyResult<NotificationPayload> {
        let payload = NotificationPayload::new(message);
        match &self.secret {
            Some(secret) => payload.signed(secret, current_timestamp_ms()),
            None => Ok(payload),
        }
    }

    /// POST a prepared payload
    pub async fn deliver(&self, payload: &NotificationPayload) -> NotifyResult<()> {
        let url = payload.target(&self.endpoint);
        debug!(
            host = self.endpoint.host_str().unwrap_or_default(),
            signed = payload.signature.is_some(),
            "POST webhook"
        );

        let response = self.client.post(url).json(&payload.body()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(NotifyError::Delivery {
                status: status.as_u16(),
                body,
            });
        }

        info!("Notification delivered");
        Ok(())
    }
}

// The endpoint URL may embed an access token, and the secret must never be logged.
impl fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("host", &self.endpoint.host_str())
            .field("signed", &self.secret.is_some())
            .finish()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> NotifyResult<()> {
        let payload = self.payload(message)?;
        self.deliver(&payload).await
    }
}

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
//! # gitmirror notifications
//!
//! Best-effort text messages to a webhook endpoint.
//!
//! Messages are POSTed as `{"msgtype":"text","text":{"content":...}}`. When a
//! secret is configured the endpoint URL carries `timestamp` and `sign` query
//! parameters (see [`signing`]). Any status other than 200 is a failure; no
//! delivery is retried.
//!
//! ```rust,no_run
//! use gitmirror_notify::{Notifier, WebhookNotifier};
//!
//! # async fn example() -> Result<(), gitmirror_notify::NotifyError> {
//! let notifier = WebhookNotifier::new(
//!     "https://hooks.example.com/robot/send?access_token=abc",
//!     Some("SEC123".to_string()),
//! )?;
//! notifier.send("New files synced:\n- a.txt").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod payload;
pub mod signing;

pub use client::{Notifier, WebhookNotifier};
pub use error::{NotifyError, NotifyResult};
pub use payload::{NotificationPayload, TextContent, WebhookBody};
pub use signing::{current_timestamp_ms, generate_signature, sign_endpoint};

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
//! Structured logging for gitmirror.
//!
//! Every crate in the workspace logs through the `tracing` macros; this crate
//! owns the one place where a subscriber is installed. The launcher calls
//! [`init_tracing`] (or [`init_tracing_with_config`]) once at startup.
//!
//! # Features
//!
//! - **Output formats**: pretty, compact and JSON
//! - **Filtering**: explicit level or `RUST_LOG` directives
//! - **Quiet dependencies**: HTTP client internals are capped at `warn`
//!   unless the caller asks for them explicitly
//!
//! # Example
//!
//! ```ignore
//! use gitmirror_observability::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::Compact, Some("debug"))?;
//! tracing::info!(remote = "https://example.com/repo.git", "mirror started");
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, LogOutput};
pub use initialization::{init_tracing, init_tracing_with_config};

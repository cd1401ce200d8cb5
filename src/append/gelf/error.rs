// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io;

/// Errors raised by the GELF appender and its transports.
///
/// Only [`Error::Configuration`] surfaces to callers, from [`Gelf::new`] and
/// [`Gelf::apply_settings`], so a broken destination is caught at setup time.
/// The other variants occur while delivering a record; the [`Gelf`] appender
/// catches them and hands them to its error sink instead of returning them,
/// so a logging call never fails because the collector is unreachable.
///
/// [`Gelf::new`]: crate::append::gelf::Gelf::new
/// [`Gelf::apply_settings`]: crate::append::gelf::Gelf::apply_settings
/// [`Gelf`]: crate::append::gelf::Gelf
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The settings snapshot describes an unusable destination.
    #[error("invalid GELF configuration: {0}")]
    Configuration(String),
    /// Delivery failed: name resolution, socket, connection, or HTTP
    /// transport trouble, including a request running past its deadline.
    #[error("failed to deliver GELF payload: {0}")]
    Transport(#[from] io::Error),
    /// The collector answered an HTTP POST with a non-2xx status.
    #[error("GELF endpoint responded with HTTP status {status}")]
    Http {
        /// The status code of the response.
        status: u16,
    },
    /// The payload would span more chunks than the GELF chunked encoding can
    /// express. The message is dropped, never truncated.
    #[error("payload would span {required} chunks but GELF allows at most 128")]
    ChunkLimit {
        /// How many chunks the payload would have needed.
        required: usize,
    },
}

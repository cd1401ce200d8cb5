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

//! Appender for shipping log records to a GELF (Graylog Extended Log
//! Format) collector over UDP, TCP, or HTTP.
//!
//! UDP payloads can be compressed and are chunked when they exceed the
//! configured datagram size; TCP records are framed with a null delimiter;
//! HTTP posts run under a deadline. Delivery is best-effort by design: a
//! dead collector costs log records, never a panic or an error in the
//! calling application.
//!
//! # Examples
//!
//! ```no_run
//! use logelf::append::gelf::Compression;
//! use logelf::append::gelf::Gelf;
//! use logelf::append::gelf::GelfSettings;
//!
//! let settings = GelfSettings::udp("graylog.example.com", 12201)
//!     .max_datagram_size(8192)
//!     .compression(Compression::Gzip);
//!
//! logelf::builder()
//!     .dispatch(|d| {
//!         d.filter(log::LevelFilter::Info)
//!             .append(Gelf::new(settings).unwrap())
//!     })
//!     .apply();
//!
//! log::info!("This log will be shipped to the collector.");
//! ```

pub use self::append::Gelf;
pub use self::error::Error;
pub use self::sender::GelfSender;
pub use self::settings::AddressFamily;
pub use self::settings::Compression;
pub use self::settings::GelfSettings;
pub use self::settings::Protocol;

mod append;
mod chunk;
mod compress;
mod error;
mod sender;
mod settings;
mod transport;

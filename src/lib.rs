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

//! Logelf is a logging implementation that ships structured log records to a
//! GELF (Graylog Extended Log Format) collector.
//!
//! # Overview
//!
//! Logelf lets you set up multiple log dispatches with different filters,
//! diagnostics, and appenders. The GELF appender delivers records over UDP
//! (with chunking and optional compression), TCP (null-delimited), or HTTP,
//! and never lets an unreachable collector crash or fail the application.
//! It integrates seamlessly with the `log` crate.
//!
//! # Examples
//!
//! Simple setup with the default stdout appender:
//!
//! ```
//! logelf::stdout().apply();
//!
//! log::info!("This is an info message.");
//! ```
//!
//! Shipping records to a Graylog instance:
//!
//! ```no_run
//! use log::LevelFilter;
//! use logelf::append::gelf::Gelf;
//! use logelf::append::gelf::GelfSettings;
//!
//! let settings = GelfSettings::udp("graylog.example.com", 12201).max_datagram_size(8192);
//!
//! logelf::builder()
//!     .dispatch(|d| {
//!         d.filter(LevelFilter::Info)
//!             .append(Gelf::new(settings).unwrap())
//!     })
//!     .apply();
//!
//! log::error!("Error message.");
//! log::info!("Info message.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod diagnostic;
pub mod filter;
pub mod layout;

pub use append::Append;
pub use diagnostic::Diagnostic;
pub use filter::Filter;
pub use layout::Layout;

mod logger;
pub use logger::*;

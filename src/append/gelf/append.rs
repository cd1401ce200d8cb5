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

use std::fmt;

use log::Record;

use crate::Diagnostic;
use crate::append::Append;
use crate::append::gelf::Error;
use crate::append::gelf::GelfSender;
use crate::append::gelf::GelfSettings;
use crate::layout::GelfLayout;
use crate::layout::Layout;

type ErrorSink = Box<dyn Fn(&Error) + Send + Sync + 'static>;

/// An appender that ships log records to a GELF collector.
///
/// Records are rendered by the configured layout ([`GelfLayout`] unless
/// overridden) and handed to a [`GelfSender`]. Delivery is best-effort:
/// transport failures never reach the logging caller. Register an error sink
/// to observe them.
///
/// # Examples
///
/// ```no_run
/// use logelf::append::gelf::Gelf;
///
/// let gelf = Gelf::udp("graylog.example.com", 12201).unwrap();
///
/// logelf::builder()
///     .dispatch(|d| d.filter(log::LevelFilter::Info).append(gelf))
///     .apply();
///
/// log::info!("This log will be shipped to the collector.");
/// ```
pub struct Gelf {
    sender: GelfSender,
    layout: Layout,
    error_sink: Option<ErrorSink>,
}

impl fmt::Debug for Gelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gelf")
            .field("sender", &self.sender)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl Gelf {
    /// Creates a [`Gelf`] appender for the given settings snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the snapshot is invalid.
    pub fn new(settings: GelfSettings) -> Result<Gelf, Error> {
        Ok(Gelf {
            sender: GelfSender::new(settings)?,
            layout: GelfLayout::default().into(),
            error_sink: None,
        })
    }

    /// Creates an appender sending UDP datagrams to `host:port`.
    pub fn udp(host: impl Into<String>, port: u16) -> Result<Gelf, Error> {
        Gelf::new(GelfSettings::udp(host, port))
    }

    /// Creates an appender writing to a TCP stream on `host:port`.
    pub fn tcp(host: impl Into<String>, port: u16) -> Result<Gelf, Error> {
        Gelf::new(GelfSettings::tcp(host, port))
    }

    /// Creates an appender posting to an HTTP endpoint.
    pub fn http(url: impl Into<String>) -> Result<Gelf, Error> {
        Gelf::new(GelfSettings::http(url))
    }

    /// Sets the layout of the [`Gelf`] appender.
    ///
    /// Defaults to [`GelfLayout`]; a collector expecting GELF will reject
    /// other formats, so only override this for raw-input destinations.
    pub fn with_layout(mut self, layout: impl Into<Layout>) -> Gelf {
        self.layout = layout.into();
        self
    }

    /// Registers a sink that observes delivery failures.
    ///
    /// The appender stays non-throwing either way; the sink is how operators
    /// find out that records are being dropped.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use logelf::append::gelf::Gelf;
    ///
    /// let gelf = Gelf::udp("graylog.example.com", 12201)
    ///     .unwrap()
    ///     .with_error_sink(|err| eprintln!("gelf delivery failed: {err}"));
    /// ```
    pub fn with_error_sink(mut self, sink: impl Fn(&Error) + Send + Sync + 'static) -> Gelf {
        self.error_sink = Some(Box::new(sink));
        self
    }

    /// Swaps the active settings snapshot, see
    /// [`GelfSender::apply_settings`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the snapshot is invalid.
    pub fn apply_settings(&self, settings: GelfSettings) -> Result<(), Error> {
        self.sender.apply_settings(settings)
    }
}

impl Append for Gelf {
    fn append(&self, record: &Record, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        let payload = self.layout.format(record, diagnostics)?;
        if let Err(err) = self.sender.send(&payload) {
            if let Some(ref sink) = self.error_sink {
                sink(&err);
            }
        }
        Ok(())
    }
}

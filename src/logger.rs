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

use std::io::Write;

use log::LevelFilter;
use log::Metadata;
use log::Record;

use crate::append::Append;
use crate::diagnostic::Diagnostic;
use crate::filter::Filter;
use crate::filter::FilterResult;

/// Create a new empty [builder][Builder].
///
/// At least one dispatch must be added before the global logger can be set
/// up:
///
/// ```
/// use log::LevelFilter;
/// use logelf::append;
///
/// logelf::builder()
///     .dispatch(|d| {
///         d.filter(LevelFilter::Info)
///             .append(append::Stdout::default())
///     })
///     .apply();
/// ```
pub fn builder() -> Builder {
    Builder::new()
}

/// Create a new [`Builder`] with a default `Stdout` dispatch configured.
///
/// This is a convenient API that you can use as:
///
/// ```
/// logelf::stdout().apply();
/// ```
pub fn stdout() -> Builder {
    builder().dispatch(|d| d.append(crate::append::Stdout::default()))
}

/// Create a new [`Builder`] with a default `Stderr` dispatch configured.
///
/// This is a convenient API that you can use as:
///
/// ```
/// logelf::stderr().apply();
/// ```
pub fn stderr() -> Builder {
    builder().dispatch(|d| d.append(crate::append::Stderr::default()))
}

/// A builder for configuring the global logger.
///
/// Each [dispatch][Builder::dispatch] call registers an independent group of
/// filters, diagnostics, and appenders; a record is offered to every group.
///
/// ## Examples
///
/// ```
/// use log::LevelFilter;
/// use logelf::append;
///
/// logelf::builder()
///     .dispatch(|d| {
///         d.filter(LevelFilter::Error)
///             .append(append::Stderr::default())
///     })
///     .dispatch(|d| {
///         d.filter(LevelFilter::Info)
///             .append(append::Stdout::default())
///     })
///     .apply();
///
/// log::error!("Error message.");
/// log::info!("Info message.");
/// ```
#[must_use = "call `apply` to set up the global logger"]
#[derive(Debug)]
pub struct Builder {
    dispatches: Vec<Dispatch>,

    // default to trace - we need this because the global default is OFF
    max_level: LevelFilter,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

impl Builder {
    /// Create a new empty [`Builder`].
    pub fn new() -> Builder {
        Builder {
            dispatches: vec![],
            max_level: LevelFilter::Trace,
        }
    }

    /// Register a dispatch.
    ///
    /// The closure receives a staging [`DispatchBuilder`] and must return it
    /// with at least one appender configured; the const generic tracks that,
    /// so a dispatch without an appender cannot compile.
    pub fn dispatch<F>(mut self, f: F) -> Builder
    where
        F: FnOnce(DispatchBuilder<false>) -> DispatchBuilder<true>,
    {
        self.dispatches.push(f(DispatchBuilder::new()).build());
        self
    }

    /// Set the global maximum log level.
    ///
    /// This will be passed to [`log::set_max_level`] on [`Builder::apply`].
    pub fn max_level(mut self, max_level: LevelFilter) -> Builder {
        self.max_level = max_level;
        self
    }

    /// Set up the global logger with all the dispatches configured.
    ///
    /// This should be called early in the execution of a Rust program. Any
    /// log events that occur before initialization will be ignored.
    ///
    /// # Errors
    ///
    /// This function will fail if it is called more than once, or if another
    /// library has already initialized a global logger.
    pub fn try_apply(self) -> Result<(), log::SetLoggerError> {
        let logger = Logger::new(self.dispatches);
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(self.max_level);
        Ok(())
    }

    /// Set up the global logger with all the dispatches configured.
    ///
    /// # Panics
    ///
    /// This function will panic if it is called more than once, or if another
    /// library has already initialized a global logger.
    pub fn apply(self) {
        self.try_apply()
            .expect("Builder::apply should not be called after the global logger initialized");
    }
}

/// A dispatch under construction.
///
/// * `APPEND=false`: the staging state; [`Filter`]s and [`Diagnostic`]s can
///   still be added.
/// * `APPEND=true`: at least one [`Append`] is configured and the dispatch
///   can be handed back to [`Builder::dispatch`].
#[derive(Debug)]
pub struct DispatchBuilder<const APPEND: bool = true> {
    filters: Vec<Filter>,
    diagnostics: Vec<Diagnostic>,
    appends: Vec<Box<dyn Append>>,
}

impl DispatchBuilder<false> {
    fn new() -> DispatchBuilder<false> {
        DispatchBuilder {
            filters: vec![],
            diagnostics: vec![],
            appends: vec![],
        }
    }

    /// Add a [`Filter`] to this dispatch.
    pub fn filter(mut self, filter: impl Into<Filter>) -> DispatchBuilder<false> {
        self.filters.push(filter.into());
        self
    }

    /// Add a [`Diagnostic`] to this dispatch.
    pub fn diagnostic(mut self, diagnostic: impl Into<Diagnostic>) -> DispatchBuilder<false> {
        self.diagnostics.push(diagnostic.into());
        self
    }
}

impl<const APPEND: bool> DispatchBuilder<APPEND> {
    /// Add an [`Append`] to this dispatch.
    pub fn append(mut self, append: impl Append) -> DispatchBuilder<true> {
        self.appends.push(Box::new(append));

        DispatchBuilder {
            filters: self.filters,
            diagnostics: self.diagnostics,
            appends: self.appends,
        }
    }
}

impl DispatchBuilder<true> {
    fn build(self) -> Dispatch {
        Dispatch {
            filters: self.filters,
            diagnostics: self.diagnostics,
            appends: self.appends,
        }
    }
}

/// A grouped set of filters, diagnostics, and appenders.
///
/// `filters` decide whether a log record is passed on; `appends` write
/// records to a destination, with `diagnostics` supplying ambient context.
#[derive(Debug)]
struct Dispatch {
    filters: Vec<Filter>,
    diagnostics: Vec<Diagnostic>,
    appends: Vec<Box<dyn Append>>,
}

impl Dispatch {
    fn enabled(&self, metadata: &Metadata) -> bool {
        for filter in &self.filters {
            match filter.enabled(metadata) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    fn log(&self, record: &Record) -> anyhow::Result<()> {
        for filter in &self.filters {
            match filter.matches(record) {
                FilterResult::Reject => return Ok(()),
                FilterResult::Accept => break,
                FilterResult::Neutral => {}
            }
        }

        for append in &self.appends {
            append.append(record, &self.diagnostics)?;
        }
        Ok(())
    }

    fn flush(&self) {
        for append in &self.appends {
            append.flush();
        }
    }
}

/// A logger facade that dispatches log records to one or more dispatches.
///
/// This struct implements [`log::Log`] to bridge logelf's logging
/// implementations with the [`log`] crate.
#[derive(Debug)]
pub struct Logger {
    dispatches: Vec<Dispatch>,
}

impl Logger {
    fn new(dispatches: Vec<Dispatch>) -> Logger {
        Logger { dispatches }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.dispatches
            .iter()
            .any(|dispatch| dispatch.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        for dispatch in &self.dispatches {
            if dispatch.enabled(record.metadata()) {
                if let Err(err) = dispatch.log(record) {
                    handle_error(record, err);
                }
            }
        }
    }

    fn flush(&self) {
        for dispatch in &self.dispatches {
            dispatch.flush();
        }
    }
}

fn handle_error(record: &Record, error: anyhow::Error) {
    let Err(fallback_error) = write!(
        std::io::stderr(),
        r###"
Error perform logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error}
"###,
        args = record.args(),
        record = record,
        error = error,
    ) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error}
    Fallback error: {fallback_error}
"###,
        args = record.args(),
        record = record,
        error = error,
        fallback_error = fallback_error,
    );
}

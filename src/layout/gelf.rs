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

use std::borrow::Cow;

use jiff::Timestamp;
use log::Level;
use log::Record;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Diagnostic;
use crate::diagnostic::Visitor;
use crate::layout::Layout;

/// A layout that formats log records as GELF JSON documents.
///
/// Output format:
///
/// ```json
/// {"version":"1.1","host":"app-01","short_message":"order rejected","timestamp":1723387497.172,"level":4,"_logger":"shop::checkout","_module":"shop::checkout","_file":"src/checkout.rs","_line":51,"_order_id":"8713"}
/// ```
///
/// The record's structured key-values and the dispatch's diagnostics become
/// additional fields, prefixed with `_` as GELF requires. Field names are
/// sanitized first: characters outside `[A-Za-z0-9_.-]` turn into `_`, and
/// the reserved names `id`/`Id`/`ID` get an `_field` suffix so they cannot
/// collide with the collector's own document id.
///
/// # Examples
///
/// ```
/// use logelf::layout::GelfLayout;
///
/// let layout = GelfLayout::default().host("app-01");
/// ```
#[derive(Debug, Clone)]
pub struct GelfLayout {
    host: String,
    include_location: bool,
}

impl Default for GelfLayout {
    fn default() -> GelfLayout {
        GelfLayout {
            host: default_host(),
            include_location: true,
        }
    }
}

impl GelfLayout {
    /// Overrides the `host` field.
    ///
    /// Defaults to the machine hostname, or `localhost` when it cannot be
    /// determined.
    pub fn host(mut self, host: impl Into<String>) -> GelfLayout {
        self.host = host.into();
        self
    }

    /// Controls the `_module`/`_file`/`_line` fields.
    ///
    /// Defaults to `true`.
    pub fn include_location(mut self, include_location: bool) -> GelfLayout {
        self.include_location = include_location;
        self
    }
}

fn default_host() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string())
}

/// GELF's `level` field uses syslog severities.
fn syslog_severity(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug => 7,
        Level::Trace => 7,
    }
}

fn sanitize_field_name(key: &str) -> String {
    if matches!(key, "id" | "Id" | "ID") {
        return format!("_{key}_field");
    }

    let mut name = String::with_capacity(key.len() + 1);
    name.push('_');
    for c in key.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            name.push(c);
        } else {
            name.push('_');
        }
    }
    name
}

struct AdditionalFields<'a> {
    fields: &'a mut Map<String, Value>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for AdditionalFields<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.fields
            .insert(sanitize_field_name(key.as_str()), value.to_string().into());
        Ok(())
    }
}

impl Visitor for AdditionalFields<'_> {
    fn visit<'k, 'v, K, V>(&mut self, key: K, value: V)
    where
        K: Into<Cow<'k, str>>,
        V: Into<Cow<'v, str>>,
    {
        self.fields.insert(
            sanitize_field_name(&key.into()),
            value.into().into_owned().into(),
        );
    }
}

#[derive(Debug, Serialize)]
struct GelfMessage<'a> {
    version: &'static str,
    host: &'a str,
    short_message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_message: Option<&'a str>,
    timestamp: f64,
    level: u8,
    #[serde(flatten)]
    additional: Map<String, Value>,
}

impl GelfLayout {
    pub(crate) fn format(
        &self,
        record: &Record,
        diagnostics: &[Diagnostic],
    ) -> anyhow::Result<Vec<u8>> {
        let mut additional = Map::new();

        let target = record.target();
        if !target.is_empty() {
            additional.insert("_logger".to_string(), target.into());
        }
        if self.include_location {
            if let Some(module) = record.module_path() {
                additional.insert("_module".to_string(), module.into());
            }
            if let Some(file) = record.file() {
                additional.insert("_file".to_string(), file.into());
            }
            if let Some(line) = record.line() {
                additional.insert("_line".to_string(), line.into());
            }
        }

        let mut visitor = AdditionalFields {
            fields: &mut additional,
        };
        record.key_values().visit(&mut visitor)?;
        for diagnostic in diagnostics {
            diagnostic.visit(&mut visitor);
        }

        let message = record.args().to_string();
        let (short_message, full_message) = match message.find('\n') {
            Some(pos) => (message[..pos].trim_end_matches('\r'), Some(message.as_str())),
            None => (message.as_str(), None),
        };

        let gelf = GelfMessage {
            version: "1.1",
            host: &self.host,
            short_message,
            full_message,
            timestamp: Timestamp::now().as_millisecond() as f64 / 1000.0,
            level: syslog_severity(record.level()),
            additional,
        };
        Ok(serde_json::to_vec(&gelf)?)
    }
}

impl From<GelfLayout> for Layout {
    fn from(layout: GelfLayout) -> Self {
        Layout::Gelf(layout)
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostic::StaticDiagnostic;

    use super::*;

    fn render(layout: &GelfLayout, record: &Record, diagnostics: &[Diagnostic]) -> Value {
        serde_json::from_slice(&layout.format(record, diagnostics).unwrap()).unwrap()
    }

    #[test]
    fn test_standard_fields() {
        let layout = GelfLayout::default().host("unit-test");
        let value = render(
            &layout,
            &Record::builder()
                .args(format_args!("service started"))
                .level(Level::Info)
                .target("app")
                .module_path(Some("app::boot"))
                .file(Some("src/boot.rs"))
                .line(Some(7))
                .build(),
            &[],
        );

        assert_eq!(value["version"], "1.1");
        assert_eq!(value["host"], "unit-test");
        assert_eq!(value["short_message"], "service started");
        assert_eq!(value["level"], 6);
        assert_eq!(value["_logger"], "app");
        assert_eq!(value["_module"], "app::boot");
        assert_eq!(value["_file"], "src/boot.rs");
        assert_eq!(value["_line"], 7);
        assert!(value["timestamp"].as_f64().unwrap() > 0.0);
        assert!(value.get("full_message").is_none());
    }

    #[test]
    fn test_multiline_message_keeps_first_line_short() {
        let layout = GelfLayout::default().host("unit-test");
        let value = render(
            &layout,
            &Record::builder()
                .args(format_args!("boom\r\nbacktrace line 1\nbacktrace line 2"))
                .level(Level::Error)
                .build(),
            &[],
        );

        assert_eq!(value["short_message"], "boom");
        assert_eq!(
            value["full_message"],
            "boom\r\nbacktrace line 1\nbacktrace line 2"
        );
        assert_eq!(value["level"], 3);
    }

    #[test]
    fn test_additional_fields_from_kvs_and_diagnostics() {
        let kvs: &[(&str, &str)] = &[("user id", "42"), ("id", "primary")];
        let mut diagnostic = StaticDiagnostic::default();
        diagnostic.insert("request.id", "abc-123");

        let layout = GelfLayout::default().host("unit-test");
        let value = render(
            &layout,
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .key_values(&kvs)
                .build(),
            &[diagnostic.into()],
        );

        assert_eq!(value["_user_id"], "42");
        assert_eq!(value["_id_field"], "primary");
        assert_eq!(value["_request.id"], "abc-123");
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(syslog_severity(Level::Error), 3);
        assert_eq!(syslog_severity(Level::Warn), 4);
        assert_eq!(syslog_severity(Level::Info), 6);
        assert_eq!(syslog_severity(Level::Debug), 7);
        assert_eq!(syslog_severity(Level::Trace), 7);
    }

    #[test]
    fn test_field_name_sanitization() {
        assert_eq!(sanitize_field_name("user id"), "_user_id");
        assert_eq!(sanitize_field_name("sp@n"), "_sp_n");
        assert_eq!(sanitize_field_name("trace.id-short"), "_trace.id-short");
        assert_eq!(sanitize_field_name("id"), "_id_field");
        assert_eq!(sanitize_field_name("Id"), "_Id_field");
        assert_eq!(sanitize_field_name("ID"), "_ID_field");
    }
}

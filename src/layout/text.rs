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

use std::fmt::Write;

use colored::Color;
use colored::Colorize;
use jiff::Timestamp;
use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Level;

use crate::layout::KvDisplay;
use crate::layout::Layout;

/// A layout that formats log record as text.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00 ERROR ingest: src/ingest.rs:51 Hello error!
/// 2024-08-11T22:44:57.172219+08:00  WARN ingest: src/ingest.rs:52 Hello warn!
/// 2024-08-11T22:44:57.172276+08:00  INFO ingest: src/ingest.rs:53 Hello info!
/// ```
///
/// Log levels are colored; each level's color can be customized through the
/// `colors` field. The timestamp uses the system timezone unless `tz` is set.
/// `show_time` and `show_key` drop the timestamp and the record's key (its
/// module path) from the line; neither flag affects what a network appender
/// puts on the wire.
#[derive(Debug, Clone)]
pub struct TextLayout {
    pub colors: LevelColor,
    pub tz: Option<TimeZone>,
    pub show_time: bool,
    pub show_key: bool,
}

impl Default for TextLayout {
    fn default() -> TextLayout {
        TextLayout {
            colors: LevelColor::default(),
            tz: None,
            show_time: true,
            show_key: true,
        }
    }
}

/// Customize the color of each log level.
#[derive(Debug, Clone)]
pub struct LevelColor {
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub debug: Color,
    pub trace: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::Green,
            debug: Color::Blue,
            trace: Color::Magenta,
        }
    }
}

impl TextLayout {
    pub(crate) fn format(&self, record: &log::Record) -> anyhow::Result<Vec<u8>> {
        let color = match record.level() {
            Level::Error => self.colors.error,
            Level::Warn => self.colors.warn,
            Level::Info => self.colors.info,
            Level::Debug => self.colors.debug,
            Level::Trace => self.colors.trace,
        };

        let mut line = String::new();

        if self.show_time {
            let time = match self.tz.clone() {
                Some(tz) => Timestamp::now().to_zoned(tz),
                None => Zoned::now(),
            }
            .strftime("%Y-%m-%dT%H:%M:%S.%6f%:z");
            write!(line, "{time} ")?;
        }

        let level = record.level().as_str().color(color);
        write!(line, "{level:>5} ")?;

        if self.show_key {
            let module = record.module_path().unwrap_or_default();
            write!(line, "{module}: ")?;
        }

        let file = record.file().unwrap_or_default();
        let line_no = record.line().unwrap_or_default();
        let message = record.args();
        let kvs = KvDisplay::new(record.key_values());
        write!(line, "{file}:{line_no} {message}{kvs}")?;

        Ok(line.into_bytes())
    }
}

impl From<TextLayout> for Layout {
    fn from(layout: TextLayout) -> Self {
        Layout::Text(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(layout: &TextLayout, record: &log::Record) -> String {
        String::from_utf8(layout.format(record).unwrap()).unwrap()
    }

    fn render_with(layout: &TextLayout, args: std::fmt::Arguments) -> String {
        render(
            layout,
            &log::Record::builder()
                .args(args)
                .level(Level::Info)
                .module_path(Some("app::ingest"))
                .file(Some("src/ingest.rs"))
                .line(Some(7))
                .build(),
        )
    }

    #[test]
    fn test_text_layout_flags() {
        colored::control::set_override(false);

        let full = render_with(&TextLayout::default(), format_args!("hello"));
        assert!(
            full.contains(" INFO app::ingest: src/ingest.rs:7 hello"),
            "{full}"
        );

        let mut bare = TextLayout::default();
        bare.show_time = false;
        bare.show_key = false;
        let line = render_with(&bare, format_args!("hello"));
        assert_eq!(line, " INFO src/ingest.rs:7 hello");
    }
}

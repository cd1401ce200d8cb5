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

use log::Record;

use crate::Diagnostic;
use crate::append::Append;
use crate::layout::Layout;
use crate::layout::TextLayout;

/// An appender that writes log records so they can be captured by a test
/// harness (like `cargo test`), and thus the outputs are suppressed unless
/// `--nocapture` or `--show-output` is specified.
///
/// # Examples
///
/// ```
/// use logelf::append::Testing;
///
/// let test_appender = Testing::default();
/// ```
#[derive(Debug)]
pub struct Testing {
    layout: Layout,
}

impl Default for Testing {
    fn default() -> Testing {
        Testing {
            layout: TextLayout::default().into(),
        }
    }
}

impl Testing {
    /// Sets the layout of the [`Testing`] appender.
    pub fn with_layout(mut self, layout: impl Into<Layout>) -> Testing {
        self.layout = layout.into();
        self
    }
}

impl Append for Testing {
    fn append(&self, record: &Record, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        let bytes = self.layout.format(record, diagnostics)?;
        eprintln!("{}", String::from_utf8_lossy(&bytes));
        Ok(())
    }
}

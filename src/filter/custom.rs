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

use std::fmt::Debug;
use std::fmt::Formatter;

use log::Metadata;

use crate::Filter;
use crate::filter::FilterResult;

type FilterFunction = dyn Fn(&Metadata) -> FilterResult + Send + Sync + 'static;

/// A filter that you can pass the custom filter function.
///
/// ```rust
/// use log::Metadata;
/// use logelf::filter::CustomFilter;
/// use logelf::filter::FilterResult;
///
/// let filter = CustomFilter::new(|metadata: &Metadata| {
///     if metadata.target().starts_with("chatty_dependency") {
///         FilterResult::Reject
///     } else {
///         FilterResult::Neutral
///     }
/// });
/// ```
pub struct CustomFilter {
    f: Box<FilterFunction>,
}

impl Debug for CustomFilter {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "CustomFilter {{ ... }}")
    }
}

impl CustomFilter {
    pub fn new(filter: impl Fn(&Metadata) -> FilterResult + Send + Sync + 'static) -> Self {
        CustomFilter {
            f: Box::new(filter),
        }
    }

    pub(crate) fn enabled(&self, metadata: &Metadata) -> FilterResult {
        (self.f)(metadata)
    }
}

impl From<CustomFilter> for Filter {
    fn from(filter: CustomFilter) -> Self {
        Filter::Custom(filter)
    }
}

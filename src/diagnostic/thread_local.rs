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

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::mem;

use crate::Diagnostic;
use crate::diagnostic::Visitor;

thread_local! {
    static CONTEXT: RefCell<BTreeMap<String, String>> = const { RefCell::new(BTreeMap::new()) };
}

/// A diagnostic that stores key-value pairs in a thread-local map.
///
/// ## Example
///
/// ```rust
/// use logelf::diagnostic::ThreadLocalDiagnostic;
///
/// ThreadLocalDiagnostic::insert("key", "value");
/// ```
#[derive(Default, Debug, Clone, Copy)]
#[non_exhaustive]
pub struct ThreadLocalDiagnostic {}

impl ThreadLocalDiagnostic {
    /// Inserts a key-value pair into the thread local diagnostic.
    pub fn insert<K, V>(key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        CONTEXT.with(|map| {
            map.borrow_mut().insert(key.into(), value.into());
        });
    }

    /// Removes a key-value pair from the thread local diagnostic.
    pub fn remove(key: &str) {
        CONTEXT.with(|map| {
            map.borrow_mut().remove(key);
        });
    }

    /// Inserts a key-value pair that lasts until the returned guard drops.
    ///
    /// Dropping the guard restores whatever value the key held before, so
    /// scopes nest naturally.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use logelf::diagnostic::ThreadLocalDiagnostic;
    ///
    /// let _scope = ThreadLocalDiagnostic::scope("request_id", "0a1b2c");
    /// log::info!("tagged with the current request id");
    /// ```
    #[must_use = "the key is removed again as soon as the guard drops"]
    pub fn scope<K, V>(key: K, value: V) -> ScopeGuard
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        let previous = CONTEXT.with(|map| map.borrow_mut().insert(key.clone(), value.into()));
        ScopeGuard { key, previous }
    }

    pub(crate) fn visit<V: Visitor>(&self, visitor: &mut V) {
        CONTEXT.with(|map| {
            for (key, value) in map.borrow().iter() {
                visitor.visit(key.as_str(), value.as_str());
            }
        });
    }
}

impl From<ThreadLocalDiagnostic> for Diagnostic {
    fn from(diagnostic: ThreadLocalDiagnostic) -> Self {
        Diagnostic::ThreadLocal(diagnostic)
    }
}

/// Restores the previous thread-local diagnostic value when dropped.
#[derive(Debug)]
pub struct ScopeGuard {
    key: String,
    previous: Option<String>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        CONTEXT.with(|map| {
            let mut map = map.borrow_mut();
            match self.previous.take() {
                Some(previous) => {
                    map.insert(mem::take(&mut self.key), previous);
                }
                None => {
                    map.remove(&self.key);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::collections::BTreeMap;

    use super::*;

    struct Collector(BTreeMap<String, String>);

    impl Visitor for Collector {
        fn visit<'k, 'v, K, V>(&mut self, key: K, value: V)
        where
            K: Into<Cow<'k, str>>,
            V: Into<Cow<'v, str>>,
        {
            self.0
                .insert(key.into().into_owned(), value.into().into_owned());
        }
    }

    fn snapshot() -> BTreeMap<String, String> {
        let mut collector = Collector(BTreeMap::new());
        ThreadLocalDiagnostic::default().visit(&mut collector);
        collector.0
    }

    #[test]
    fn test_scopes_nest_and_unwind() {
        let outer = ThreadLocalDiagnostic::scope("request_id", "outer");
        assert_eq!(snapshot().get("request_id"), Some(&"outer".to_string()));

        {
            let _inner = ThreadLocalDiagnostic::scope("request_id", "inner");
            assert_eq!(snapshot().get("request_id"), Some(&"inner".to_string()));
        }

        assert_eq!(snapshot().get("request_id"), Some(&"outer".to_string()));
        drop(outer);
        assert_eq!(snapshot().get("request_id"), None);
    }
}

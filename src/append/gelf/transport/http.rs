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
use std::io;
use std::time::Duration;

use crate::append::gelf::Error;
use crate::append::gelf::settings::GelfSettings;

/// Delivers payloads as HTTP POST requests.
///
/// One agent is reused across sends so connections are pooled. Each request
/// runs under the configured deadline; a request that outlives it is aborted
/// and reported as a transport failure.
pub(crate) struct HttpTransport {
    url: String,
    timeout: Duration,
    agent: ureq::Agent,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub(crate) fn new(settings: &GelfSettings) -> HttpTransport {
        HttpTransport {
            url: settings.host.clone(),
            timeout: settings.timeout,
            agent: ureq::agent(),
        }
    }

    pub(crate) fn reconfigure(&mut self, settings: &GelfSettings) {
        self.timeout = settings.timeout;
    }

    pub(crate) fn send(&mut self, payload: &[u8]) -> Result<(), Error> {
        let response = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json; charset=utf-8")
            .timeout(self.timeout)
            .send_bytes(payload);

        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => Err(Error::Http { status }),
            Err(err) => Err(Error::Transport(io::Error::other(err))),
        }
    }
}

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

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::append::gelf::Error;
use crate::append::gelf::settings::GelfSettings;
use crate::append::gelf::transport::Transport;

/// Owns the live transport resource for one GELF destination.
///
/// The sender takes already-formatted GELF payloads and puts them on the
/// wire with the strategy the current settings snapshot selects. Sends and
/// [`apply_settings`][GelfSender::apply_settings] contend for one lock, so a
/// write in flight always completes against the handle it started with and
/// never observes a half-replaced transport.
///
/// # Examples
///
/// ```no_run
/// use logelf::append::gelf::GelfSender;
/// use logelf::append::gelf::GelfSettings;
///
/// let sender = GelfSender::new(GelfSettings::udp("127.0.0.1", 12201)).unwrap();
/// sender.send(br#"{"version":"1.1","host":"app","short_message":"hi","level":6}"#).unwrap();
/// ```
#[derive(Debug)]
pub struct GelfSender {
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    settings: GelfSettings,
    transport: Transport,
}

impl GelfSender {
    /// Creates a sender bound to the given snapshot.
    ///
    /// The snapshot is validated here; sockets and connections are opened
    /// lazily on the first send.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the snapshot is invalid.
    pub fn new(settings: GelfSettings) -> Result<GelfSender, Error> {
        settings.validate()?;
        let transport = Transport::open(&settings);
        Ok(GelfSender {
            state: Mutex::new(State {
                settings,
                transport,
            }),
        })
    }

    /// Swaps the active settings snapshot.
    ///
    /// An invalid snapshot is rejected without touching the running
    /// transport. When the connection identity (protocol, host, port,
    /// address family) is unchanged, framing fields take effect in place and
    /// the open socket or connection is kept; otherwise the old handle is
    /// dropped and a fresh one comes up on the next send.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the snapshot is invalid.
    pub fn apply_settings(&self, settings: GelfSettings) -> Result<(), Error> {
        settings.validate()?;
        let mut state = self.lock();
        if state.settings.same_endpoint(&settings) {
            state.transport.reconfigure(&settings);
        } else {
            state.transport = Transport::open(&settings);
        }
        state.settings = settings;
        Ok(())
    }

    /// Delivers one formatted GELF payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`], [`Error::Http`], or
    /// [`Error::ChunkLimit`] when delivery fails; the payload is dropped.
    pub fn send(&self, payload: &[u8]) -> Result<(), Error> {
        self.lock().transport.send(payload)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // a panicked send left nothing half-written worth preserving
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

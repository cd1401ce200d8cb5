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

use std::io;
use std::io::Write;
use std::net::TcpStream;

use crate::append::gelf::Error;
use crate::append::gelf::settings::AddressFamily;
use crate::append::gelf::settings::GelfSettings;
use crate::append::gelf::transport::resolve;

/// Delivers payloads over a persistent TCP stream.
///
/// The connection is opened on the first send and reused afterwards. When a
/// write fails the stream is discarded together with the record that was in
/// flight, and the next send reconnects from scratch.
#[derive(Debug)]
pub(crate) struct TcpTransport {
    host: String,
    port: u16,
    family: AddressFamily,
    null_delimiter: bool,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    pub(crate) fn new(settings: &GelfSettings) -> TcpTransport {
        TcpTransport {
            host: settings.host.clone(),
            port: settings.port,
            family: settings.address_family,
            null_delimiter: settings.null_delimiter,
            stream: None,
        }
    }

    pub(crate) fn reconfigure(&mut self, settings: &GelfSettings) {
        self.null_delimiter = settings.null_delimiter;
    }

    pub(crate) fn send(&mut self, payload: &[u8]) -> Result<(), Error> {
        match self.write_record(payload) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.stream = None;
                Err(Error::Transport(err))
            }
        }
    }

    fn write_record(&mut self, payload: &[u8]) -> io::Result<()> {
        let null_delimiter = self.null_delimiter;
        let stream = self.stream()?;
        stream.write_all(payload)?;
        if null_delimiter {
            stream.write_all(&[0])?;
        }
        stream.flush()
    }

    fn stream(&mut self) -> io::Result<&mut TcpStream> {
        if let Some(ref mut stream) = self.stream {
            return Ok(stream);
        }

        let addr = resolve(&self.host, self.port, self.family)?;
        let stream = TcpStream::connect(addr)?;
        Ok(self.stream.insert(stream))
    }
}

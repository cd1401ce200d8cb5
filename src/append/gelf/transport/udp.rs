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
use std::net::SocketAddr;
use std::net::UdpSocket;

use crate::append::gelf::Error;
use crate::append::gelf::chunk;
use crate::append::gelf::compress::compress;
use crate::append::gelf::settings::AddressFamily;
use crate::append::gelf::settings::Compression;
use crate::append::gelf::settings::GelfSettings;
use crate::append::gelf::transport::resolve;

/// Delivers payloads as UDP datagrams, chunking oversized messages.
///
/// Datagrams are fire-and-forget: nothing is awaited and nothing is retried.
/// The socket is bound and the remote address resolved on the first send, so
/// resolution failures show up as send errors rather than setup errors.
#[derive(Debug)]
pub(crate) struct UdpTransport {
    host: String,
    port: u16,
    family: AddressFamily,
    compression: Compression,
    compress_threshold: usize,
    max_datagram_size: usize,
    endpoint: Option<(UdpSocket, SocketAddr)>,
}

impl UdpTransport {
    pub(crate) fn new(settings: &GelfSettings) -> UdpTransport {
        UdpTransport {
            host: settings.host.clone(),
            port: settings.port,
            family: settings.address_family,
            compression: settings.compression,
            compress_threshold: settings.compress_threshold,
            max_datagram_size: settings.max_datagram_size,
            endpoint: None,
        }
    }

    pub(crate) fn reconfigure(&mut self, settings: &GelfSettings) {
        self.compression = settings.compression;
        self.compress_threshold = settings.compress_threshold;
        self.max_datagram_size = settings.max_datagram_size;
    }

    pub(crate) fn send(&mut self, payload: &[u8]) -> Result<(), Error> {
        let body: Cow<[u8]> = if self.compression != Compression::None
            && payload.len() > self.compress_threshold
        {
            Cow::Owned(compress(self.compression, payload)?)
        } else {
            Cow::Borrowed(payload)
        };

        let max_datagram_size = self.max_datagram_size;
        let (socket, addr) = self.endpoint()?;

        if max_datagram_size == 0 || body.len() <= max_datagram_size {
            socket.send_to(&body, *addr)?;
            return Ok(());
        }

        let message_id: [u8; 8] = rand::random();
        for datagram in chunk::split(&body, max_datagram_size, message_id)? {
            socket.send_to(&datagram, *addr)?;
        }
        Ok(())
    }

    fn endpoint(&mut self) -> Result<&(UdpSocket, SocketAddr), Error> {
        if let Some(ref endpoint) = self.endpoint {
            return Ok(endpoint);
        }

        let addr = resolve(&self.host, self.port, self.family)?;
        let bind_addr = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr)?;
        Ok(self.endpoint.insert((socket, addr)))
    }
}

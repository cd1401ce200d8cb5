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
use std::net::SocketAddr;
use std::net::ToSocketAddrs;

use crate::append::gelf::settings::AddressFamily;
use crate::append::gelf::settings::GelfSettings;
use crate::append::gelf::settings::Protocol;

pub(crate) use self::http::HttpTransport;
pub(crate) use self::tcp::TcpTransport;
pub(crate) use self::udp::UdpTransport;

mod http;
mod tcp;
mod udp;

/// One strategy for putting a formatted GELF payload on the wire.
///
/// A transport is bound to the snapshot it was opened with. Opening performs
/// no I/O; sockets and connections come up lazily on the first send so that
/// an unreachable collector cannot fail logger setup.
#[derive(Debug)]
pub(crate) enum Transport {
    Udp(UdpTransport),
    Tcp(TcpTransport),
    Http(HttpTransport),
}

impl Transport {
    pub(crate) fn open(settings: &GelfSettings) -> Transport {
        match settings.protocol {
            Protocol::Udp => Transport::Udp(UdpTransport::new(settings)),
            Protocol::Tcp => Transport::Tcp(TcpTransport::new(settings)),
            Protocol::Http => Transport::Http(HttpTransport::new(settings)),
        }
    }

    pub(crate) fn send(&mut self, payload: &[u8]) -> Result<(), crate::append::gelf::Error> {
        match self {
            Transport::Udp(transport) => transport.send(payload),
            Transport::Tcp(transport) => transport.send(payload),
            Transport::Http(transport) => transport.send(payload),
        }
    }

    /// Applies framing-only settings changes without touching the open
    /// socket or connection.
    pub(crate) fn reconfigure(&mut self, settings: &GelfSettings) {
        match self {
            Transport::Udp(transport) => transport.reconfigure(settings),
            Transport::Tcp(transport) => transport.reconfigure(settings),
            Transport::Http(transport) => transport.reconfigure(settings),
        }
    }
}

/// Resolves `host:port` and picks the first address of the requested family.
pub(crate) fn resolve(host: &str, port: u16, family: AddressFamily) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .find(|addr| match family {
            AddressFamily::Unspecified => true,
            AddressFamily::Ipv4 => addr.is_ipv4(),
            AddressFamily::Ipv6 => addr.is_ipv6(),
        })
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{host}:{port} resolved to no {family:?} address"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_honors_address_family() {
        let addr = resolve("127.0.0.1", 12201, AddressFamily::Ipv4).unwrap();
        assert!(addr.is_ipv4());

        let err = resolve("127.0.0.1", 12201, AddressFamily::Ipv6).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

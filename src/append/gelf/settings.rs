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

use std::time::Duration;

use crate::append::gelf::Error;
use crate::append::gelf::chunk::CHUNK_HEADER_LEN;

/// The wire protocol used to reach the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// GELF over UDP datagrams, with chunking and optional compression.
    Udp,
    /// GELF over a persistent TCP stream, optionally null-delimited.
    Tcp,
    /// GELF over HTTP POST requests.
    Http,
}

/// Restricts which address family name resolution may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    /// Use whatever address resolution returns first.
    #[default]
    Unspecified,
    /// Only connect over IPv4.
    Ipv4,
    /// Only connect over IPv6.
    Ipv6,
}

/// The codec applied to UDP payloads above the compression threshold.
///
/// GELF over TCP is defined as uncompressed and GELF over HTTP carries the
/// JSON document verbatim, so this setting only affects the UDP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Send payloads uncompressed.
    #[default]
    None,
    /// Compress with gzip.
    Gzip,
    /// Compress with zlib deflate.
    Zlib,
}

/// An immutable, validated description of one GELF destination.
///
/// A snapshot is created with one of the protocol constructors and refined
/// with the fluent setters, then handed to [`Gelf::new`] or
/// [`Gelf::apply_settings`]. Validation happens when the snapshot is applied,
/// not while it is built.
///
/// # Examples
///
/// ```
/// use logelf::append::gelf::Compression;
/// use logelf::append::gelf::GelfSettings;
///
/// let settings = GelfSettings::udp("graylog.example.com", 12201)
///     .max_datagram_size(8192)
///     .compression(Compression::Gzip);
/// ```
///
/// [`Gelf::new`]: crate::append::gelf::Gelf::new
/// [`Gelf::apply_settings`]: crate::append::gelf::Gelf::apply_settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GelfSettings {
    pub(crate) protocol: Protocol,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) address_family: AddressFamily,
    pub(crate) compression: Compression,
    pub(crate) compress_threshold: usize,
    pub(crate) max_datagram_size: usize,
    pub(crate) null_delimiter: bool,
    pub(crate) timeout: Duration,
}

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

impl GelfSettings {
    /// Creates a snapshot for a UDP destination.
    ///
    /// Chunking is off until [`max_datagram_size`][GelfSettings::max_datagram_size]
    /// is set, and payloads are sent uncompressed until a
    /// [`compression`][GelfSettings::compression] codec is chosen.
    pub fn udp(host: impl Into<String>, port: u16) -> GelfSettings {
        GelfSettings::new(Protocol::Udp, host.into(), port)
    }

    /// Creates a snapshot for a TCP destination.
    ///
    /// Records are terminated with a single null byte, the framing Graylog's
    /// TCP input expects; use
    /// [`null_delimiter(false)`][GelfSettings::null_delimiter] for collectors
    /// with another framing convention.
    pub fn tcp(host: impl Into<String>, port: u16) -> GelfSettings {
        GelfSettings::new(Protocol::Tcp, host.into(), port)
    }

    /// Creates a snapshot for an HTTP destination.
    ///
    /// `url` must be a full `http://` or `https://` URL. Requests run under a
    /// 10 second deadline until [`timeout`][GelfSettings::timeout] says
    /// otherwise.
    pub fn http(url: impl Into<String>) -> GelfSettings {
        GelfSettings::new(Protocol::Http, url.into(), 0)
    }

    fn new(protocol: Protocol, host: String, port: u16) -> GelfSettings {
        GelfSettings {
            protocol,
            host,
            port,
            address_family: AddressFamily::default(),
            compression: Compression::default(),
            compress_threshold: 0,
            max_datagram_size: 0,
            null_delimiter: true,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Restricts name resolution to one address family.
    pub fn address_family(mut self, address_family: AddressFamily) -> GelfSettings {
        self.address_family = address_family;
        self
    }

    /// Sets the codec for UDP payloads above the compression threshold.
    pub fn compression(mut self, compression: Compression) -> GelfSettings {
        self.compression = compression;
        self
    }

    /// Compresses only payloads strictly larger than `threshold` bytes.
    ///
    /// Defaults to 0, so every payload is compressed once a codec is chosen.
    pub fn compress_threshold(mut self, threshold: usize) -> GelfSettings {
        self.compress_threshold = threshold;
        self
    }

    /// Caps UDP datagrams at `size` bytes; larger payloads are chunked.
    ///
    /// 0 (the default) disables chunking and sends each payload as a single
    /// datagram regardless of its size. A non-zero size must leave room for
    /// the 12-byte chunk header plus at least one payload byte.
    pub fn max_datagram_size(mut self, size: usize) -> GelfSettings {
        self.max_datagram_size = size;
        self
    }

    /// Appends a single null byte after each record on TCP.
    ///
    /// Defaults to `true`.
    pub fn null_delimiter(mut self, null_delimiter: bool) -> GelfSettings {
        self.null_delimiter = null_delimiter;
        self
    }

    /// Sets the per-request deadline for HTTP deliveries.
    pub fn timeout(mut self, timeout: Duration) -> GelfSettings {
        self.timeout = timeout;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        match self.protocol {
            Protocol::Udp | Protocol::Tcp => {
                if self.host.is_empty() {
                    return Err(Error::Configuration("host must not be empty".to_string()));
                }
                if self.port == 0 {
                    return Err(Error::Configuration(format!(
                        "port must not be 0 for {:?} endpoints",
                        self.protocol
                    )));
                }
            }
            Protocol::Http => match url::Url::parse(&self.host) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => {
                    return Err(Error::Configuration(format!(
                        "HTTP endpoint must use an http or https URL, got scheme {:?}",
                        url.scheme()
                    )));
                }
                Err(err) => {
                    return Err(Error::Configuration(format!(
                        "HTTP endpoint is not a valid URL: {err}"
                    )));
                }
            },
        }

        if self.max_datagram_size != 0 && self.max_datagram_size <= CHUNK_HEADER_LEN {
            return Err(Error::Configuration(format!(
                "max_datagram_size must exceed the {CHUNK_HEADER_LEN}-byte chunk header",
            )));
        }

        Ok(())
    }

    /// Whether `other` describes the same connection identity.
    ///
    /// Snapshots with the same identity share a socket or connection; only
    /// framing fields differ, and those take effect without a reopen.
    pub(crate) fn same_endpoint(&self, other: &GelfSettings) -> bool {
        self.protocol == other.protocol
            && self.host == other.host
            && self.port == other.port
            && self.address_family == other.address_family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_plain_endpoints() {
        GelfSettings::udp("localhost", 12201).validate().unwrap();
        GelfSettings::tcp("localhost", 12201).validate().unwrap();
        GelfSettings::http("http://localhost:12201/gelf")
            .validate()
            .unwrap();
        GelfSettings::http("https://logs.example.com/gelf")
            .validate()
            .unwrap();
    }

    #[test]
    fn test_validate_rejects_empty_host_and_zero_port() {
        let err = GelfSettings::udp("", 12201).validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "{err}");

        let err = GelfSettings::tcp("localhost", 0).validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "{err}");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let err = GelfSettings::http("localhost:12201").validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "{err}");

        let err = GelfSettings::http("ftp://example.com/gelf")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "{err}");
    }

    #[test]
    fn test_validate_rejects_datagram_sizes_without_room_for_payload() {
        let err = GelfSettings::udp("localhost", 12201)
            .max_datagram_size(12)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "{err}");

        GelfSettings::udp("localhost", 12201)
            .max_datagram_size(13)
            .validate()
            .unwrap();
        GelfSettings::udp("localhost", 12201)
            .max_datagram_size(0)
            .validate()
            .unwrap();
    }

    #[test]
    fn test_same_endpoint_ignores_framing_fields() {
        let base = GelfSettings::udp("localhost", 12201);
        let reframed = base.clone().compress_threshold(4096).max_datagram_size(1420);
        assert!(base.same_endpoint(&reframed));

        let moved = GelfSettings::udp("localhost", 12202);
        assert!(!base.same_endpoint(&moved));

        let pinned = GelfSettings::udp("localhost", 12201).address_family(AddressFamily::Ipv6);
        assert!(!base.same_endpoint(&pinned));
    }
}

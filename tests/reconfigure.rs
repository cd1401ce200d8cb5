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

use std::net::SocketAddr;
use std::net::UdpSocket;
use std::time::Duration;

use logelf::append::gelf::Compression;
use logelf::append::gelf::Error;
use logelf::append::gelf::GelfSender;
use logelf::append::gelf::GelfSettings;

fn collector() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let port = socket.local_addr().unwrap().port();
    (socket, port)
}

fn recv_from(socket: &UdpSocket) -> (Vec<u8>, SocketAddr) {
    let mut buf = [0u8; 65536];
    let (received, addr) = socket.recv_from(&mut buf).unwrap();
    (buf[..received].to_vec(), addr)
}

#[test]
fn test_framing_change_keeps_the_socket() {
    let (socket, port) = collector();
    let sender = GelfSender::new(GelfSettings::udp("127.0.0.1", port)).unwrap();

    sender.send(b"one").unwrap();
    let (_, source_before) = recv_from(&socket);

    // same endpoint, new framing fields: the socket must survive
    let reframed = GelfSettings::udp("127.0.0.1", port)
        .compression(Compression::Gzip)
        .compress_threshold(1 << 16)
        .max_datagram_size(1420);
    sender.apply_settings(reframed).unwrap();

    sender.send(b"two").unwrap();
    let (payload, source_after) = recv_from(&socket);

    assert_eq!(payload, b"two");
    assert_eq!(
        source_before, source_after,
        "an unchanged endpoint must not reopen the socket"
    );
}

#[test]
fn test_framing_change_takes_effect_on_next_send() {
    let (socket, port) = collector();
    let sender = GelfSender::new(GelfSettings::udp("127.0.0.1", port)).unwrap();

    sender.send(&[b'x'; 45]).unwrap();
    let (payload, _) = recv_from(&socket);
    assert_eq!(payload.len(), 45, "chunking starts disabled");

    sender
        .apply_settings(GelfSettings::udp("127.0.0.1", port).max_datagram_size(20))
        .unwrap();

    sender.send(&[b'x'; 45]).unwrap();
    let (first_chunk, _) = recv_from(&socket);
    assert_eq!(first_chunk[..2], [0x1E, 0x0F]);
    assert_eq!(first_chunk[11], 6, "45 bytes at ceiling 20 make 6 chunks");
}

#[test]
fn test_endpoint_change_redirects_sends() {
    let (old_socket, old_port) = collector();
    let (new_socket, new_port) = collector();

    let sender = GelfSender::new(GelfSettings::udp("127.0.0.1", old_port)).unwrap();
    sender.send(b"to-old").unwrap();
    let (payload, _) = recv_from(&old_socket);
    assert_eq!(payload, b"to-old");

    sender
        .apply_settings(GelfSettings::udp("127.0.0.1", new_port))
        .unwrap();

    sender.send(b"to-new").unwrap();
    let (payload, _) = recv_from(&new_socket);
    assert_eq!(payload, b"to-new");
}

#[test]
fn test_invalid_snapshot_is_rejected_and_old_one_stays_live() {
    let (socket, port) = collector();
    let sender = GelfSender::new(GelfSettings::udp("127.0.0.1", port)).unwrap();

    let err = sender
        .apply_settings(GelfSettings::udp("", 0))
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "{err}");

    let err = sender
        .apply_settings(GelfSettings::udp("127.0.0.1", port).max_datagram_size(5))
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "{err}");

    sender.send(b"still-here").unwrap();
    let (payload, _) = recv_from(&socket);
    assert_eq!(payload, b"still-here");
}

#[test]
fn test_constructor_rejects_invalid_snapshots() {
    assert!(matches!(
        GelfSender::new(GelfSettings::udp("", 12201)),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        GelfSender::new(GelfSettings::tcp("localhost", 0)),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        GelfSender::new(GelfSettings::http("not a url")),
        Err(Error::Configuration(_))
    ));
}

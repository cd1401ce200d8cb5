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

use std::io::Read;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use logelf::append::gelf::Error;
use logelf::append::gelf::GelfSender;
use logelf::append::gelf::GelfSettings;

fn collector() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// Accepts one connection and reads exactly `expected` bytes from it.
fn read_stream(listener: TcpListener, expected: usize) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut bytes = vec![0u8; expected];
        stream.read_exact(&mut bytes).unwrap();
        bytes
    })
}

#[test]
fn test_records_are_null_delimited() {
    let (listener, port) = collector();
    let server = read_stream(listener, 12);

    let sender = GelfSender::new(GelfSettings::tcp("127.0.0.1", port)).unwrap();
    sender.send(b"hello").unwrap();
    sender.send(b"world").unwrap();

    assert_eq!(server.join().unwrap(), b"hello\0world\0");
}

#[test]
fn test_delimiter_can_be_disabled() {
    let (listener, port) = collector();
    let server = read_stream(listener, 10);

    let settings = GelfSettings::tcp("127.0.0.1", port).null_delimiter(false);
    let sender = GelfSender::new(settings).unwrap();
    sender.send(b"hello").unwrap();
    sender.send(b"world").unwrap();

    assert_eq!(server.join().unwrap(), b"helloworld");
}

#[test]
fn test_connection_is_reused_across_sends() {
    let (listener, port) = collector();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut bytes = vec![0u8; 4];
        stream.read_exact(&mut bytes).unwrap();

        // a second connection attempt would park here and fail the read above
        bytes
    });

    let sender = GelfSender::new(GelfSettings::tcp("127.0.0.1", port)).unwrap();
    sender.send(b"a").unwrap();
    sender.send(b"b").unwrap();

    assert_eq!(server.join().unwrap(), b"a\0b\0");
}

#[test]
fn test_failed_send_reconnects_on_next_write() {
    // reserve a port, then close the listener so the first send is refused
    let (listener, port) = collector();
    drop(listener);

    let sender = GelfSender::new(GelfSettings::tcp("127.0.0.1", port)).unwrap();
    let err = sender.send(b"lost").unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{err}");

    // the collector comes back and the next write connects from scratch
    let listener = TcpListener::bind(("127.0.0.1", port)).unwrap();
    let server = read_stream(listener, 6);
    sender.send(b"again").unwrap();

    assert_eq!(server.join().unwrap(), b"again\0");
}

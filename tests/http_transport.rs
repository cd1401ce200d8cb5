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
use std::io::Write;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use logelf::append::gelf::Error;
use logelf::append::gelf::GelfSender;
use logelf::append::gelf::GelfSettings;

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Serves exactly one request: reads it fully, waits `delay`, then answers
/// with `status_line`. Returns the request line and body.
fn serve_one(
    listener: TcpListener,
    status_line: &'static str,
    delay: Duration,
) -> thread::JoinHandle<(String, Vec<u8>)> {
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let read = stream.read(&mut chunk).unwrap();
            buf.extend_from_slice(&chunk[..read]);
            if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
            assert_ne!(read, 0, "client hung up before finishing the request");
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length: usize = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);

        let mut body = buf[header_end..].to_vec();
        while body.len() < content_length {
            let read = stream.read(&mut chunk).unwrap();
            assert_ne!(read, 0, "client hung up before finishing the body");
            body.extend_from_slice(&chunk[..read]);
        }

        thread::sleep(delay);

        let request_line = head.lines().next().unwrap_or_default().to_string();
        let response = format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let _ = stream.write_all(response.as_bytes());
        (request_line, body)
    })
}

fn collector() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

#[test]
fn test_payload_is_posted_as_request_body() {
    let (listener, port) = collector();
    let server = serve_one(listener, "HTTP/1.1 202 Accepted", Duration::ZERO);

    let sender = GelfSender::new(GelfSettings::http(format!(
        "http://127.0.0.1:{port}/gelf"
    )))
    .unwrap();
    let payload = br#"{"version":"1.1","host":"app","short_message":"hi","level":6}"#;
    sender.send(payload).unwrap();

    let (request_line, body) = server.join().unwrap();
    assert!(request_line.starts_with("POST /gelf"), "{request_line}");
    assert_eq!(body, payload);
}

#[test]
fn test_non_2xx_response_is_a_failed_send() {
    let (listener, port) = collector();
    let server = serve_one(listener, "HTTP/1.1 503 Service Unavailable", Duration::ZERO);

    let sender =
        GelfSender::new(GelfSettings::http(format!("http://127.0.0.1:{port}/gelf"))).unwrap();
    let err = sender.send(b"{}").unwrap_err();
    assert!(matches!(err, Error::Http { status: 503 }), "{err}");

    server.join().unwrap();
}

#[test]
fn test_request_is_aborted_at_the_deadline() {
    let (listener, port) = collector();
    let server = serve_one(listener, "HTTP/1.1 200 OK", Duration::from_secs(3));

    let settings = GelfSettings::http(format!("http://127.0.0.1:{port}/gelf"))
        .timeout(Duration::from_millis(250));
    let sender = GelfSender::new(settings).unwrap();

    let started = Instant::now();
    let err = sender.send(b"{}").unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, Error::Transport(_)), "{err}");
    assert!(
        elapsed < Duration::from_secs(2),
        "send must give up at the deadline, took {elapsed:?}"
    );

    server.join().unwrap();
}

#[test]
fn test_unresolvable_host_fails_without_panicking() {
    let sender = GelfSender::new(GelfSettings::http(
        "http://nonexistent.invalid:12201/gelf",
    ))
    .unwrap();
    let err = sender.send(b"{}").unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{err}");
}

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

use flate2::write::GzEncoder;
use flate2::write::ZlibEncoder;

use crate::append::gelf::settings::Compression;

/// Compresses `payload` with the requested codec.
///
/// Whether a payload should be compressed at all is the UDP transport's
/// decision; this function only transforms bytes. [`Compression::None`]
/// passes the payload through unchanged.
pub(crate) fn compress(compression: Compression, payload: &[u8]) -> io::Result<Vec<u8>> {
    let buffer = Vec::with_capacity(payload.len() / 2 + 64);
    match compression {
        Compression::None => Ok(payload.to_vec()),
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(buffer, flate2::Compression::default());
            encoder.write_all(payload)?;
            encoder.finish()
        }
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(buffer, flate2::Compression::default());
            encoder.write_all(payload)?;
            encoder.finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;
    use flate2::read::ZlibDecoder;

    use super::*;

    #[test]
    fn test_gzip_round_trip() {
        let payload = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let compressed = compress(Compression::Gzip, &payload).unwrap();
        assert_eq!(&compressed[..2], &[0x1F, 0x8B], "gzip magic bytes");

        let mut decompressed = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut decompressed)
            .unwrap();
        assert_eq!(decompressed, payload);
    }

    #[test]
    fn test_zlib_round_trip() {
        let payload = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let compressed = compress(Compression::Zlib, &payload).unwrap();
        assert_eq!(compressed[0], 0x78, "zlib header byte");

        let mut decompressed = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut decompressed)
            .unwrap();
        assert_eq!(decompressed, payload);
    }

    #[test]
    fn test_none_passes_payload_through() {
        let payload = b"untouched";
        assert_eq!(compress(Compression::None, payload).unwrap(), payload);
    }
}

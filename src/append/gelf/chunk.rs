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

use crate::append::gelf::Error;

/// Marks a datagram as one chunk of a larger GELF message.
pub(crate) const CHUNK_MAGIC: [u8; 2] = [0x1E, 0x0F];

/// Magic bytes, an 8-byte message id, a sequence index, and a sequence count.
pub(crate) const CHUNK_HEADER_LEN: usize = 2 + 8 + 1 + 1;

/// The sequence count is a single byte and the protocol caps it at 128.
pub(crate) const MAX_CHUNK_COUNT: usize = 128;

/// Splits an oversized payload into ready-to-send chunk datagrams.
///
/// Each datagram is at most `max_datagram_size` bytes: a 12-byte header
/// followed by the chunk's slice of the payload. All chunks carry the same
/// `message_id`, which the collector uses to reassemble them.
pub(crate) fn split(
    payload: &[u8],
    max_datagram_size: usize,
    message_id: [u8; 8],
) -> Result<Vec<Vec<u8>>, Error> {
    // settings validation guarantees room for at least one payload byte
    let chunk_size = max_datagram_size - CHUNK_HEADER_LEN;
    let required = payload.len().div_ceil(chunk_size);
    if required > MAX_CHUNK_COUNT {
        return Err(Error::ChunkLimit { required });
    }

    let count = required as u8;
    let mut datagrams = Vec::with_capacity(required);
    for (index, data) in payload.chunks(chunk_size).enumerate() {
        let mut datagram = Vec::with_capacity(CHUNK_HEADER_LEN + data.len());
        datagram.extend_from_slice(&CHUNK_MAGIC);
        datagram.extend_from_slice(&message_id);
        datagram.push(index as u8);
        datagram.push(count);
        datagram.extend_from_slice(data);
        datagrams.push(datagram);
    }
    Ok(datagrams)
}

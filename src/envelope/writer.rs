// Copyright 2024 Branchval Contributors.
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

use byteorder::BigEndian;
use byteorder::ByteOrder;

use super::Address;
use super::Kind;

/// An append-only encoder for the value envelope.
///
/// Writing cannot fail: the buffer grows as needed and every value has a
/// defined encoding. The writer produces exactly the byte layout
/// [`ValueReader`](super::ValueReader) consumes.
#[derive(Debug, Default)]
pub struct ValueWriter {
    buf: Vec<u8>,
}

impl ValueWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        ValueWriter::default()
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Appends a kind tag.
    pub fn write_kind(&mut self, kind: Kind) {
        self.buf.push(kind.tag());
    }

    /// Appends a varint-encoded count.
    pub fn write_count(&mut self, mut count: u64) {
        loop {
            let byte = (count & 0x7f) as u8;
            count >>= 7;
            if count == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Appends a boolean payload byte.
    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    /// Appends an eight-byte big-endian IEEE-754 double.
    pub fn write_f64(&mut self, v: f64) {
        let mut bytes = [0u8; 8];
        BigEndian::write_f64(&mut bytes, v);
        self.buf.extend_from_slice(&bytes);
    }

    /// Appends a count-prefixed UTF-8 string payload.
    pub fn write_string(&mut self, s: &str) {
        self.write_count(s.len() as u64);
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Appends a count-prefixed raw byte payload.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_count(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// Appends a fixed-width content address payload.
    pub fn write_address(&mut self, addr: &Address) {
        self.buf.extend_from_slice(addr.as_bytes());
    }

    /// Appends pre-encoded envelope bytes verbatim.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

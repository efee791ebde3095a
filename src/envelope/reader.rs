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
use super::ADDRESS_LEN;
use crate::error::Error;
use crate::error::Result;

// An unsigned LEB128 varint for a u64 never exceeds ten bytes, and the
// tenth byte can only contribute the top bit.
const MAX_VARINT_LEN: usize = 10;

/// A forward-only cursor over an encoded value buffer.
///
/// The reader never copies: strings, byte slices and sub-value ranges are
/// returned as borrows into the underlying buffer. All reads are bounds
/// checked; running off the end of the buffer is reported as
/// [`Error::BadEnvelope`], never a panic.
#[derive(Debug, Clone)]
pub struct ValueReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ValueReader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        ValueReader { buf, pos: 0 }
    }

    /// The current cursor offset from the start of the buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether the cursor has consumed the whole buffer.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The raw bytes spanning `[start, pos)`, used to materialize a
    /// sub-value as its own envelope.
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.buf[start..self.pos]
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::BadEnvelope(format!(
                "truncated value: need {n} bytes at offset {}, have {}",
                self.pos,
                self.remaining()
            )));
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Returns the kind of the next value without advancing the cursor.
    pub fn peek_kind(&self) -> Result<Kind> {
        match self.buf.get(self.pos) {
            Some(tag) => Kind::from_tag(*tag),
            None => Err(Error::BadEnvelope(format!(
                "truncated value: no kind tag at offset {}",
                self.pos
            ))),
        }
    }

    /// Reads the kind tag of the next value and advances past it.
    pub fn read_kind(&mut self) -> Result<Kind> {
        Kind::from_tag(self.read_u8()?)
    }

    /// Advances past the next kind tag, discarding it.
    pub fn skip_kind(&mut self) -> Result<()> {
        self.read_kind()?;
        Ok(())
    }

    /// Reads a varint-encoded count.
    ///
    /// Truncation mid-varint is [`Error::BadEnvelope`]; a varint that fails
    /// to terminate within the 64-bit range is [`Error::CorruptCount`].
    pub fn read_count(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8().map_err(|_| {
                Error::BadEnvelope(format!("truncated count varint at offset {}", self.pos))
            })?;
            if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
                return Err(Error::CorruptCount);
            }
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::CorruptCount)
    }

    /// Reads and discards a count.
    pub fn skip_count(&mut self) -> Result<()> {
        self.read_count()?;
        Ok(())
    }

    /// Reads a boolean payload byte.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(Error::BadEnvelope(format!("invalid bool payload {b:#04x}"))),
        }
    }

    /// Reads an eight-byte big-endian IEEE-754 double.
    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.take(8)?;
        Ok(BigEndian::read_f64(bytes))
    }

    /// Reads `n` raw payload bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Reads a count-prefixed UTF-8 string payload.
    pub fn read_string(&mut self) -> Result<&'a str> {
        let len = self.read_count()?;
        let len = usize::try_from(len)
            .map_err(|_| Error::BadEnvelope(format!("string length {len} overflows usize")))?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map_err(|e| Error::BadEnvelope(format!("invalid UTF-8 in string payload: {e}")))
    }

    /// Reads a fixed-width content address payload.
    pub fn read_address(&mut self) -> Result<Address> {
        let bytes = self.take(ADDRESS_LEN)?;
        let mut addr = [0u8; ADDRESS_LEN];
        addr.copy_from_slice(bytes);
        Ok(Address::new(addr))
    }

    /// Advances the cursor past one complete value, recursing into
    /// containers.
    pub fn skip_value(&mut self) -> Result<()> {
        self.walk(&mut |_| {})
    }

    /// Like [`skip_value`](Self::skip_value), but reports the address of
    /// every `Ref` record passed, in encounter order. Used by the garbage
    /// collector to trace reachability out of a value.
    pub fn walk_value(&mut self, cb: &mut dyn FnMut(Address)) -> Result<()> {
        self.walk(cb)
    }

    fn walk(&mut self, cb: &mut dyn FnMut(Address)) -> Result<()> {
        match self.read_kind()? {
            Kind::Null => {}
            Kind::Bool => {
                self.take(1)?;
            }
            Kind::Float => {
                self.take(8)?;
            }
            Kind::String | Kind::Blob => {
                let len = self.read_count()?;
                let len = usize::try_from(len).map_err(|_| {
                    Error::BadEnvelope(format!("payload length {len} overflows usize"))
                })?;
                self.take(len)?;
            }
            Kind::List => {
                let count = self.read_count()?;
                for _ in 0..count {
                    self.walk(cb)?;
                }
            }
            Kind::Map => {
                let count = self.read_count()?;
                for _ in 0..count {
                    self.walk(cb)?;
                    self.walk(cb)?;
                }
            }
            Kind::Ref => {
                let addr = self.read_address()?;
                cb(addr);
            }
            Kind::JsonDoc => {
                let count = self.read_count()?;
                for _ in 0..count {
                    self.walk(cb)?;
                }
            }
        }
        Ok(())
    }
}

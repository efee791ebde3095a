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

use thiserror::Error;

use crate::envelope::Kind;

/// Errors produced by the envelope codec, the JSON comparator and the
/// auto-increment tracker.
#[derive(Error, Debug)]
pub enum Error {
    /// The byte buffer is truncated, carries an unknown kind tag, or is
    /// otherwise not a well-formed value envelope.
    #[error("bad value envelope: {0}")]
    BadEnvelope(String),

    /// A varint count did not terminate within the 10-byte limit for an
    /// unsigned 64-bit value.
    #[error("corrupt count varint")]
    CorruptCount,

    /// The decoder encountered a kind other than the one the caller asked
    /// for.
    #[error("unexpected kind {found:?}, expected {expected}")]
    UnexpectedKind {
        /// Human-readable description of the kind(s) the caller expected.
        expected: &'static str,
        /// The kind tag actually present in the buffer.
        found: Kind,
    },

    /// A JSON document's inner value carries a kind outside the JSON value
    /// set.
    #[error("kind {0:?} is not a JSON value")]
    NonJsonKind(Kind),

    /// An AUTO_INCREMENT input value could not be converted to an unsigned
    /// 64-bit sequence value.
    #[error("cannot coerce {0} to an auto-increment value")]
    Coercion(String),

    /// An error raised by a storage collaborator (root value, table, ref
    /// registry), surfaced verbatim with context.
    #[error("{context}: {source}")]
    Collaborator {
        /// What the tracker was doing when the collaborator failed.
        context: String,
        /// The underlying collaborator error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The session was cancelled while an operation was scanning branches.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Wraps a collaborator error with context describing the failed read.
    pub fn collaborator(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Collaborator {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

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

//! `branchval` is the value-representation core of a version-controlled SQL
//! database layered on a content-addressed value store: the binary envelope
//! values are stored in, JSON documents and their MySQL-compatible ordering,
//! and the tracker that keeps AUTO_INCREMENT keys monotonic across every
//! branch of a database.
//!
//! ## Encoding format
//!
//! Every value in the heap is encoded as a kind-tagged, count-prefixed
//! record in a contiguous byte buffer.
//!
//! - A single-byte varint kind tag identifies the type of the value:
//!   `Null`, `Bool`, `Float`, `String`, `Blob`, `List`, `Map`, `Ref`, or
//!   `JsonDoc`.
//! - Containers carry a varint count of their elements, followed by the
//!   elements themselves in canonical kind-tagged form.
//! - `Ref` carries a fixed 20-byte content address pointing at another
//!   value in the heap; walking a value enumerates these for the garbage
//!   collector.
//!
//! #### An encoding example
//!
//! ```text
//! // JSON document
//! JSON([false, 10, {"k":"v"}])
//!
//! // envelope encoding
//! 0x08          JsonDoc kind tag
//! 0x01          count (populated document)
//! 0x05          List kind tag
//! 0x03          count (3 elements)
//! 0x01 0x00     Bool false
//! 0x02 0x40 0x24 0x00.. Float 10.0 (big-endian IEEE-754)
//! 0x06          Map kind tag
//! 0x01          count (1 entry)
//! 0x03 0x01 6b  String key "k"
//! 0x03 0x01 76  String value "v"
//! ```
//!
//! ## Cross-branch AUTO_INCREMENT
//!
//! In a branching database the AUTO_INCREMENT counter for a table cannot
//! live on one branch: inserting on two branches and merging must never
//! produce colliding keys. [`AutoIncrementTracker`] keys a process-wide
//! sequence per lowercased table name, seeded from the maximum persisted
//! value across all branch heads, working sets and remote-tracking refs,
//! and reconciles against those same refs when DDL moves a sequence
//! backwards.

#![deny(unsafe_code)]

mod compare;
mod document;
pub mod envelope;
mod error;
mod from;
mod sqlval;
pub mod store;
mod tracker;
mod value;

pub use compare::compare_values;
pub use document::read_json_doc;
pub use document::skip_json_doc;
pub use document::walk_json_doc;
pub use document::OwnedJsonDoc;
pub use document::RawJsonDoc;
pub use error::Error;
pub use error::Result;
pub use sqlval::coerce_auto_increment_value;
pub use sqlval::SqlValue;
pub use tracker::AutoIncrementTracker;
pub use tracker::SharedAutoIncrementTracker;
pub use value::JsonValue;
pub use value::Object;

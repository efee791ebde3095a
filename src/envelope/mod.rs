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

//! The binary value envelope: a contiguous byte buffer holding a sequence of
//! kind-tagged, count-prefixed records.
//!
//! Decoders maintain a forward-only cursor ([`ValueReader`]); encoders append
//! to an owned buffer ([`ValueWriter`]). The envelope is the storage format
//! shared by every value in the content-addressed heap, so its layout is
//! bit-exact and stable: readers written against an earlier layout keep
//! decoding values written by later writers as long as the kind tag and
//! count are unchanged.

mod address;
mod kind;
mod reader;
mod writer;

pub use address::Address;
pub use address::ADDRESS_LEN;
pub use kind::Kind;
pub use reader::ValueReader;
pub use writer::ValueWriter;

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

//! The cross-branch AUTO_INCREMENT coordinator.
//!
//! A table's AUTO_INCREMENT counter is tracked globally, across every
//! branch of a database: the next value handed to an INSERT on any branch
//! is the maximum over all branch heads, working sets and remote-tracking
//! refs, so generated keys never collide after a merge. One tracker exists
//! per database; the enclosing registry owns it for the lifetime of the
//! database and tears it down on unload. Persisting the counter back into
//! table metadata is the caller's responsibility at commit time.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use tracing::trace;

use crate::error::Result;
use crate::sqlval::coerce_auto_increment_value;
use crate::sqlval::SqlValue;
use crate::store::RefKind;
use crate::store::RootValue;
use crate::store::Rootish;
use crate::store::SessionContext;
use crate::store::WorkingSet;
use crate::store::WorkingSetRef;

/// Hands out the next AUTO_INCREMENT value per table, reconciled across
/// all branches of one database.
///
/// Table names are case-insensitive; every operation normalizes to
/// lowercase. A single lock serializes all operations, including the
/// cross-branch scans, so a concurrent INSERT on another branch can never
/// observe a counter mid-reconciliation.
#[derive(Debug)]
pub struct AutoIncrementTracker {
    db_name: String,
    sequences: Mutex<HashMap<String, u64>>,
}

impl AutoIncrementTracker {
    /// Builds a tracker from the roots given. All root sets must be
    /// considered because the counter for a table is global across
    /// branches: pass working sets where they exist, and branch heads
    /// where they do not (e.g. remote-tracking refs).
    ///
    /// Walks each root's tables exactly once, keeping the maximum
    /// persisted next-to-generate value per table. Aborts on the first
    /// collaborator error.
    pub fn new(
        ctx: &SessionContext,
        db_name: impl Into<String>,
        roots: &[&dyn Rootish],
    ) -> Result<AutoIncrementTracker> {
        let db_name = db_name.into();
        let mut sequences: HashMap<String, u64> = HashMap::new();

        for root in roots {
            ctx.check_cancelled()?;
            let root = root.resolve_root()?;
            root.iter_tables(&mut |table_name, table, schema| {
                if !schema.has_auto_increment() {
                    return Ok(false);
                }

                let table_name = table_name.to_lowercase();
                let seq = table.auto_increment_value()?;

                let entry = sequences.entry(table_name).or_insert(0);
                if seq > *entry {
                    *entry = seq;
                }

                Ok(false)
            })?;
        }

        debug!(
            db = %db_name,
            tables = sequences.len(),
            "initialized auto-increment sequences"
        );
        Ok(AutoIncrementTracker {
            db_name,
            sequences: Mutex::new(sequences),
        })
    }

    /// The database this tracker coordinates.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// The next value to be generated for the table named; does not
    /// advance the sequence.
    pub fn current(&self, table_name: &str) -> u64 {
        let sequences = self.sequences.lock();
        sequences
            .get(&table_name.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Returns the next AUTO_INCREMENT value for the table named, using
    /// the value provided by the INSERT when there is one.
    ///
    /// A missing, NULL or zero value generates from the sequence. A value
    /// at or above the sequence pushes the sequence past it. A value below
    /// the sequence is returned verbatim and does not regress the counter,
    /// matching MySQL's behavior for explicit inserts under the high-water
    /// mark.
    pub fn next(&self, table_name: &str, insert_val: Option<&SqlValue>) -> Result<u64> {
        let table_name = table_name.to_lowercase();
        let given = match insert_val {
            Some(val) => coerce_auto_increment_value(val)?,
            None => 0,
        };

        let mut sequences = self.sequences.lock();
        let curr = sequences.get(&table_name).copied().unwrap_or(0);

        if given == 0 {
            // NULL or 0: generate from the sequence.
            sequences.insert(table_name, curr + 1);
            return Ok(curr);
        }

        if given >= curr {
            sequences.insert(table_name, given + 1);
            return Ok(given);
        }

        // given < curr
        Ok(given)
    }

    /// Converts a runtime value into a sequence value. See
    /// [`coerce_auto_increment_value`].
    pub fn coerce(&self, val: &SqlValue) -> Result<u64> {
        coerce_auto_increment_value(val)
    }

    /// Sets the sequence for the table named, as for
    /// `ALTER TABLE ... AUTO_INCREMENT = n`.
    ///
    /// A value above the in-memory counter overwrites it directly. Anything
    /// else re-establishes the baseline from the persisted values on every
    /// branch before deciding, so the counter can shrink when no branch
    /// still holds a higher value.
    pub fn set(
        &self,
        ctx: &SessionContext,
        ws: &WorkingSetRef,
        table_name: &str,
        new_val: u64,
    ) -> Result<()> {
        let table_name = table_name.to_lowercase();

        let mut sequences = self.sequences.lock();
        let existing = sequences.get(&table_name).copied().unwrap_or(0);
        if new_val > existing {
            sequences.insert(table_name, new_val);
            Ok(())
        } else {
            self.deep_set(ctx, ws, &table_name, new_val, &mut sequences)
        }
    }

    /// Assigns the maximum of `new_val` and the persisted AUTO_INCREMENT
    /// for this table across every branch head and remote-tracking head,
    /// reading fresh through the collaborator seams rather than trusting
    /// the in-memory counter.
    ///
    /// The owning working set is skipped: the caller is about to update it
    /// and its persisted value is stale. The maximum is computed in full
    /// before the map is assigned, so a mid-scan failure leaves the old
    /// value intact. A database that cannot be located, or is not
    /// versioned, is silently a no-op.
    fn deep_set(
        &self,
        ctx: &SessionContext,
        ws: &WorkingSetRef,
        table_name: &str,
        new_val: u64,
        sequences: &mut HashMap<String, u64>,
    ) -> Result<()> {
        ctx.check_cancelled()?;

        let Some(provider) = ctx.provider() else {
            return Ok(());
        };
        let Some(db) = provider.database(&self.db_name) else {
            return Ok(());
        };
        if !db.is_versioned() {
            return Ok(());
        }

        let mut max_auto_inc = new_val;

        let mut head_refs = db.branches()?;
        head_refs.extend(db.remote_refs()?);

        for head in head_refs {
            ctx.check_cancelled()?;

            let root = match head.kind() {
                RefKind::Branch => {
                    let Some(ws_ref) = head.working_set_ref() else {
                        continue;
                    };
                    if ws_ref == *ws {
                        // The caller is updating this working set; its
                        // persisted value is the one being replaced.
                        continue;
                    }
                    match db.resolve_working_set(&ws_ref)? {
                        Some(working_set) => working_set.resolve_root()?,
                        // No local working set for this branch; use the
                        // branch head instead.
                        None => db.resolve_commit_ref(&head)?.resolve_root()?,
                    }
                }
                RefKind::Remote => db.resolve_commit_ref(&head)?.resolve_root()?,
                RefKind::Internal => continue,
            };

            if let Some(seq) = persisted_sequence(root.as_ref(), table_name)? {
                trace!(table = table_name, head = head.name(), seq, "scanned head");
                if seq > max_auto_inc {
                    max_auto_inc = seq;
                }
            }
        }

        // No branch holds a higher value than the maximum found, so it is
        // safe to assign.
        debug!(
            db = %self.db_name,
            table = table_name,
            value = max_auto_inc,
            "re-established auto-increment baseline"
        );
        sequences.insert(table_name.to_string(), max_auto_inc);
        Ok(())
    }

    /// Registers a table with an AUTO_INCREMENT column, as necessary. The
    /// sequence starts at 1 only when no other branch already has a table
    /// of this name; an existing entry is left untouched.
    pub fn add_new_table(&self, table_name: &str) {
        let table_name = table_name.to_lowercase();
        let mut sequences = self.sequences.lock();
        sequences.entry(table_name).or_insert(1);
    }

    /// Drops the table named on one branch.
    ///
    /// The sequence restarts at 1 unless a remaining working set still has
    /// a table of this name with an AUTO_INCREMENT column, in which case
    /// the highest persisted value wins. Callers pass every other working
    /// set in scope, omitting the one that just deleted the table.
    pub fn drop_table(
        &self,
        ctx: &SessionContext,
        table_name: &str,
        working_sets: &[&dyn WorkingSet],
    ) -> Result<()> {
        ctx.check_cancelled()?;

        let table_name = table_name.to_lowercase();

        let mut sequences = self.sequences.lock();

        let mut next = 1u64;
        for ws in working_sets {
            ctx.check_cancelled()?;
            let root = ws.working_root()?;
            if let Some(seq) = persisted_sequence(root.as_ref(), &table_name)? {
                if seq > next {
                    next = seq;
                }
            }
        }

        debug!(
            db = %self.db_name,
            table = table_name,
            value = next,
            "reset auto-increment sequence after drop"
        );
        sequences.insert(table_name, next);
        Ok(())
    }
}

/// The persisted next-to-generate value for `table_name` in `root`, or
/// `None` when the table is missing or has no AUTO_INCREMENT column.
fn persisted_sequence(root: &dyn RootValue, table_name: &str) -> Result<Option<u64>> {
    let Some(table) = root.get_table_insensitive(table_name)? else {
        return Ok(None);
    };
    if !table.schema().has_auto_increment() {
        return Ok(None);
    }
    table.auto_increment_value().map(Some)
}

/// Shared handle to a per-database tracker, as held by the registry that
/// owns one tracker per loaded database.
pub type SharedAutoIncrementTracker = Arc<AutoIncrementTracker>;

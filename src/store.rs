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

//! Read-only seams between the tracker and the storage engine.
//!
//! The tracker never touches storage directly: it resolves root values out
//! of anything *rootish* (a commit, a working set, a branch head) and reads
//! table schemas and persisted AUTO_INCREMENT values through these traits.
//! Keeping the seam this narrow is what makes the tracker testable against
//! in-memory fixtures.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::error::Result;

/// Anything that can resolve to a root value: a commit, a working set, or a
/// branch reference.
pub trait Rootish: Send + Sync {
    /// Yields the root value this handle points at.
    fn resolve_root(&self) -> Result<Arc<dyn RootValue>>;
}

/// A snapshot of a database's tables at some root.
pub trait RootValue: Send + Sync {
    /// Invokes `f` for each table with its schema. `f` returns `true` to
    /// stop the iteration early.
    fn iter_tables(
        &self,
        f: &mut dyn FnMut(&str, &dyn Table, &dyn Schema) -> Result<bool>,
    ) -> Result<()>;

    /// Case-insensitive table lookup. `None` when no table matches.
    fn get_table_insensitive(&self, name: &str) -> Result<Option<Arc<dyn Table>>>;
}

/// A single table within a root value.
pub trait Table: Send + Sync {
    /// The table's schema.
    fn schema(&self) -> Arc<dyn Schema>;

    /// The persisted next-to-generate AUTO_INCREMENT value for this table.
    fn auto_increment_value(&self) -> Result<u64>;
}

/// Schema introspection, restricted to what the tracker consumes.
pub trait Schema: Send + Sync {
    /// Whether any column of the table is declared AUTO_INCREMENT.
    fn has_auto_increment(&self) -> bool;
}

/// The flavor of a named ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// A local branch head.
    Branch,
    /// A remote-tracking head: the last known tip of a branch on a remote
    /// replica.
    Remote,
    /// A ref used internally by the storage layer; never scanned by the
    /// tracker.
    Internal,
}

/// A named pointer to a commit: a local branch, a remote-tracking ref, or
/// an internal ref.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeadRef {
    name: String,
    kind: RefKind,
}

impl HeadRef {
    /// A local branch head.
    pub fn branch(name: impl Into<String>) -> Self {
        HeadRef {
            name: name.into(),
            kind: RefKind::Branch,
        }
    }

    /// A remote-tracking head.
    pub fn remote(name: impl Into<String>) -> Self {
        HeadRef {
            name: name.into(),
            kind: RefKind::Remote,
        }
    }

    /// An internal ref.
    pub fn internal(name: impl Into<String>) -> Self {
        HeadRef {
            name: name.into(),
            kind: RefKind::Internal,
        }
    }

    /// The ref's name, e.g. the branch name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ref's flavor.
    pub fn kind(&self) -> RefKind {
        self.kind
    }

    /// The working-set ref paired with this head. Only branch heads carry a
    /// working set.
    pub fn working_set_ref(&self) -> Option<WorkingSetRef> {
        match self.kind {
            RefKind::Branch => Some(WorkingSetRef::new(format!(
                "workingSets/heads/{}",
                self.name
            ))),
            RefKind::Remote | RefKind::Internal => None,
        }
    }
}

/// A named pointer to the in-progress, pre-commit state of a branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkingSetRef(String);

impl WorkingSetRef {
    /// Builds a working-set ref from its path.
    pub fn new(path: impl Into<String>) -> Self {
        WorkingSetRef(path.into())
    }

    /// The ref path.
    pub fn path(&self) -> &str {
        &self.0
    }
}

/// The uncommitted state of a branch, including in-progress edits.
pub trait WorkingSet: Rootish {
    /// The ref naming this working set.
    fn ref_name(&self) -> &WorkingSetRef;

    /// The working root, holding the branch's uncommitted table state.
    fn working_root(&self) -> Result<Arc<dyn RootValue>>;
}

/// The ref registry of one database: branch heads, remote-tracking heads
/// and working sets.
pub trait VersionedDatabase: Send + Sync {
    /// Whether the database is version controlled at all. Non-versioned
    /// databases have no branches to reconcile.
    fn is_versioned(&self) -> bool;

    /// All local branch heads.
    fn branches(&self) -> Result<Vec<HeadRef>>;

    /// All remote-tracking heads.
    fn remote_refs(&self) -> Result<Vec<HeadRef>>;

    /// Resolves a working set by ref. `None` when the branch has no local
    /// working set (e.g. a branch only known from a remote).
    fn resolve_working_set(&self, ws_ref: &WorkingSetRef)
        -> Result<Option<Arc<dyn WorkingSet>>>;

    /// Resolves the commit a head currently points at.
    fn resolve_commit_ref(&self, head: &HeadRef) -> Result<Arc<dyn Rootish>>;
}

/// Locates databases by name for a session.
pub trait DatabaseProvider: Send + Sync {
    /// The named database, if this session can see it.
    fn database(&self, name: &str) -> Option<Arc<dyn VersionedDatabase>>;
}

/// Per-session state handed into tracker operations that fan out across
/// branches: a database locator plus a cooperative cancellation flag.
///
/// Cancellation is observed between collaborator reads; a cancelled
/// operation returns [`Error::Cancelled`](crate::Error::Cancelled) and
/// leaves tracker state unchanged.
#[derive(Clone)]
pub struct SessionContext {
    provider: Option<Arc<dyn DatabaseProvider>>,
    cancelled: Arc<AtomicBool>,
}

impl SessionContext {
    /// A session that can locate databases through `provider`.
    pub fn new(provider: Arc<dyn DatabaseProvider>) -> Self {
        SessionContext {
            provider: Some(provider),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A session with no database provider, e.g. during database load.
    /// Operations that need to locate a database treat it as not found.
    pub fn detached() -> Self {
        SessionContext {
            provider: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The session's database locator, when one is attached.
    pub fn provider(&self) -> Option<&Arc<dyn DatabaseProvider>> {
        self.provider.as_ref()
    }

    /// Requests cancellation. Clones of this context observe the flag.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Errors with [`Error::Cancelled`](crate::Error::Cancelled) once
    /// cancellation has been requested.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(crate::error::Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("has_provider", &self.provider.is_some())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

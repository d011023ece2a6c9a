use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an independent line of history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Branch(pub u64);

impl Branch {
    /// The main line of history.
    pub const TRUNK: Branch = Branch(1);
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "branch-{}", self.0)
    }
}

/// Branch-local, strictly increasing version counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Revision(pub u64);

impl Revision {
    /// Sentinel naming the latest revision of a history.
    pub const CURRENT: Revision = Revision(u64::MAX);

    /// True if this is the latest-revision sentinel.
    pub fn is_current(self) -> bool {
        self == Revision::CURRENT
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_current() {
            f.write_str("current")
        } else {
            write!(f, "r{}", self.0)
        }
    }
}

/// Version-independent identity of an object: branch, declared type, name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    pub branch: Branch,
    pub type_name: String,
    pub object_name: String,
}

impl ObjectIdentity {
    pub fn new(
        branch: Branch,
        type_name: impl Into<String>,
        object_name: impl Into<String>,
    ) -> Self {
        Self {
            branch,
            type_name: type_name.into(),
            object_name: object_name.into(),
        }
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.branch, self.type_name, self.object_name)
    }
}

/// Versioned pointer to an object, used as the value of a reference attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    pub identity: ObjectIdentity,
    pub revision: Revision,
}

impl ObjectKey {
    pub fn new(identity: ObjectIdentity, revision: Revision) -> Self {
        Self { identity, revision }
    }
}

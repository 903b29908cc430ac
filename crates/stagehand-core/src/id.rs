use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a registered object. Cheap to copy and compare.
///
/// Ids are allocated by the registry starting at 1 and only ever count up;
/// an id is never handed out twice within one registry's lifetime, even
/// after its object is removed. "No object" is `Option::<ObjectId>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

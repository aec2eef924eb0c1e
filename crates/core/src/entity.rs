//! Entity traits: identity + continuity across state changes.

use serde::{Deserialize, Serialize};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// The entity types owned by a single service and referenced by others.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Student,
    Course,
    Faculty,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Student => "Student",
            EntityKind::Course => "Course",
            EntityKind::Faculty => "Faculty",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-owner record kept in an entity store.
///
/// A record is its store-assigned id plus a field set that is replaced as a
/// whole on update.
pub trait Record:
    Entity<Id: From<i64> + Into<i64> + Send + Sync + 'static> + Clone + Send + Sync + 'static
{
    /// Client-supplied fields (create and update payload).
    type Fields: Clone + Send + Sync + 'static;

    const KIND: EntityKind;

    fn from_fields(id: Self::Id, fields: Self::Fields) -> Self;

    fn fields(&self) -> Self::Fields;

    /// Replace every field, keeping the identifier.
    fn replace_fields(&mut self, fields: Self::Fields) {
        *self = Self::from_fields(*self.id(), fields);
    }
}

use serde::{Deserialize, Serialize};

use ums_core::{Entity, EntityKind, FacultyId, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyFields {
    pub name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
}

/// A faculty member as stored and served by the Faculty service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
}

impl Entity for Faculty {
    type Id = FacultyId;

    fn id(&self) -> &FacultyId {
        &self.id
    }
}

impl Record for Faculty {
    type Fields = FacultyFields;

    const KIND: EntityKind = EntityKind::Faculty;

    fn from_fields(id: FacultyId, fields: FacultyFields) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            department: fields.department,
            designation: fields.designation,
        }
    }

    fn fields(&self) -> FacultyFields {
        FacultyFields {
            name: self.name.clone(),
            email: self.email.clone(),
            department: self.department.clone(),
            designation: self.designation.clone(),
        }
    }
}

use serde::{Deserialize, Serialize};

use ums_core::{Entity, EntityKind, Record, StudentId};

/// Client-supplied student fields (create and full-replacement update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: i32,
}

/// A student record as stored and served by the Student service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: i32,
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> &StudentId {
        &self.id
    }
}

impl Record for Student {
    type Fields = StudentFields;

    const KIND: EntityKind = EntityKind::Student;

    fn from_fields(id: StudentId, fields: StudentFields) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            department: fields.department,
            year: fields.year,
        }
    }

    fn fields(&self) -> StudentFields {
        StudentFields {
            name: self.name.clone(),
            email: self.email.clone(),
            department: self.department.clone(),
            year: self.year,
        }
    }
}

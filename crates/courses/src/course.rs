use serde::{Deserialize, Serialize};

use ums_core::{CourseId, Entity, EntityKind, Record};

/// Client-supplied course fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseFields {
    pub name: String,
    pub code: String,
    pub department: String,
    pub credits: i32,
    pub semester: String,
}

/// A course record as stored and served by the Course service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub department: String,
    pub credits: i32,
    pub semester: String,
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> &CourseId {
        &self.id
    }
}

impl Record for Course {
    type Fields = CourseFields;

    const KIND: EntityKind = EntityKind::Course;

    fn from_fields(id: CourseId, fields: CourseFields) -> Self {
        Self {
            id,
            name: fields.name,
            code: fields.code,
            department: fields.department,
            credits: fields.credits,
            semester: fields.semester,
        }
    }

    fn fields(&self) -> CourseFields {
        CourseFields {
            name: self.name.clone(),
            code: self.code.clone(),
            department: self.department.clone(),
            credits: self.credits,
            semester: self.semester.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn update_replaces_every_field(credits in 0i32..12, code in "[A-Z]{2,4}[0-9]{3}") {
            let mut c = Course::from_fields(CourseId::new(10), CourseFields {
                name: "Algorithms".into(),
                code: "CS201".into(),
                department: "CS".into(),
                credits: 4,
                semester: "Fall".into(),
            });
            let next = CourseFields {
                name: "Compilers".into(),
                code,
                department: "CS".into(),
                credits,
                semester: "Spring".into(),
            };
            c.replace_fields(next.clone());
            prop_assert_eq!(c.fields(), next);
            prop_assert_eq!(c.id, CourseId::new(10));
        }
    }

    #[test]
    fn json_shape_is_flat() {
        let c = Course::from_fields(CourseId::new(3), CourseFields {
            name: "Databases".into(),
            code: "CS340".into(),
            department: "CS".into(),
            credits: 3,
            semester: "Fall".into(),
        });
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["id"], 3);
        assert_eq!(v["code"], "CS340");
    }
}

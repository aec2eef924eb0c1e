//! Process configuration, read from environment variables at startup.

use core::str::FromStr;

use thiserror::Error;
use ums_faculty::DuplicatePolicy;

use crate::existence::UnknownPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STUDENT_SERVICE_URL: &str = "http://localhost:8081";
pub const DEFAULT_COURSE_SERVICE_URL: &str = "http://localhost:8082";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?} (expected one of: {expected})")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which of the four services this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Student,
    Course,
    Faculty,
    Enrollment,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Student => "student",
            ServiceKind::Course => "course",
            ServiceKind::Faculty => "faculty",
            ServiceKind::Enrollment => "enrollment",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" | "students" => Ok(ServiceKind::Student),
            "course" | "courses" => Ok(ServiceKind::Course),
            "faculty" => Ok(ServiceKind::Faculty),
            "enrollment" | "enrollments" => Ok(ServiceKind::Enrollment),
            _ => Err(ConfigError::Invalid {
                var: "UMS_SERVICE",
                value: s.to_string(),
                expected: "student, course, faculty, enrollment",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub service: ServiceKind,
    pub bind_addr: String,
    /// Postgres URL; `None` selects in-memory stores.
    pub database_url: Option<String>,
    pub student_service_url: String,
    pub course_service_url: String,
    pub unknown_policy: UnknownPolicy,
    pub duplicate_policy: DuplicatePolicy,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let service = non_empty("UMS_SERVICE")
            .ok_or(ConfigError::Missing("UMS_SERVICE"))?
            .parse::<ServiceKind>()?;

        let unknown_policy = match non_empty("UMS_UNKNOWN_EXISTENCE").as_deref() {
            None | Some("absent") => UnknownPolicy::TreatAsAbsent,
            Some("propagate") => UnknownPolicy::Propagate,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "UMS_UNKNOWN_EXISTENCE",
                    value: other.to_string(),
                    expected: "absent, propagate",
                });
            }
        };

        let duplicate_policy = match non_empty("UMS_ASSIGNMENT_DUPLICATES").as_deref() {
            None | Some("allow") => DuplicatePolicy::Allow,
            Some("reject") => DuplicatePolicy::Reject,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "UMS_ASSIGNMENT_DUPLICATES",
                    value: other.to_string(),
                    expected: "allow, reject",
                });
            }
        };

        Ok(Self {
            service,
            bind_addr: non_empty("UMS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: non_empty("DATABASE_URL"),
            student_service_url: non_empty("STUDENT_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_STUDENT_SERVICE_URL.to_string()),
            course_service_url: non_empty("COURSE_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_COURSE_SERVICE_URL.to_string()),
            unknown_policy,
            duplicate_policy,
        })
    }

    /// In-memory config for the given service with default peers/policies.
    pub fn in_memory(service: ServiceKind) -> Self {
        Self {
            service,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            student_service_url: DEFAULT_STUDENT_SERVICE_URL.to_string(),
            course_service_url: DEFAULT_COURSE_SERVICE_URL.to_string(),
            unknown_policy: UnknownPolicy::default(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

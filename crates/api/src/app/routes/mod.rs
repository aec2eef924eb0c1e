pub mod enrollment;
pub mod faculty;
pub mod records;
pub mod system;

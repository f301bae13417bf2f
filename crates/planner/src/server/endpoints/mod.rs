pub mod semesters;
pub mod status;
pub mod subjects;

pub mod notification;
pub mod student;

pub mod application;
pub mod application_note;
pub mod job;
pub mod job_stage;
pub mod user;

pub use user::Role;

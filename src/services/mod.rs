pub mod catalog;
pub mod identity;
pub mod notes;
pub mod pipeline;
pub mod resume_parser;
pub mod storage;
pub mod views;

pub mod apply;
pub mod common;
pub mod functions;
pub mod types;

pub mod archive;
pub mod raw;
pub mod repos;

pub mod branches;
pub mod browse;
pub mod metadata;
pub mod tags;

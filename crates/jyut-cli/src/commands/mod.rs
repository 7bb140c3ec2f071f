pub mod batch;
pub mod cache_ops;
pub mod config_ops;
pub mod reverse;
pub mod romanize;

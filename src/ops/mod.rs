pub mod drag;
pub mod filter;
pub mod store;
pub mod task_ops;

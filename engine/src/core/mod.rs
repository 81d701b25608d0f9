pub mod entity;
pub mod handle;

// The digest pipeline, one module per stage, leaves first.

pub mod digest;
pub mod dispatch;
pub mod fetch;
pub mod filter;
pub mod select;

// Threadmail: an email digest of the most-liked recent posts.
//
// This is the library root. Each module corresponds to one part of the
// digest pipeline or one of the external services it talks to.

pub mod config;
pub mod inputs;
pub mod mail;
pub mod output;
pub mod pipeline;
pub mod post;
pub mod twitter;

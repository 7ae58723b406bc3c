//! # CLI - tsmerge shell
//!
//! An interactive shell over the [`reads`] merge layer. It opens text shard
//! files (see [`shard`]) and merges them the way a query would: series in
//! tag order through a [`reads::MergedResultSet`], tag values through a
//! [`reads::MergedStringIterator`].
//!
//! | Module      | Purpose                                         |
//! |-------------|-------------------------------------------------|
//! | [`config`]  | `TSMERGE_*` environment configuration           |
//! | [`shard`]   | Shard file parsing and the `ShardResultSet`     |
//! | [`session`] | Command dispatch for the REPL                   |

pub mod config;
pub mod session;
pub mod shard;

pub use config::Config;
pub use session::Session;
pub use shard::{tag_values, ShardResultSet};

//! # CLI - tsmerge interactive shell
//!
//! A REPL over text shard files. Reads commands from stdin, merges the
//! opened shards and prints results to stdout. Logs go to stderr, so
//! piping commands through stdin gives clean output for scripted tests.
//!
//! ## Commands
//!
//! ```text
//! OPEN path...        Add shard files to the session
//! SHARDS              List opened shards
//! SERIES              Merge every shard, print series in tag order
//! TAGVALUES key       Distinct values of a tag key across shards
//! STATS               Scan stats of the last SERIES / TAGVALUES
//! CLEAR               Forget every opened shard
//! EXIT / QUIT         Leave the shell
//! ```
//!
//! ## Configuration
//!
//! ```text
//! TSMERGE_SHARDS   comma-separated shard paths opened at startup (default: none)
//! TSMERGE_POINTS   print points under each series         (default: "true")
//! TSMERGE_LOG      tracing filter directive                (default: "warn")
//! ```
//!
//! ## Example
//!
//! ```text
//! $ TSMERGE_SHARDS=a.shard,b.shard cargo run -p cli
//! tsmerge started (shards=2, points=true)
//! > SERIES
//! host=a
//!   1 1.5
//! host=b
//!   1 true
//! (2 series)
//! > EXIT
//! bye
//! ```

use anyhow::Result;
use cli::{Config, Session};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn init_tracing(filter: &str) {
    let result = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .with_env_filter(EnvFilter::new(filter))
        .try_init();
    if let Err(e) = result {
        eprintln!("Failed to set logger: {e:?}");
    }
}

fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(&config.log_filter);

    println!(
        "tsmerge started (shards={}, points={})",
        config.shards.len(),
        config.show_points
    );
    println!("Commands: OPEN path... | SHARDS | SERIES | TAGVALUES key");
    println!("          STATS | CLEAR | EXIT");

    let mut session = Session::new(config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    write!(out, "> ")?;
    out.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        if !session.execute(&line, &mut out)? {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    Ok(())
}

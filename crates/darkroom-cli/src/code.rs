//! # `darkroom code`
//!
//! Prints freshly drawn join codes, one per line. Codes are unique within
//! one invocation; they are not reserved anywhere.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use darkroom_core::{JoinCode, SystemClock};
use darkroom_directory::{CodeDirectory, InMemoryRegistry};

/// Code subcommand arguments.
#[derive(Args, Debug)]
pub struct CodeArgs {
    /// How many codes to print.
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=10_000))]
    pub count: u16,
}

/// Draw `count` distinct codes.
pub fn generate_codes(count: usize) -> Result<Vec<JoinCode>> {
    let directory = CodeDirectory::new(InMemoryRegistry::new(), Arc::new(SystemClock));
    let mut seen = HashSet::with_capacity(count);
    let mut codes = Vec::with_capacity(count);
    while codes.len() < count {
        let code = directory.generate()?;
        if seen.insert(code.clone()) {
            codes.push(code);
        }
    }
    Ok(codes)
}

/// Execute the code subcommand.
pub fn run_code(args: &CodeArgs) -> Result<u8> {
    for code in generate_codes(usize::from(args.count))? {
        println!("{code}");
    }
    Ok(0)
}

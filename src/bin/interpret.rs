//! Interpreter command-line.
//!
//! Takes exactly one argument naming the program file.  Program output goes to stdout;
//! diagnostics go to stderr as single lines, with a non-zero exit status.

use std::env;
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::process;

use anyhow::{bail, Context};

use interpret::interpreter::Interpreter;

fn main() {
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), anyhow::Error> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.len() != 1 {
        bail!("usage: interpret <program-file>");
    }

    let file = File::open(&args[0]).with_context(|| args[0].clone())?;

    let mut stdout = io::stdout();
    let result = Interpreter::new(&mut stdout).run(io::BufReader::new(file));

    // Output already produced must reach the terminal even when a later statement fails.
    let _ = stdout.flush();

    result?;
    Ok(())
}

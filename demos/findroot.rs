//! Find the k-th root of a number by bisection.
//!
//! The number is taken from the command line or, when absent, read
//! from the standard input.  Set `RUST_LOG=kroot=trace` to follow the
//! bisection steps.

use std::{error::Error, io::{self, BufRead, Write}};
use clap::Parser;
use kroot::{find_root, Estimate};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Compute the k-th root of a non-negative number by bisection")]
struct Args {
    /// Number whose root is sought (prompted for when omitted).
    #[arg(allow_negative_numbers = true)]
    n: Option<f64>,

    /// Degree of the root.
    #[arg(short, long, default_value_t = 2)]
    degree: u32,

    /// Largest accepted width of the final bracket.
    #[arg(long, default_value_t = 1e-9)]
    atol: f64,

    /// Report the upper bound of the final bracket instead of its midpoint.
    #[arg(long)]
    upper: bool,
}

fn read_number(prompt: &str) -> Result<f64, Box<dyn Error + Send + Sync + 'static>> {
    print!("{prompt} ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().parse()?)
}

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
                         .unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let n = match args.n {
        Some(n) => n,
        None => read_number("Enter a number:")?,
    };
    let estimate = if args.upper { Estimate::Upper } else { Estimate::Midpoint };
    let r = find_root(n, args.degree).atol(args.atol).estimate(estimate).root()?;

    match args.degree {
        2 => println!("The square root is: {r}"),
        3 => println!("The cube root is: {r}"),
        k => println!("The {k}-th root is: {r}"),
    }
    Ok(())
}

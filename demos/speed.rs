// Trivial code to have a rough estimate of the speed.

use std::{error::Error, time::Instant};
use kroot::kth_root;

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let mut sum = 0.; // do something with the roots to avoid dead code removal

    let now = Instant::now();
    for _ in 0..10_000 {
        for i in 2..100 {
            sum += kth_root(i as f64, 2)?;
        }
    }
    println!("kth_root sum: {:.12} ({} secs)", sum,
             now.elapsed().as_secs_f64());

    let mut sum = 0.;
    let now = Instant::now();
    for _ in 0..10_000 {
        for i in 2..100 {
            sum += (i as f64).sqrt();
        }
    }
    println!("sqrt sum:     {:.12} ({} secs)", sum,
             now.elapsed().as_secs_f64());
    Ok(())
}

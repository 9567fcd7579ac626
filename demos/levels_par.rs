//! Cube roots of random targets, computed in parallel, compared
//! with `powf`.

use std::{error::Error, iter, time::Instant};
use kroot::kth_root;
use rand::prelude::*;
use rayon::prelude::*;

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    const N: usize = 100_000;
    let targets: Vec<f64> = iter::from_fn(|| Some(1e4 * random::<f64>()))
        .take(N).collect();

    let now = Instant::now();
    let roots = targets
        .par_iter()
        .map(|&n| kth_root(n, 3))
        .collect::<Result<Vec<_>, _>>()?;
    println!("kth_root: {} secs", now.elapsed().as_secs_f64());

    let max_err = targets.iter().zip(&roots)
        .map(|(n, r)| (r - n.powf(1. / 3.)).abs())
        .fold(0., f64::max);
    println!("max |kth_root - powf| = {max_err:e}");

    Ok(())
}

/// Targets used by the benchmarks.
pub const TARGETS: [f64; 6] = [0.5, 2., 27., 1600., 1e6, 1e12];

/// Tolerances for the "roots" crate.
pub struct Tol {
    pub rtol: f64,
    pub atol: f64,
    pub maxiter: usize,
}

impl roots::Convergency<f64> for Tol {
    fn is_root_found(&mut self, y: f64) -> bool {
        y == 0.
    }

    fn is_converged(&mut self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.rtol * a.abs().max(b.abs()) + self.atol
    }

    fn is_iteration_limit_reached(&mut self, iter: usize) -> bool {
        iter > self.maxiter
    }
}

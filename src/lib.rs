//! K-th roots of non-negative real numbers by bisection.
//!
//! Given a target `n ≥ 0` and a degree `k ≥ 1`, this crate computes
//! an approximation of the real root `n^(1/k)` by narrowing a bracket
//! \[`low`, `high`\] until its width is within a tolerance.  The only
//! operations performed on the numbers are comparisons, additions,
//! halvings and repeated multiplications (see [`integer_power`]), so
//! the result does not depend on the platform `powf`.
//!
//! # Example
//!
//! The solver is configured with a builder returned by [`find_root`]
//! (specify the target and the degree) which provides methods to set
//! various parameters (such as [`atol`][FindRoot::atol]) and
//! functions to compute the root (such as [`root`][FindRoot::root]
//! and [`bracket`][FindRoot::bracket]).
//!
//! ```
//! # fn main() -> Result<(), kroot::Error> {
//! use kroot::find_root;
//! assert!((find_root(1600., 2).root()? - 40f64).abs() <= 1e-9);
//! assert!((find_root(27., 3).atol(1e-12).root()? - 3f64).abs() <= 1e-12);
//! # Ok(()) }
//! ```
//!
//! The degree may be any integer or a real number close to a
//! positive integer, so that a computed root can be used as a degree:
//!
//! ```
//! # fn main() -> Result<(), kroot::Error> {
//! use kroot::kth_root;
//! let k = kth_root(4., 2)?;
//! assert_eq!(kth_root(1600., k)?, kth_root(1600., 2)?);
//! # Ok(()) }
//! ```
//!
//! # Logging
//!
//! Each bisection step is reported as a `trace` event and the
//! outcome of a computation as a `debug` event through [`tracing`].
//! Install a subscriber to see them.

use std::{
    fmt::{self, Debug, Display, Formatter},
    num::NonZeroU32,
    ops::{Add, Mul, Neg, Sub},
    result::Result,
};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that may be returned by the root finding methods.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// The degree is not a positive integer fitting in a `u32` (or a
    /// negative exponent was given to [`checked_integer_power`]).
    #[error("the degree must be a positive integer, got {degree}")]
    InvalidDegree { degree: f64 },
    /// The target is negative, NaN or infinite.
    #[error("the target must be finite and non-negative, got {n}")]
    InvalidTarget { n: f64 },
    /// Report that the maximum number of iterations has been reached,
    /// when option [`maxiter_err`][FindRoot::maxiter_err] is turned on.
    #[error("maximum number of iterations reached")]
    MaxIter,
}

////////////////////////////////////////////////////////////////////////
//
// Real types

/// Trait indicating that the type can be used as target, bracket
/// bound and result of the solver.
pub trait Real:
    Copy
    + PartialOrd
    + Debug
    + Display
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    /// Type for the default termination criteria.
    type DefaultTerminate: Default + Terminate<Self>;

    const ZERO: Self;
    const ONE: Self;

    /// Returns `true` iff `self` is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Return the midpoint of the interval \[`a`, `b`\].  The bounds
    /// may be assumed to be finite.
    fn mid(a: Self, b: Self) -> Self;

    /// Convert `self` to `f64` (used to report errors).
    fn to_f64(self) -> f64;
}

macro_rules! impl_real_fXX {
    ($t: ty) => {
        impl Real for $t {
            type DefaultTerminate = Tol<$t>;
            const ZERO: Self = 0.;
            const ONE: Self = 1.;
            #[inline]
            fn is_finite(self) -> bool { <$t>::is_finite(self) }
            #[inline]
            fn mid(a: Self, b: Self) -> Self {
                // The sum may overflow for bounds close to the maximum
                // finite value.
                let mid = 0.5 * (a + b);
                if mid.is_finite() { mid } else { 0.5 * a + 0.5 * b }
            }
            #[inline]
            fn to_f64(self) -> f64 { f64::from(self) }
        }
    }
}

impl_real_fXX!(f64);
impl_real_fXX!(f32);

////////////////////////////////////////////////////////////////////////
//
// Numeric primitives

/// Return `x` if `x ≥ 0` and `-x` otherwise.
///
/// ```
/// use kroot::absolute;
/// assert_eq!(absolute(-2.5), 2.5);
/// assert_eq!(absolute(3f32), 3.);
/// ```
#[inline]
pub fn absolute<T: Real>(x: T) -> T {
    if x >= T::ZERO { x } else { -x }
}

/// Return `base` multiplied by itself `exponent` times.
/// `integer_power(base, 0)` is `1` for every `base`, NaN included.
///
/// The product is accumulated one factor at a time, so the result
/// is exactly the one of the naive loop.
///
/// ```
/// use kroot::integer_power;
/// assert_eq!(integer_power(3., 4), 81.);
/// assert_eq!(integer_power(f64::NAN, 0), 1.);
/// ```
pub fn integer_power<T: Real>(base: T, exponent: u32) -> T {
    let mut ret = T::ONE;
    let mut n = exponent;
    // For a non-negative base, 0 and +∞ are fixed points of `ret * base`.
    let saturates = base >= T::ZERO;
    while n > 0 {
        ret = ret * base;
        n -= 1;
        if saturates && (ret == T::ZERO || !ret.is_finite()) {
            break;
        }
    }
    ret
}

/// Same as [`integer_power`] for a signed exponent.  Negative
/// exponents (and exponents larger than [`u32::MAX`]) are rejected
/// with [`Error::InvalidDegree`].
///
/// ```
/// use kroot::{checked_integer_power, Error};
/// assert_eq!(checked_integer_power(2., 10), Ok(1024.));
/// assert!(matches!(checked_integer_power(2., -1),
///                  Err(Error::InvalidDegree { .. })));
/// ```
pub fn checked_integer_power<T: Real>(
    base: T, exponent: i64
) -> Result<T, Error> {
    let e = u32::try_from(exponent)
        .map_err(|_| Error::InvalidDegree { degree: exponent as f64 })?;
    Ok(integer_power(base, e))
}

////////////////////////////////////////////////////////////////////////
//
// Degree

/// Degree `k ≥ 1` of a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Degree(NonZeroU32);

impl Degree {
    /// Return the degree `k`, or [`Error::InvalidDegree`] if `k = 0`.
    pub fn new(k: u32) -> Result<Self, Error> {
        NonZeroU32::new(k)
            .map(Degree)
            .ok_or(Error::InvalidDegree { degree: f64::from(k) })
    }

    /// The degree as a plain integer (always ≥ 1).
    #[inline]
    #[must_use]
    pub fn get(self) -> u32 { self.0.get() }
}

impl From<NonZeroU32> for Degree {
    fn from(k: NonZeroU32) -> Self { Degree(k) }
}

impl Display for Degree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Types that can be converted to a [`Degree`].
///
/// All primitive integer types are accepted as long as the value
/// lies in 1 ..= [`u32::MAX`].  Floats are accepted when they are
/// within `1e-6` of such an integer, which allows to use the result
/// of a root computation as a degree.
pub trait IntoDegree {
    fn into_degree(self) -> Result<Degree, Error>;
}

impl IntoDegree for Degree {
    #[inline]
    fn into_degree(self) -> Result<Degree, Error> { Ok(self) }
}

impl IntoDegree for NonZeroU32 {
    #[inline]
    fn into_degree(self) -> Result<Degree, Error> { Ok(Degree(self)) }
}

macro_rules! impl_into_degree_int { ($($t: ty),*) => { $(
    impl IntoDegree for $t {
        #[inline]
        fn into_degree(self) -> Result<Degree, Error> {
            u32::try_from(self).ok()
                .and_then(NonZeroU32::new)
                .map(Degree)
                .ok_or(Error::InvalidDegree { degree: self as f64 })
        }
    }
)* }}

impl_into_degree_int!(u8, u16, u32, u64, u128, usize,
                      i8, i16, i32, i64, i128, isize);

/// Largest distance to the nearest integer for a float to be
/// accepted as a degree.
const DEGREE_SLACK: f64 = 1e-6;

macro_rules! impl_into_degree_float { ($t: ty) => {
    impl IntoDegree for $t {
        fn into_degree(self) -> Result<Degree, Error> {
            let k = f64::from(self);
            let nearest = k.round();
            // NaN fails the first comparison.
            if absolute(k - nearest) <= DEGREE_SLACK
                && (1. ..= f64::from(u32::MAX)).contains(&nearest) {
                Degree::new(nearest as u32)
            } else {
                Err(Error::InvalidDegree { degree: k })
            }
        }
    }
}}

impl_into_degree_float!(f64);
impl_into_degree_float!(f32);

////////////////////////////////////////////////////////////////////////
//
// Termination

/// Trait for termination criteria of the bisection.
pub trait Terminate<T> {
    /// Return `true` if the bracket \[`low`, `high`\] of the root is
    /// deemed good enough.  You can assume that `low <= high`.
    ///
    /// This function may mutate `self` (to count the calls for
    /// example).
    fn stop(&mut self, low: T, high: T) -> bool;
}

/// Indicate that the type `Self` uses relative and absolute
/// tolerances that can be updated from type `U`.
pub trait SetTolerances<U> {
    /// Set the relative tolerance.  Set the default value if `rtol` is ≤ 0.
    fn set_rtol(&mut self, rtol: U);
    /// Set the absolute tolerance.  Set the default value if `atol` is < 0.
    fn set_atol(&mut self, atol: U);
}

/// Enable using a closure `stop` as a termination criterion.  The
/// call `stop(low, high)` must return `true` if the bracket
/// \[`low`, `high`\] is satisfactory.
impl<T, F> Terminate<T> for F
where
    F: FnMut(T, T) -> bool,
    T: Real,
{
    fn stop(&mut self, low: T, high: T) -> bool {
        self(low, high)
    }
}

/// Termination criterion based on a relative tolerance `rtol` and
/// an absolute tolerance `atol`: the bracket \[`low`, `high`\] is
/// accepted when `high - low` ≤ `rtol` · max{|low|, |high|} + `atol`.
///
/// The defaults are `rtol = 0` and `atol = 1e-9` for [`f64`]
/// (resp. `atol = 1e-5` for [`f32`]), that is a plain bound on the
/// width of the final bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct Tol<U> {
    /// Relative tolerance.
    pub rtol: U,
    /// Absolute tolerance.
    pub atol: U,
}

macro_rules! impl_traits_tol_fXX {
    ($t: ty, $rtol: expr, $atol: expr) => {
        impl Default for Tol<$t> {
            fn default() -> Self { Tol { rtol: $rtol, atol: $atol } }
        }
        impl Terminate<$t> for Tol<$t> {
            #[inline]
            fn stop(&mut self, low: $t, high: $t) -> bool {
                high - low
                    <= self.rtol * absolute(low).max(absolute(high)) + self.atol
            }
        }
        impl SetTolerances<$t> for Tol<$t> {
            fn set_rtol(&mut self, rtol: $t) {
                self.rtol = if rtol > 0. { rtol } else { $rtol }
            }
            fn set_atol(&mut self, atol: $t) {
                self.atol = if atol >= 0. { atol } else { $atol }
            }
        }
    }
}

impl_traits_tol_fXX!(f64, 0., 1e-9);
impl_traits_tol_fXX!(f32, 0., 1e-5);

////////////////////////////////////////////////////////////////////////
//
// Bisection

/// Default maximum number of iterations.  Starting from any finite
/// bracket, `f64` runs out of representable midpoints well before.
pub const DEFAULT_MAXITER: usize = 2000;

/// Which point of the final bracket is reported as the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Estimate {
    /// Midpoint of the final bracket.
    #[default]
    Midpoint,
    /// Upper bound of the final bracket, whose k-th power is ≥ `n`.
    Upper,
}

impl Estimate {
    #[inline]
    fn pick<T: Real>(self, low: T, high: T) -> T {
        match self {
            Estimate::Midpoint => T::mid(low, high),
            Estimate::Upper => high,
        }
    }
}

/// Compute the `k`-th root of `n` using the bisection algorithm.
///
/// The search starts with the bracket \[0, max{`n`, 1}\] and halves
/// it until the termination criterion accepts it.  At every step the
/// midpoint `mid` replaces the upper bound if `mid^k > n` and the
/// lower bound if `mid^k < n`; if `mid^k = n`, `mid` is returned.
///
/// The default stopping criterion for [`f64`] (resp. [`f32`]) is
/// given by [`Tol`] with `rtol: 0` and `atol: 1e-9` (resp. `atol:
/// 1e-5`).  The search also stops when no float lies strictly inside
/// the bracket, so it terminates for large targets even when the
/// spacing of floats exceeds `atol`.
///
/// The default maximum number of iterations is [`DEFAULT_MAXITER`]
/// and reaching that many iteration simply returns the root (you
/// can report that as an error by calling
/// [`maxiter_err`][FindRoot::maxiter_err]`(true)`).  Nothing is
/// computed until the [`root`][FindRoot::root],
/// [`bracket`][FindRoot::bracket] or [`root_mut`][FindRoot::root_mut]
/// method is used on the result.  An invalid degree or target is
/// reported by these methods.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), kroot::Error> {
/// use kroot::find_root;
/// assert!((find_root(2., 2).atol(0.).root()? - 2f64.sqrt()).abs() < 1e-15);
/// let (low, high) = find_root(0.25, 2).bracket()?;
/// assert!(low <= 0.5 && 0.5 <= high && high - low <= 1e-9);
/// # Ok(()) }
/// ```
///
/// Invalid inputs are reported as errors.
///
/// ```
/// use kroot::{find_root, Error};
/// assert!(matches!(find_root(-8., 3).root(),
///                  Err(Error::InvalidTarget { .. })));
/// assert!(matches!(find_root(8., 0).root(),
///                  Err(Error::InvalidDegree { .. })));
/// ```
pub fn find_root<T, K>(n: T, k: K) -> FindRoot<T, T::DefaultTerminate>
where
    T: Real,
    K: IntoDegree,
{
    FindRoot {
        n,
        k: k.into_degree(),
        t: T::DefaultTerminate::default(),
        maxiter: DEFAULT_MAXITER,
        maxiter_err: false,
        estimate: Estimate::Midpoint,
    }
}

/// Return the `k`-th root of `n` computed with the default options
/// of [`find_root`].
///
/// ```
/// # fn main() -> Result<(), kroot::Error> {
/// assert!((kroot::kth_root(9., 2)? - 3f64).abs() <= 1e-9);
/// # Ok(()) }
/// ```
pub fn kth_root<T, K>(n: T, k: K) -> Result<T, Error>
where
    T: Real,
    K: IntoDegree,
{
    find_root(n, k).root()
}

/// Bisection options for the computation of a k-th root.  Created
/// by [`find_root`].
pub struct FindRoot<T, Term>
where Term: Terminate<T> {
    n: T,
    k: Result<Degree, Error>,  // Validated lazily.
    t: Term,  // Termination criterion
    maxiter: usize,
    maxiter_err: bool,
    estimate: Estimate,
}

impl<T, Term> FindRoot<T, Term>
where Term: Terminate<T> {
    /// Set the maximum number of iterations.
    ///
    /// If `n` is `0`, it is interpreted as “unlimited” (actually
    /// [`usize::MAX`]).
    pub fn maxiter(mut self, n: usize) -> Self {
        if n == 0 {
            self.maxiter = usize::MAX;
        } else {
            self.maxiter = n;
        }
        self
    }

    /// If `err` is `true` report the reach of the maximum number
    /// of iterations as an error.  Otherwise, just stop working
    /// and provide the estimate of the root after the maximum
    /// number of iterations.
    pub fn maxiter_err(mut self, err: bool) -> Self {
        self.maxiter_err = err;
        self
    }

    /// Choose which point of the final bracket is returned by
    /// [`root`][FindRoot::root].  Default: [`Estimate::Midpoint`].
    pub fn estimate(mut self, e: Estimate) -> Self {
        self.estimate = e;
        self
    }

    /// Change the termination criterion to `t`.
    ///
    /// You can use a closure `FnMut(T, T) -> bool` as the
    /// termination criterion `t`.
    pub fn terminate<Tr>(self, t: Tr) -> FindRoot<T, Tr>
    where Tr: Terminate<T> {
        FindRoot {
            t,
            n: self.n,
            k: self.k,
            maxiter: self.maxiter,
            maxiter_err: self.maxiter_err,
            estimate: self.estimate,
        }
    }

    /// Set the the relative tolerance of the termination criterion
    /// (that implements [`SetTolerances`]), leaving unchanged the
    /// value of the absolute tolerance.
    ///
    /// Set the default value if `rtol` is ≤ 0.
    pub fn rtol<U>(mut self, rtol: U) -> Self
    where Term: SetTolerances<U> {
        self.t.set_rtol(rtol);
        self
    }

    /// Set the the absolute tolerance of the termination criterion
    /// (that implements [`SetTolerances`]), leaving unchanged the
    /// value of the relative tolerance.
    ///
    /// Set the default value if `atol` is < 0.
    pub fn atol<U>(mut self, atol: U) -> Self
    where Term: SetTolerances<U> {
        self.t.set_atol(atol);
        self
    }
}

impl<T, Term> FindRoot<T, Term>
where
    T: Real,
    Term: Terminate<T>,
{
    /// Return `Ok(r)` where `r` is an approximate `k`-th root of `n`
    /// or `Err` indicating that the degree or the target is invalid
    /// or, if [`maxiter_err`][FindRoot::maxiter_err] was turned on,
    /// that the maximum number of iterations was reached.
    pub fn root(&mut self) -> Result<T, Error> {
        let mut x = T::ZERO;
        self.root_mut(&mut x).and(Ok(x))
    }

    /// Return an interval containing the root.  See
    /// [`root_mut`][FindRoot::root_mut] for more information.
    pub fn bracket(&mut self) -> Result<(T, T), Error> {
        let mut x = T::ZERO;
        self.root_mut(&mut x)
    }

    /// Use the bisection algorithm to approximate the `k`-th root of
    /// `n` (see [`find_root`]).  Store this approximation in `root`
    /// and return an interval \[low, high\] containing it such that
    /// low^k ≤ `n` ≤ high^k (up to the rounding of the powers) and
    /// satisfying the termination criterion [`Terminate`].
    ///
    /// A degenerate interval \[r, r\] is returned when r^k = `n`
    /// holds exactly, in particular for `n = 0` (no iteration is
    /// performed) and `n = 1`.
    pub fn root_mut(&mut self, root: &mut T) -> Result<(T, T), Error> {
        let k = self.k?.get();
        let n = self.n;
        if !(n >= T::ZERO && n.is_finite()) {
            return Err(Error::InvalidTarget { n: n.to_f64() })
        }
        let mut low = T::ZERO;
        // For n < 1 the root lies in [n, 1].
        let mut high = if n > T::ONE { n } else { T::ONE };
        if integer_power(low, k) == n { // n = 0
            debug!(degree = k, "zero target");
            *root = low;
            return Ok((low, low))
        }
        if integer_power(high, k) == n {
            debug!(degree = k, "upper bound is an exact root");
            *root = high;
            return Ok((high, high))
        }
        // 0 = low^k < n < high^k
        for iter in 0 .. self.maxiter {
            if self.t.stop(low, high) {
                debug!(degree = k, iter, low = ?low, high = ?high,
                       "bracket accepted");
                *root = self.estimate.pick(low, high);
                return Ok((low, high))
            }
            let mid = T::mid(low, high);
            if !(low < mid && mid < high) {
                debug!(degree = k, iter, low = ?low, high = ?high,
                       "float resolution reached");
                *root = self.estimate.pick(low, high);
                return Ok((low, high))
            }
            trace!(iter, low = ?low, high = ?high, mid = ?mid,
                   "bisection step");
            let p = integer_power(mid, k);
            if p > n { high = mid }
            else if p < n { low = mid }
            else {
                debug!(degree = k, iter, root = ?mid, "exact root");
                *root = mid;
                return Ok((mid, mid))
            }
        }

        debug!(degree = k, maxiter = self.maxiter, low = ?low, high = ?high,
               "maximum number of iterations reached");
        if self.maxiter_err {
            Err(Error::MaxIter)
        } else {
            *root = self.estimate.pick(low, high);
            Ok((low, high))
        }
    }
}

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

////////////////////////////////////////////////////////////////////////
//
// Tests

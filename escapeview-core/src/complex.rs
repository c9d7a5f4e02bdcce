use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A complex number represented as two `f64` components.
///
/// `Copy` and allocation-free so it can sit in the per-pixel escape loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Returns `|z|`, computed with `hypot` to avoid overflow.
    #[inline]
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Principal square root: `√r · e^{iθ/2}` with `θ ∈ (−π, π]`.
    pub fn sqrt(self) -> Self {
        let r = self.norm();
        if r == 0.0 {
            return Self::ZERO;
        }
        let half_theta = 0.5 * self.im.atan2(self.re);
        let root_r = r.sqrt();
        Self::new(root_r * half_theta.cos(), root_r * half_theta.sin())
    }
}

// -- Arithmetic operators --

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{} + {}i", self.re, self.im)
        } else {
            write!(f, "{} - {}i", self.re, -self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn addition_and_subtraction() {
        let a = Complex::new(5.0, 3.0);
        let b = Complex::new(2.0, 1.0);
        let sum = a + b;
        let diff = a - b;
        assert!(approx_eq(sum.re, 7.0) && approx_eq(sum.im, 4.0));
        assert!(approx_eq(diff.re, 3.0) && approx_eq(diff.im, 2.0));
    }

    #[test]
    fn multiplication() {
        // (1 + 2i)(3 + 4i) = -5 + 10i
        let c = Complex::new(1.0, 2.0) * Complex::new(3.0, 4.0);
        assert!(approx_eq(c.re, -5.0));
        assert!(approx_eq(c.im, 10.0));
    }

    #[test]
    fn negation() {
        let neg = -Complex::new(2.0, -3.0);
        assert!(approx_eq(neg.re, -2.0) && approx_eq(neg.im, 3.0));
    }

    #[test]
    fn norms() {
        let a = Complex::new(3.0, 4.0);
        assert!(approx_eq(a.norm_sq(), 25.0));
        assert!(approx_eq(a.norm(), 5.0));
    }

    #[test]
    fn sqrt_squares_back() {
        let points = [
            Complex::new(4.0, 0.0),
            Complex::new(-4.0, 0.0),
            Complex::new(0.3, -1.7),
            Complex::new(-2.5, 0.8),
        ];
        for z in points {
            let r = z.sqrt();
            let back = r * r;
            assert!((back.re - z.re).abs() < 1e-9, "{z} -> {back}");
            assert!((back.im - z.im).abs() < 1e-9, "{z} -> {back}");
            // Principal branch has a non-negative real part.
            assert!(r.re >= 0.0);
        }
    }

    #[test]
    fn sqrt_of_zero_is_zero() {
        assert_eq!(Complex::ZERO.sqrt(), Complex::ZERO);
    }
}

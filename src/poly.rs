//! Dense univariate polynomials over the rationals, exact arithmetic only.
//!
//! Coefficient index is the power of `q`; the coefficient vector carries no
//! trailing zeros, so equality is plain vector equality.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::syntax::{Expr, INDETERMINATE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
  coeffs: Vec<BigRational>,
}

impl Poly {
  pub fn zero() -> Poly {
    Poly { coeffs: Vec::new() }
  }

  pub fn one() -> Poly {
    Poly::constant(BigRational::one())
  }

  pub fn constant(c: BigRational) -> Poly {
    let mut p = Poly { coeffs: vec![c] };
    p.trim();
    p
  }

  /// The indeterminate itself, as a polynomial.
  pub fn var() -> Poly {
    Poly {
      coeffs: vec![BigRational::zero(), BigRational::one()],
    }
  }

  pub fn from_int_coeffs(coeffs: &[i64]) -> Poly {
    let mut p = Poly {
      coeffs: coeffs
        .iter()
        .map(|&c| BigRational::from_integer(BigInt::from(c)))
        .collect(),
    };
    p.trim();
    p
  }

  fn trim(&mut self) {
    while self.coeffs.last().is_some_and(|c| c.is_zero()) {
      self.coeffs.pop();
    }
  }

  pub fn is_zero(&self) -> bool {
    self.coeffs.is_empty()
  }

  pub fn is_one(&self) -> bool {
    self.coeffs.len() == 1 && self.coeffs[0].is_one()
  }

  /// Degree, with constants (including zero) at degree 0.
  pub fn degree(&self) -> usize {
    self.coeffs.len().saturating_sub(1)
  }

  pub fn coeff(&self, i: usize) -> BigRational {
    self.coeffs.get(i).cloned().unwrap_or_else(BigRational::zero)
  }

  pub fn leading(&self) -> BigRational {
    self.coeffs.last().cloned().unwrap_or_else(BigRational::zero)
  }

  pub fn add(&self, other: &Poly) -> Poly {
    let len = self.coeffs.len().max(other.coeffs.len());
    let mut coeffs = Vec::with_capacity(len);
    for i in 0..len {
      coeffs.push(self.coeff(i) + other.coeff(i));
    }
    let mut p = Poly { coeffs };
    p.trim();
    p
  }

  pub fn sub(&self, other: &Poly) -> Poly {
    self.add(&other.neg())
  }

  pub fn neg(&self) -> Poly {
    Poly {
      coeffs: self.coeffs.iter().map(|c| -c).collect(),
    }
  }

  pub fn mul(&self, other: &Poly) -> Poly {
    if self.is_zero() || other.is_zero() {
      return Poly::zero();
    }
    let mut coeffs =
      vec![BigRational::zero(); self.coeffs.len() + other.coeffs.len() - 1];
    for (i, a) in self.coeffs.iter().enumerate() {
      if a.is_zero() {
        continue;
      }
      for (j, b) in other.coeffs.iter().enumerate() {
        coeffs[i + j] += a * b;
      }
    }
    let mut p = Poly { coeffs };
    p.trim();
    p
  }

  pub fn pow(&self, exp: u32) -> Poly {
    let mut acc = Poly::one();
    for _ in 0..exp {
      acc = acc.mul(self);
    }
    acc
  }

  /// Polynomial long division; `None` when the divisor is zero.
  pub fn div_rem(&self, divisor: &Poly) -> Option<(Poly, Poly)> {
    if divisor.is_zero() {
      return None;
    }
    if self.degree() < divisor.degree() || self.is_zero() {
      return Some((Poly::zero(), self.clone()));
    }
    let mut rem = self.clone();
    let mut quot =
      vec![BigRational::zero(); self.degree() - divisor.degree() + 1];
    let dlead = divisor.leading();
    while !rem.is_zero() && rem.degree() >= divisor.degree() {
      let shift = rem.degree() - divisor.degree();
      let c = rem.leading() / &dlead;
      quot[shift] = c.clone();
      let mut next = rem.coeffs.clone();
      for (j, b) in divisor.coeffs.iter().enumerate() {
        next[shift + j] -= &c * b;
      }
      rem = Poly { coeffs: next };
      rem.trim();
    }
    let mut q = Poly { coeffs: quot };
    q.trim();
    Some((q, rem))
  }

  /// Quotient when the division is exact, `None` otherwise.
  pub fn div_exact(&self, divisor: &Poly) -> Option<Poly> {
    let (q, r) = self.div_rem(divisor)?;
    if r.is_zero() {
      Some(q)
    } else {
      None
    }
  }

  /// Number of leading zero coefficients, i.e. the largest `m` with `q^m`
  /// dividing the polynomial. Zero for the zero polynomial.
  pub fn trailing_zeros(&self) -> usize {
    self
      .coeffs
      .iter()
      .position(|c| !c.is_zero())
      .unwrap_or(0)
  }

  /// Divides out `q^m`.
  pub fn shift_down(&self, m: usize) -> Poly {
    if m >= self.coeffs.len() {
      return Poly::zero();
    }
    Poly {
      coeffs: self.coeffs[m..].to_vec(),
    }
  }

  /// Splits into rational content and primitive part: `self = content * prim`
  /// where `prim` has coprime integer coefficients and a positive leading
  /// coefficient. The zero polynomial yields `(0, 0)`.
  pub fn primitive_part(&self) -> (BigRational, Poly) {
    if self.is_zero() {
      return (BigRational::zero(), Poly::zero());
    }
    let mut denom_lcm = BigInt::one();
    for c in &self.coeffs {
      if !c.is_zero() {
        denom_lcm = bigint_lcm(&denom_lcm, c.denom());
      }
    }
    let scaled = BigRational::from_integer(denom_lcm.clone());
    let ints: Vec<BigInt> = self
      .coeffs
      .iter()
      .map(|c| (c * &scaled).to_integer())
      .collect();
    let mut g = BigInt::zero();
    for n in &ints {
      g = bigint_gcd(g, n.clone());
    }
    if ints.last().is_some_and(|n| n.is_negative()) {
      g = -g;
    }
    let prim = Poly {
      coeffs: ints
        .iter()
        .map(|n| BigRational::from_integer(n / &g))
        .collect(),
    };
    (BigRational::new(g, denom_lcm), prim)
  }

  /// Reads a polynomial in `q` out of an expression. `None` when the shape
  /// is not polynomial: foreign symbols, symbolic exponents, or negative
  /// powers of anything non-constant.
  pub fn from_expr(expr: &Expr) -> Option<Poly> {
    match expr {
      Expr::Integer(n) => {
        Some(Poly::constant(BigRational::from_integer(BigInt::from(*n))))
      }
      Expr::Symbol(s) if s == INDETERMINATE => Some(Poly::var()),
      Expr::Symbol(_) => None,
      Expr::Plus(terms) => {
        let mut acc = Poly::zero();
        for t in terms {
          acc = acc.add(&Poly::from_expr(t)?);
        }
        Some(acc)
      }
      Expr::Times(factors) => {
        let mut acc = Poly::one();
        for f in factors {
          acc = acc.mul(&Poly::from_expr(f)?);
        }
        Some(acc)
      }
      Expr::Power(base, exp) => match **exp {
        Expr::Integer(k) if k >= 0 => {
          let k = u32::try_from(k).ok()?;
          Some(Poly::from_expr(base)?.pow(k))
        }
        Expr::Integer(k) => {
          let p = Poly::from_expr(base)?;
          if p.degree() > 0 || p.is_zero() {
            return None;
          }
          let k = u32::try_from(k.checked_neg()?).ok()?;
          Some(Poly::constant(
            Poly::constant(p.coeff(0)).pow(k).coeff(0).recip(),
          ))
        }
        _ => None,
      },
    }
  }

  /// Renders back into an expression, highest power first. `None` if a
  /// coefficient does not fit the expression layer's integer type.
  pub fn to_expr(&self) -> Option<Expr> {
    if self.is_zero() {
      return Some(Expr::Integer(0));
    }
    let mut terms = Vec::new();
    for i in (0..=self.degree()).rev() {
      let c = self.coeff(i);
      if c.is_zero() {
        continue;
      }
      let coeff_expr = rational_to_expr(&c)?;
      let term = if i == 0 {
        coeff_expr
      } else {
        let qpow = Expr::pow(Expr::q(), Expr::Integer(i as i128));
        if c.is_one() {
          qpow
        } else {
          Expr::mul(vec![coeff_expr, qpow])
        }
      };
      terms.push(term);
    }
    Some(Expr::add(terms))
  }
}

/// Exact rational value of an expression as `Expr`, `None` on overflow.
pub fn rational_to_expr(r: &BigRational) -> Option<Expr> {
  let numer = i128::try_from(r.numer()).ok()?;
  if r.denom().is_one() {
    return Some(Expr::Integer(numer));
  }
  let denom = i128::try_from(r.denom()).ok()?;
  Some(Expr::mul(vec![
    Expr::Integer(numer),
    Expr::pow(Expr::Integer(denom), Expr::Integer(-1)),
  ]))
}

/// Normalizes an expression into a `(numerator, denominator)` polynomial
/// pair. `None` when the expression is not a rational function in `q`
/// (e.g. symbolic exponents). The denominator may come back zero when the
/// input divides by the zero polynomial; callers decide how hard that is.
pub fn rational_parts(expr: &Expr) -> Option<(Poly, Poly)> {
  match expr {
    Expr::Plus(terms) => {
      let mut num = Poly::zero();
      let mut den = Poly::one();
      for t in terms {
        let (tn, td) = rational_parts(t)?;
        num = num.mul(&td).add(&tn.mul(&den));
        den = den.mul(&td);
      }
      Some((num, den))
    }
    Expr::Times(factors) => {
      let mut num = Poly::one();
      let mut den = Poly::one();
      for f in factors {
        let (fn_, fd) = rational_parts(f)?;
        num = num.mul(&fn_);
        den = den.mul(&fd);
      }
      Some((num, den))
    }
    Expr::Power(base, exp) => match **exp {
      Expr::Integer(k) => {
        let (bn, bd) = rational_parts(base)?;
        let mag = u32::try_from(k.checked_abs()?).ok()?;
        if k >= 0 {
          Some((bn.pow(mag), bd.pow(mag)))
        } else {
          Some((bd.pow(mag), bn.pow(mag)))
        }
      }
      _ => None,
    },
    other => Poly::from_expr(other).map(|p| (p, Poly::one())),
  }
}

// Teacher-style Euclid; num-bigint has no inherent gcd.
pub fn bigint_gcd(a: BigInt, b: BigInt) -> BigInt {
  let (mut a, mut b) = (a.abs(), b.abs());
  while !b.is_zero() {
    let t = b.clone();
    b = &a % &b;
    a = t;
  }
  a
}

pub fn bigint_lcm(a: &BigInt, b: &BigInt) -> BigInt {
  if a.is_zero() || b.is_zero() {
    return BigInt::zero();
  }
  let g = bigint_gcd(a.clone(), b.clone());
  (a / &g * b).abs()
}

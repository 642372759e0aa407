//! The irreducible-factorization engine.
//!
//! Turns an expression into a merged list of `(factor, exponent)` records
//! plus a rational content. Polynomial content is split by ascending trial
//! division with cyclotomic polynomials, which is complete for anything
//! built from `(q^k - 1)` terms; whatever resists stays whole and will end
//! up in the residual unit downstream.

use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::cyclotomic::{cyclotomic, euler_phi};
use crate::poly::Poly;
use crate::syntax::Expr;
use crate::QintError;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorRecord {
  pub factor: Expr,
  pub exponent: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
  pub content: BigRational,
  pub factors: Vec<FactorRecord>,
}

/// Deterministic factor list of `expr`. Records are merged by factor
/// equality, so each factor expression appears at most once; zero net
/// exponents are dropped.
pub fn factor_list(expr: &Expr) -> Result<Factorization, QintError> {
  let mut content = BigRational::one();
  let mut factors = Vec::new();
  collect(expr, 1, &mut content, &mut factors)?;
  factors.retain(|r: &FactorRecord| r.exponent != 0);
  Ok(Factorization { content, factors })
}

fn collect(
  expr: &Expr,
  exp: i64,
  content: &mut BigRational,
  out: &mut Vec<FactorRecord>,
) -> Result<(), QintError> {
  match expr {
    Expr::Times(factors) => {
      for f in factors {
        collect(f, exp, content, out)?;
      }
      Ok(())
    }
    Expr::Power(base, power) => match **power {
      Expr::Integer(k) => {
        let k = i64::try_from(k).map_err(|_| {
          QintError::EvaluationError("exponent out of range".into())
        })?;
        let scaled = exp.checked_mul(k).ok_or_else(|| {
          QintError::EvaluationError("exponent out of range".into())
        })?;
        collect(base, scaled, content, out)
      }
      _ => absorb_base(expr, exp, content, out),
    },
    _ => absorb_base(expr, exp, content, out),
  }
}

fn absorb_base(
  expr: &Expr,
  exp: i64,
  content: &mut BigRational,
  out: &mut Vec<FactorRecord>,
) -> Result<(), QintError> {
  let Some(p) = Poly::from_expr(expr) else {
    // Symbolic shape, e.g. q^n - 1 with a symbolic n; passes through whole.
    push_record(out, expr.clone(), exp);
    return Ok(());
  };
  if p.is_zero() {
    if exp < 0 {
      return Err(QintError::EvaluationError(
        "division by zero polynomial".into(),
      ));
    }
    *content = BigRational::zero();
    return Ok(());
  }
  if p.degree() == 0 {
    *content *= rat_pow(&p.coeff(0), exp)?;
    return Ok(());
  }
  let (c, prim) = p.primitive_part();
  *content *= rat_pow(&c, exp)?;

  // Monomial content q^m is unit material, but it is still a factor record
  // for the classifier to reject, like any other irreducible.
  let m = prim.trailing_zeros();
  let mut rem = prim.shift_down(m);
  if m > 0 {
    let qexp = i64::try_from(m)
      .ok()
      .and_then(|m| m.checked_mul(exp))
      .ok_or_else(|| {
        QintError::EvaluationError("exponent out of range".into())
      })?;
    push_record(out, Expr::q(), qexp);
  }

  // Ascending cyclotomic trial division. phi(d) is the degree of phi_d, so
  // anything with phi(d) above the remaining degree cannot divide; phi(d)
  // grows at least like sqrt(d/2), which bounds the loop.
  let deg0 = rem.degree() as u64;
  let limit = 2 * deg0 * deg0 + 1;
  let mut d = 1u64;
  while rem.degree() > 0 && d <= limit {
    if euler_phi(d) <= rem.degree() as u64 {
      let phi_d = cyclotomic(d);
      let mut mult = 0i64;
      while let Some(quot) = rem.div_exact(&phi_d) {
        rem = quot;
        mult += 1;
      }
      if mult > 0 {
        let scaled = mult.checked_mul(exp).ok_or_else(|| {
          QintError::EvaluationError("exponent out of range".into())
        })?;
        let factor = phi_d.to_expr().ok_or_else(|| {
          QintError::EvaluationError("coefficient out of range".into())
        })?;
        push_record(out, factor, scaled);
      }
    }
    d += 1;
  }

  if rem.degree() > 0 {
    let factor = rem.to_expr().ok_or_else(|| {
      QintError::EvaluationError("coefficient out of range".into())
    })?;
    push_record(out, factor, exp);
  } else {
    *content *= rat_pow(&rem.coeff(0), exp)?;
  }
  Ok(())
}

fn push_record(out: &mut Vec<FactorRecord>, factor: Expr, exponent: i64) {
  if let Some(r) = out.iter_mut().find(|r| r.factor == factor) {
    r.exponent += exponent;
  } else {
    out.push(FactorRecord { factor, exponent });
  }
}

fn rat_pow(base: &BigRational, exp: i64) -> Result<BigRational, QintError> {
  if exp < 0 {
    if base.is_zero() {
      return Err(QintError::EvaluationError("division by zero".into()));
    }
    let mag = exp.checked_neg().ok_or_else(|| {
      QintError::EvaluationError("exponent out of range".into())
    })?;
    return rat_pow(&base.recip(), mag);
  }
  let mut result = BigRational::one();
  let mut b = base.clone();
  let mut e = exp as u64;
  while e > 0 {
    if e & 1 == 1 {
      result *= &b;
    }
    b = &b * &b;
    e >>= 1;
  }
  Ok(result)
}

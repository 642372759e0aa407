//! Canonical q-integer decomposition.
//!
//! Classifies each irreducible factor of a rational function in `q` as a
//! literal q-integer `[k] = q^k - 1`, as a cyclotomic component of some
//! q-integer, or as residual unit material, then balances the cyclotomic
//! components into complete q-integers with the identity
//! `q^k - 1 = prod over d|k of phi_d(q)`.

use std::cmp::Ordering;
use std::fmt;

use num_rational::BigRational;
use num_traits::One;

use crate::cyclotomic::{cyclotomic, divisors, euler_phi};
use crate::factor::{factor_list, Factorization};
use crate::poly::Poly;
use crate::syntax::{expr_to_string, Expr, INDETERMINATE};
use crate::QintError;

/// How far `classify_cyclotomic` searches by default. Cyclotomic factors of
/// higher index are left unrecognized and fold into the residual unit.
pub const DEFAULT_CYCLOTOMIC_BOUND: u32 = 200;

/// Index of a q-integer `[k] = q^k - 1`. The exponent of a literal factor
/// may be symbolic (`q^n - 1` for an unevaluated `n`); such indices never
/// reach the balancing pools, which hold concrete cyclotomic indices only.
#[derive(Debug, Clone, PartialEq)]
pub enum QintIndex {
  Literal(u64),
  Symbolic(Expr),
}

impl QintIndex {
  /// The q-integer `q^k - 1` this index names.
  pub fn to_expr(&self) -> Expr {
    let exponent = match self {
      QintIndex::Literal(k) => Expr::Integer(*k as i128),
      QintIndex::Symbolic(e) => e.clone(),
    };
    Expr::add(vec![
      Expr::pow(Expr::q(), exponent),
      Expr::Integer(-1),
    ])
  }
}

impl fmt::Display for QintIndex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QintIndex::Literal(k) => write!(f, "[{k}]"),
      QintIndex::Symbolic(e) => write!(f, "[{}]", expr_to_string(e)),
    }
  }
}

/// Residual multiplicative factor: a rational coefficient together with the
/// factors (monomials in `q`, unrecognized irreducibles) that no q-integer
/// accounts for.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
  pub coeff: BigRational,
  pub factors: Vec<(Expr, i64)>,
}

impl Unit {
  pub fn is_one(&self) -> bool {
    self.coeff.is_one() && self.factors.is_empty()
  }

  pub fn to_expr(&self) -> Option<Expr> {
    let mut parts = vec![crate::poly::rational_to_expr(&self.coeff)?];
    for (factor, exp) in &self.factors {
      parts.push(Expr::pow(factor.clone(), Expr::Integer(*exp as i128)));
    }
    Some(Expr::mul(parts))
  }
}

impl fmt::Display for Unit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let minus_one = -BigRational::one();
    let mut parts = Vec::new();
    for (factor, exp) in &self.factors {
      let base = if matches!(factor, Expr::Plus(_)) {
        format!("({})", expr_to_string(factor))
      } else {
        expr_to_string(factor)
      };
      if *exp == 1 {
        parts.push(base);
      } else if *exp < 0 {
        parts.push(format!("{base}^({exp})"));
      } else {
        parts.push(format!("{base}^{exp}"));
      }
    }
    if parts.is_empty() {
      return write!(f, "{}", self.coeff);
    }
    let sign = if self.coeff == minus_one { "-" } else { "" };
    if !self.coeff.is_one() && self.coeff != minus_one {
      parts.insert(0, self.coeff.to_string());
    }
    write!(f, "{sign}{}", parts.join("*"))
  }
}

/// The canonical triple: `unit * prod [k] over num / prod [k] over den`.
#[derive(Debug, Clone, PartialEq)]
pub struct QintForm {
  pub unit: Unit,
  pub num: Vec<QintIndex>,
  pub den: Vec<QintIndex>,
}

impl QintForm {
  /// Reconstructs the product the triple denotes. `None` when the unit
  /// coefficient does not fit the expression layer's integer type.
  pub fn to_expr(&self) -> Option<Expr> {
    let mut parts = vec![self.unit.to_expr()?];
    for ix in &self.num {
      parts.push(ix.to_expr());
    }
    for ix in &self.den {
      parts.push(Expr::pow(ix.to_expr(), Expr::Integer(-1)));
    }
    Some(Expr::mul(parts))
  }
}

impl fmt::Display for QintForm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let num: String = self.num.iter().map(|i| i.to_string()).collect();
    let den: String = self.den.iter().map(|i| i.to_string()).collect();
    let mut head = if self.unit.is_one() && !num.is_empty() {
      num
    } else if num.is_empty() {
      self.unit.to_string()
    } else {
      format!("{} {}", self.unit, num)
    };
    if !den.is_empty() {
      head = format!("{head} / {den}");
    }
    write!(f, "{head}")
  }
}

/// Recognizes a factor that is literally a q-integer: `q - 1`, or
/// `q^k - 1` with a concrete or symbolic exponent. Adding one to the
/// factor and letting the constructors fold the constants reduces the
/// check to a shape match on the result.
pub fn classify_qint(factor: &Expr) -> Option<QintIndex> {
  let shifted = Expr::add(vec![factor.clone(), Expr::Integer(1)]);
  match shifted {
    Expr::Symbol(ref s) if s == INDETERMINATE => Some(QintIndex::Literal(1)),
    Expr::Power(base, exp) if base.is_symbol(INDETERMINATE) => match *exp {
      Expr::Integer(k) if k >= 1 => match u64::try_from(k) {
        Ok(k) => Some(QintIndex::Literal(k)),
        Err(_) => Some(QintIndex::Symbolic(Expr::Integer(k))),
      },
      Expr::Integer(_) => None,
      e => Some(QintIndex::Symbolic(e)),
    },
    _ => None,
  }
}

/// Finds the index whose cyclotomic polynomial equals `factor` exactly,
/// searching `1..=bound` in increasing order. The totient filter only
/// skips indices whose degree cannot match; it does not change the search
/// order. `None` when nothing in range matches.
pub fn classify_cyclotomic(factor: &Expr, bound: u32) -> Option<u64> {
  let p = Poly::from_expr(factor)?;
  let deg = p.degree() as u64;
  if deg == 0 {
    return None;
  }
  (1..=bound as u64).find(|&n| euler_phi(n) == deg && cyclotomic(n) == p)
}

/// Transient state of one decomposition: the residual unit, the resolved
/// q-integer indices, and the pending cyclotomic pools awaiting balancing.
struct Accumulator {
  coeff: BigRational,
  unit_factors: Vec<(Expr, i64)>,
  qnum: Vec<QintIndex>,
  qden: Vec<QintIndex>,
  num_pool: Vec<u64>,
  den_pool: Vec<u64>,
}

/// Decomposes `expr` into its canonical q-integer form, searching for
/// cyclotomic factors up to `bound`.
pub fn decompose(expr: &Expr, bound: u32) -> Result<QintForm, QintError> {
  let Factorization { content, factors } = factor_list(expr)?;
  let mut acc = Accumulator {
    coeff: content,
    unit_factors: Vec::new(),
    qnum: Vec::new(),
    qden: Vec::new(),
    num_pool: Vec::new(),
    den_pool: Vec::new(),
  };

  // Phase A: classification. The literal detector runs first; a factor it
  // recognizes never reaches cyclotomic classification.
  for record in &factors {
    let count = record.exponent.unsigned_abs();
    if let Some(ix) = classify_qint(&record.factor) {
      let side = if record.exponent > 0 {
        &mut acc.qnum
      } else {
        &mut acc.qden
      };
      for _ in 0..count {
        side.push(ix.clone());
      }
    } else if let Some(n) = classify_cyclotomic(&record.factor, bound) {
      let pool = if record.exponent > 0 {
        &mut acc.num_pool
      } else {
        &mut acc.den_pool
      };
      for _ in 0..count {
        pool.push(n);
      }
    } else {
      acc.unit_factors.push((record.factor.clone(), record.exponent));
    }
  }

  balance(&mut acc);
  canonicalize(&mut acc);

  Ok(QintForm {
    unit: Unit {
      coeff: acc.coeff,
      factors: acc.unit_factors,
    },
    num: acc.qnum,
    den: acc.qden,
  })
}

/// Phase B: empties both pools. Each round either cancels one index pair
/// shared at the maxima, or resolves the strictly larger maximum into a
/// full q-integer and injects its proper divisors into the opposite pool.
/// Injected indices are strictly smaller than the resolved one, so the
/// multiset of pool maxima decreases and the loop halts.
fn balance(acc: &mut Accumulator) {
  loop {
    let num_max = acc.num_pool.iter().copied().max();
    let den_max = acc.den_pool.iter().copied().max();
    match (num_max, den_max) {
      (None, None) => break,
      (Some(a), Some(b)) if a == b => {
        remove_one(&mut acc.num_pool, a);
        remove_one(&mut acc.den_pool, b);
      }
      (Some(a), b) if b.map_or(true, |b| a > b) => {
        resolve(a, &mut acc.num_pool, &mut acc.den_pool, &mut acc.qnum);
      }
      (_, Some(b)) => {
        resolve(b, &mut acc.den_pool, &mut acc.num_pool, &mut acc.qden);
      }
      (Some(_), None) => unreachable!(),
    }
  }
}

/// One resolution step, shared between the two sides: consume `k` from its
/// pool, record `[k]`, and compensate with the proper divisors of `k` on
/// the opposite side (each with multiplicity one, per the divisor
/// identity).
fn resolve(
  k: u64,
  pool: &mut Vec<u64>,
  opposite: &mut Vec<u64>,
  resolved: &mut Vec<QintIndex>,
) {
  remove_one(pool, k);
  resolved.push(QintIndex::Literal(k));
  for d in divisors(k) {
    if d != k {
      opposite.push(d);
    }
  }
}

fn remove_one(pool: &mut Vec<u64>, value: u64) {
  if let Some(pos) = pool.iter().position(|&v| v == value) {
    pool.swap_remove(pos);
  }
}

/// Phase C: strip `[1]` pairs that appear on both sides, then order both
/// lists: literal indices descending, symbolic indices after them.
fn canonicalize(acc: &mut Accumulator) {
  loop {
    let in_num = position_of_one(&acc.qnum);
    let in_den = position_of_one(&acc.qden);
    match (in_num, in_den) {
      (Some(i), Some(j)) => {
        acc.qnum.swap_remove(i);
        acc.qden.swap_remove(j);
      }
      _ => break,
    }
  }
  acc.qnum.sort_by(index_order);
  acc.qden.sort_by(index_order);
}

fn position_of_one(indices: &[QintIndex]) -> Option<usize> {
  indices
    .iter()
    .position(|ix| matches!(ix, QintIndex::Literal(1)))
}

fn index_order(a: &QintIndex, b: &QintIndex) -> Ordering {
  match (a, b) {
    (QintIndex::Literal(x), QintIndex::Literal(y)) => y.cmp(x),
    (QintIndex::Literal(_), QintIndex::Symbolic(_)) => Ordering::Less,
    (QintIndex::Symbolic(_), QintIndex::Literal(_)) => Ordering::Greater,
    (QintIndex::Symbolic(x), QintIndex::Symbolic(y)) => {
      expr_to_string(x).cmp(&expr_to_string(y))
    }
  }
}

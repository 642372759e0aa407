//! Symbolic expressions over the indeterminate `q`.
//!
//! The algebraic subset this crate manipulates: integers, symbols, n-ary
//! sums and products, and powers. Constructors normalize as they build so
//! that pattern matching downstream sees flattened, constant-folded shapes.

use std::fmt;

/// The one indeterminate every rational function here is taken in.
pub const INDETERMINATE: &str = "q";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
  Integer(i128),
  Symbol(String),
  Plus(Vec<Expr>),
  Times(Vec<Expr>),
  Power(Box<Expr>, Box<Expr>),
}

impl Expr {
  pub fn int(n: i128) -> Expr {
    Expr::Integer(n)
  }

  pub fn sym(name: &str) -> Expr {
    Expr::Symbol(name.to_string())
  }

  /// The indeterminate `q` as an expression.
  pub fn q() -> Expr {
    Expr::Symbol(INDETERMINATE.to_string())
  }

  pub fn is_symbol(&self, name: &str) -> bool {
    matches!(self, Expr::Symbol(s) if s == name)
  }

  /// Flattening sum: nested `Plus` terms are inlined, integer terms are
  /// folded into one trailing constant, zero is dropped, singletons unwrap.
  pub fn add(terms: Vec<Expr>) -> Expr {
    let mut flat = Vec::new();
    let mut constant: i128 = 0;
    for t in terms {
      Self::flatten_sum(t, &mut constant, &mut flat);
    }
    if flat.is_empty() {
      return Expr::Integer(constant);
    }
    if constant != 0 {
      flat.push(Expr::Integer(constant));
    }
    if flat.len() == 1 {
      flat.pop().unwrap_or(Expr::Integer(0))
    } else {
      Expr::Plus(flat)
    }
  }

  fn flatten_sum(t: Expr, constant: &mut i128, flat: &mut Vec<Expr>) {
    match t {
      Expr::Plus(inner) => {
        for u in inner {
          Self::flatten_sum(u, constant, flat);
        }
      }
      Expr::Integer(n) => *constant += n,
      other => flat.push(other),
    }
  }

  /// Flattening product: nested `Times` factors are inlined, integer
  /// factors fold into one leading constant, one is dropped, a zero factor
  /// collapses the whole product.
  pub fn mul(factors: Vec<Expr>) -> Expr {
    let mut flat = Vec::new();
    let mut constant: i128 = 1;
    for f in factors {
      Self::flatten_product(f, &mut constant, &mut flat);
    }
    if constant == 0 {
      return Expr::Integer(0);
    }
    if flat.is_empty() {
      return Expr::Integer(constant);
    }
    if constant != 1 {
      flat.insert(0, Expr::Integer(constant));
    }
    if flat.len() == 1 {
      flat.pop().unwrap_or(Expr::Integer(1))
    } else {
      Expr::Times(flat)
    }
  }

  fn flatten_product(f: Expr, constant: &mut i128, flat: &mut Vec<Expr>) {
    match f {
      Expr::Times(inner) => {
        for g in inner {
          Self::flatten_product(g, constant, flat);
        }
      }
      Expr::Integer(n) => *constant *= n,
      other => flat.push(other),
    }
  }

  /// Power with the trivial exponent/base cases folded away; stacked
  /// integer powers `(b^m)^n` combine into `b^(m*n)`.
  pub fn pow(base: Expr, exp: Expr) -> Expr {
    if let Expr::Integer(k) = exp {
      if k == 0 {
        return Expr::Integer(1);
      }
      if k == 1 {
        return base;
      }
      if let Expr::Power(b, e) = &base {
        if let Expr::Integer(m) = **e {
          if let Some(prod) = m.checked_mul(k) {
            return Expr::pow((**b).clone(), Expr::Integer(prod));
          }
        }
      }
      if base == Expr::Integer(1) {
        return Expr::Integer(1);
      }
      return Expr::Power(Box::new(base), Box::new(Expr::Integer(k)));
    }
    if base == Expr::Integer(1) {
      return Expr::Integer(1);
    }
    Expr::Power(Box::new(base), Box::new(exp))
  }

  pub fn neg(e: Expr) -> Expr {
    Expr::mul(vec![Expr::Integer(-1), e])
  }
}

/// Renders an expression in plain infix notation, e.g. `q^6 - 1` or
/// `-q^2*(q + 1)`.
pub fn expr_to_string(expr: &Expr) -> String {
  match expr {
    Expr::Integer(n) => n.to_string(),
    Expr::Symbol(s) => s.clone(),
    Expr::Plus(terms) => {
      let mut out = String::new();
      for (i, t) in terms.iter().enumerate() {
        if i == 0 {
          out.push_str(&expr_to_string(t));
        } else if let Some(positive) = negated_term(t) {
          out.push_str(" - ");
          out.push_str(&expr_to_string(&positive));
        } else {
          out.push_str(" + ");
          out.push_str(&expr_to_string(t));
        }
      }
      out
    }
    Expr::Times(factors) => {
      let (negate, rest) = split_sign(factors);
      let body = rest
        .iter()
        .map(|f| maybe_paren(f, matches!(f, Expr::Plus(_) | Expr::Times(_))))
        .collect::<Vec<_>>()
        .join("*");
      if negate {
        format!("-{body}")
      } else {
        body
      }
    }
    Expr::Power(base, exp) => {
      let b = maybe_paren(
        base,
        !matches!(**base, Expr::Symbol(_) | Expr::Integer(0..)),
      );
      let e = maybe_paren(
        exp,
        !matches!(**exp, Expr::Symbol(_) | Expr::Integer(0..)),
      );
      format!("{b}^{e}")
    }
  }
}

/// If `t` is a term with an explicit negative integer coefficient, returns
/// the term with the sign stripped so sums can render `a - b`.
fn negated_term(t: &Expr) -> Option<Expr> {
  match t {
    Expr::Integer(n) if *n < 0 => n.checked_neg().map(Expr::Integer),
    Expr::Times(factors) => match factors.first() {
      Some(Expr::Integer(n)) if *n < 0 => {
        let mut rest: Vec<Expr> = factors[1..].to_vec();
        let c = n.checked_neg()?;
        if c != 1 {
          rest.insert(0, Expr::Integer(c));
        }
        Some(Expr::mul(rest))
      }
      _ => None,
    },
    _ => None,
  }
}

fn split_sign(factors: &[Expr]) -> (bool, Vec<Expr>) {
  if let Some(Expr::Integer(-1)) = factors.first() {
    (true, factors[1..].to_vec())
  } else {
    (false, factors.to_vec())
  }
}

fn maybe_paren(e: &Expr, parens: bool) -> String {
  if parens {
    format!("({})", expr_to_string(e))
  } else {
    expr_to_string(e)
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", expr_to_string(self))
  }
}

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

pub mod cyclotomic;
pub mod factor;
pub mod poly;
pub mod qint;
pub mod syntax;

pub use cyclotomic::{cyclotomic, divisors, euler_phi};
pub use factor::{factor_list, FactorRecord, Factorization};
pub use poly::{rational_parts, Poly};
pub use qint::{
  classify_cyclotomic, classify_qint, decompose, QintForm, QintIndex, Unit,
  DEFAULT_CYCLOTOMIC_BOUND,
};
pub use syntax::{expr_to_string, Expr, INDETERMINATE};

#[derive(Parser)]
#[grammar = "qalgebra.pest"]
pub struct QAlgebraParser;

#[derive(Error, Debug)]
pub enum QintError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty input")]
  EmptyInput,
  #[error("Evaluation error: {0}")]
  EvaluationError(String),
}

impl QAlgebraParser {
  pub fn parse_program(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

pub fn parse(
  input: &str,
) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>> {
  QAlgebraParser::parse_program(input)
}

/// Parses one arithmetic expression in `q` into its `Expr` form.
pub fn parse_expr(input: &str) -> Result<Expr, QintError> {
  if input.trim().is_empty() {
    return Err(QintError::EmptyInput);
  }
  let mut pairs = parse(input)?;
  let program = pairs.next().ok_or(QintError::EmptyInput)?;
  let expression = program
    .into_inner()
    .find(|p| p.as_rule() == Rule::Expression)
    .ok_or(QintError::EmptyInput)?;
  build_expression(expression)
}

/// Parses `input` and decomposes it into canonical q-integer form with the
/// default cyclotomic search bound.
pub fn qint_expression(input: &str) -> Result<QintForm, QintError> {
  qint_expression_with_bound(input, DEFAULT_CYCLOTOMIC_BOUND)
}

/// Like `qint_expression`, with an explicit cyclotomic search bound.
pub fn qint_expression_with_bound(
  input: &str,
  bound: u32,
) -> Result<QintForm, QintError> {
  let expr = parse_expr(input)?;
  decompose(&expr, bound)
}

/// Exact equality of two expressions as rational functions in `q`, by
/// cross-multiplying their normalized numerator/denominator pairs.
pub fn rational_eq(a: &Expr, b: &Expr) -> Result<bool, QintError> {
  let (an, ad) = rational_parts(a).ok_or_else(not_rational)?;
  let (bn, bd) = rational_parts(b).ok_or_else(not_rational)?;
  if ad.is_zero() || bd.is_zero() {
    return Err(QintError::EvaluationError(
      "division by zero polynomial".into(),
    ));
  }
  Ok(an.mul(&bd) == bn.mul(&ad))
}

fn not_rational() -> QintError {
  QintError::EvaluationError("not a rational function in q".into())
}

fn build_expression(pair: Pair<'_, Rule>) -> Result<Expr, QintError> {
  let mut inner = pair.into_inner();
  let first = inner.next().ok_or_else(malformed)?;
  let mut terms = vec![build_term(first)?];
  while let Some(op) = inner.next() {
    let rhs = build_term(inner.next().ok_or_else(malformed)?)?;
    if op.as_str() == "+" {
      terms.push(rhs);
    } else {
      terms.push(Expr::neg(rhs));
    }
  }
  Ok(Expr::add(terms))
}

fn build_term(pair: Pair<'_, Rule>) -> Result<Expr, QintError> {
  let mut inner = pair.into_inner();
  let first = inner.next().ok_or_else(malformed)?;
  let mut factors = vec![build_factor(first)?];
  while let Some(op) = inner.next() {
    let rhs = build_factor(inner.next().ok_or_else(malformed)?)?;
    if op.as_str() == "*" {
      factors.push(rhs);
    } else {
      factors.push(Expr::pow(rhs, Expr::Integer(-1)));
    }
  }
  Ok(Expr::mul(factors))
}

fn build_factor(pair: Pair<'_, Rule>) -> Result<Expr, QintError> {
  let mut inner = pair.into_inner();
  let first = inner.next().ok_or_else(malformed)?;
  if first.as_rule() == Rule::Minus {
    let power = build_power(inner.next().ok_or_else(malformed)?)?;
    Ok(Expr::neg(power))
  } else {
    build_power(first)
  }
}

fn build_power(pair: Pair<'_, Rule>) -> Result<Expr, QintError> {
  let mut inner = pair.into_inner();
  let base = build_atom(inner.next().ok_or_else(malformed)?)?;
  match inner.next() {
    Some(exp) => Ok(Expr::pow(base, build_factor(exp)?)),
    None => Ok(base),
  }
}

fn build_atom(pair: Pair<'_, Rule>) -> Result<Expr, QintError> {
  let inner = pair.into_inner().next().ok_or_else(malformed)?;
  match inner.as_rule() {
    Rule::Integer => inner
      .as_str()
      .parse::<i128>()
      .map(Expr::Integer)
      .map_err(|_| {
        QintError::EvaluationError("integer literal out of range".into())
      }),
    Rule::Identifier => Ok(Expr::Symbol(inner.as_str().to_string())),
    Rule::Expression => build_expression(inner),
    _ => Err(malformed()),
  }
}

fn malformed() -> QintError {
  QintError::EvaluationError("malformed expression".into())
}

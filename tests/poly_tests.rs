use num_bigint::BigInt;
use num_rational::BigRational;
use qint::{parse_expr, rational_eq, rational_parts, Poly};

fn rat(n: i64, d: i64) -> BigRational {
  BigRational::new(BigInt::from(n), BigInt::from(d))
}

mod arithmetic {
  use super::*;

  #[test]
  fn exact_division() {
    // (q^6 - 1) / (q^2 - 1) = q^4 + q^2 + 1
    let a = Poly::from_int_coeffs(&[-1, 0, 0, 0, 0, 0, 1]);
    let b = Poly::from_int_coeffs(&[-1, 0, 1]);
    assert_eq!(
      a.div_exact(&b),
      Some(Poly::from_int_coeffs(&[1, 0, 1, 0, 1]))
    );
  }

  #[test]
  fn inexact_division_is_rejected() {
    let a = Poly::from_int_coeffs(&[1, 0, 0, 1]);
    let b = Poly::from_int_coeffs(&[-1, 1]);
    assert_eq!(a.div_exact(&b), None);
  }

  #[test]
  fn division_by_zero_is_rejected() {
    let a = Poly::from_int_coeffs(&[1, 1]);
    assert_eq!(a.div_rem(&Poly::zero()), None);
  }

  #[test]
  fn primitive_part_extracts_sign_and_content() {
    // 1 - q = (-1) * (q - 1)
    let (content, prim) = Poly::from_int_coeffs(&[1, -1]).primitive_part();
    assert_eq!(content, rat(-1, 1));
    assert_eq!(prim, Poly::from_int_coeffs(&[-1, 1]));

    // 6q^2 + 4 = 2 * (3q^2 + 2)
    let (content, prim) = Poly::from_int_coeffs(&[4, 0, 6]).primitive_part();
    assert_eq!(content, rat(2, 1));
    assert_eq!(prim, Poly::from_int_coeffs(&[2, 0, 3]));
  }
}

mod expression_conversion {
  use super::*;

  #[test]
  fn polynomial_round_trip() {
    for input in ["q^6 - 1", "q^2 + q + 2", "3*q^2 - 2*q + 1"] {
      let expr = parse_expr(input).unwrap();
      let poly = Poly::from_expr(&expr).unwrap();
      assert_eq!(poly.to_expr().unwrap(), expr);
    }
  }

  #[test]
  fn symbolic_exponents_are_not_polynomial() {
    let expr = parse_expr("q^n - 1").unwrap();
    assert_eq!(Poly::from_expr(&expr), None);
  }

  #[test]
  fn foreign_symbols_are_not_polynomial() {
    let expr = parse_expr("q^2 - t").unwrap();
    assert_eq!(Poly::from_expr(&expr), None);
  }

  #[test]
  fn rational_parts_split_fractions() {
    let expr = parse_expr("(q^2 - 1)/(q - 1)").unwrap();
    let (num, den) = rational_parts(&expr).unwrap();
    assert_eq!(num, Poly::from_int_coeffs(&[-1, 0, 1]));
    assert_eq!(den, Poly::from_int_coeffs(&[-1, 1]));
  }

  #[test]
  fn rational_eq_sees_through_form() {
    let a = parse_expr("(q^2 - 1)/(q - 1)").unwrap();
    let b = parse_expr("q + 1").unwrap();
    assert!(rational_eq(&a, &b).unwrap());

    let c = parse_expr("q - 1").unwrap();
    assert!(!rational_eq(&a, &c).unwrap());
  }

  #[test]
  fn rational_eq_rejects_zero_denominators() {
    let a = parse_expr("1/(q - q)").unwrap();
    let b = parse_expr("q").unwrap();
    assert!(rational_eq(&a, &b).is_err());
  }
}

use qint::{cyclotomic, divisors, euler_phi, Poly};

mod divisor_arithmetic {
  use super::*;

  #[test]
  fn divisors_are_sorted_and_complete() {
    assert_eq!(divisors(1), vec![1]);
    assert_eq!(divisors(7), vec![1, 7]);
    assert_eq!(divisors(12), vec![1, 2, 3, 4, 6, 12]);
    assert_eq!(divisors(18), vec![1, 2, 3, 6, 9, 18]);
    assert_eq!(divisors(36), vec![1, 2, 3, 4, 6, 9, 12, 18, 36]);
  }

  #[test]
  fn totient_values() {
    assert_eq!(euler_phi(1), 1);
    assert_eq!(euler_phi(2), 1);
    assert_eq!(euler_phi(6), 2);
    assert_eq!(euler_phi(9), 6);
    assert_eq!(euler_phi(12), 4);
    assert_eq!(euler_phi(18), 6);
    assert_eq!(euler_phi(105), 48);
  }
}

mod generator {
  use super::*;

  #[test]
  fn small_indices() {
    assert_eq!(cyclotomic(1), Poly::from_int_coeffs(&[-1, 1]));
    assert_eq!(cyclotomic(2), Poly::from_int_coeffs(&[1, 1]));
    assert_eq!(cyclotomic(3), Poly::from_int_coeffs(&[1, 1, 1]));
    assert_eq!(cyclotomic(4), Poly::from_int_coeffs(&[1, 0, 1]));
    assert_eq!(cyclotomic(6), Poly::from_int_coeffs(&[1, -1, 1]));
    assert_eq!(cyclotomic(9), Poly::from_int_coeffs(&[1, 0, 0, 1, 0, 0, 1]));
    assert_eq!(cyclotomic(12), Poly::from_int_coeffs(&[1, 0, -1, 0, 1]));
  }

  #[test]
  fn degree_is_totient() {
    for n in 1..=40 {
      assert_eq!(cyclotomic(n).degree() as u64, euler_phi(n));
    }
  }

  #[test]
  fn divisor_product_recovers_q_pow_n_minus_one() {
    for n in [6u64, 12, 18] {
      let mut product = Poly::one();
      for d in divisors(n) {
        product = product.mul(&cyclotomic(d));
      }
      let mut coeffs = vec![0i64; n as usize + 1];
      coeffs[0] = -1;
      coeffs[n as usize] = 1;
      assert_eq!(product, Poly::from_int_coeffs(&coeffs));
    }
  }

  #[test]
  fn index_105_has_a_coefficient_of_minus_two() {
    use num_bigint::BigInt;
    use num_rational::BigRational;

    let phi = cyclotomic(105);
    assert_eq!(
      phi.coeff(7),
      BigRational::from_integer(BigInt::from(-2))
    );
  }
}

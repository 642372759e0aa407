//! Cyclotomic polynomials and the divisor arithmetic they ride on.

use crate::poly::Poly;

/// Sorted list of all positive divisors of `n`.
pub fn divisors(n: u64) -> Vec<u64> {
  let mut divs = Vec::new();
  let mut i = 1u64;
  while i * i <= n {
    if n % i == 0 {
      divs.push(i);
      if i != n / i {
        divs.push(n / i);
      }
    }
    i += 1;
  }
  divs.sort_unstable();
  divs
}

/// Euler's totient by trial division.
pub fn euler_phi(n: u64) -> u64 {
  if n == 0 {
    return 0;
  }
  let mut num = n;
  let mut result = n;
  let mut p = 2u64;
  while p * p <= num {
    if num % p == 0 {
      while num % p == 0 {
        num /= p;
      }
      result -= result / p;
    }
    p += 1;
  }
  if num > 1 {
    result -= result / num;
  }
  result
}

/// The n-th cyclotomic polynomial, via `q^n - 1 = prod over d|n of phi_d`:
/// divide `q^n - 1` by every lower `phi_d`. Degree is `euler_phi(n)`.
pub fn cyclotomic(n: u64) -> Poly {
  if n == 0 {
    return Poly::one();
  }
  let mut coeffs = vec![0i64; n as usize + 1];
  coeffs[0] = -1;
  coeffs[n as usize] = 1;
  let mut p = Poly::from_int_coeffs(&coeffs);
  for d in divisors(n) {
    if d < n {
      p = p
        .div_exact(&cyclotomic(d))
        .expect("phi_d divides q^n - 1 for every d | n");
    }
  }
  p
}

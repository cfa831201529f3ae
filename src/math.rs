//! Arithmetic behind the numeric operations.
//!
//! Everything here is pure. Inputs are assumed to have passed the
//! dispatcher's size limits, so loops are bounded by the caller.

use num_bigint::BigUint;

/// First `n` Fibonacci terms, starting `0, 1, 1, 2, ...`.
///
/// Terms are exact; they outgrow `u64` from the 94th term on.
pub fn fibonacci(n: usize) -> Vec<BigUint> {
    let mut terms = Vec::with_capacity(n);
    let mut current = BigUint::from(0u32);
    let mut next = BigUint::from(1u32);
    for _ in 0..n {
        let after = &current + &next;
        terms.push(std::mem::replace(
            &mut current,
            std::mem::replace(&mut next, after),
        ));
    }
    terms
}

/// Trial division up to the square root. 2 is the only even prime.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    // `d <= n / d` rather than `d * d <= n` so large inputs cannot overflow
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Keep the primes, in their original order.
pub fn filter_primes(values: &[u64]) -> Vec<u64> {
    values.iter().copied().filter(|&v| is_prime(v)).collect()
}

/// Euclid's algorithm. `gcd(0, 0)` is 0.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple. Zero if either operand is zero.
pub fn lcm(a: u64, b: u64) -> u128 {
    let divisor = gcd(a, b);
    if divisor == 0 {
        return 0;
    }
    u128::from(a) * u128::from(b) / u128::from(divisor)
}

/// Left fold of [`gcd`]. Stops early once the running value is 1.
///
/// A single element yields itself; an empty slice yields 0.
pub fn array_gcd(values: &[u64]) -> u64 {
    let Some((&first, rest)) = values.split_first() else {
        return 0;
    };
    let mut acc = first;
    for &value in rest {
        if acc == 1 {
            break;
        }
        acc = gcd(acc, value);
    }
    acc
}

/// Left fold of [`lcm`], accumulated as a big integer.
///
/// A single element yields itself; an empty slice yields 0.
pub fn array_lcm(values: &[u64]) -> BigUint {
    let Some((&first, rest)) = values.split_first() else {
        return BigUint::default();
    };
    let zero = BigUint::default();
    rest.iter().fold(BigUint::from(first), |acc, &value| {
        if value == 0 || acc == zero {
            return BigUint::default();
        }
        // acc % value < value, so it has at most one u64 digit
        let remainder = (&acc % value).iter_u64_digits().next().unwrap_or(0);
        acc / gcd(value, remainder) * value
    })
}

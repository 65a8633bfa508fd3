//! Combinatorial helpers shared by the cost formulas, all on the log2 scale.

/// log2 of the binomial coefficient `C(n, k)`; `-inf` outside `0 <= k <= n`.
pub fn log2_binomial(n: i64, k: i64) -> f64 {
    if k < 0 || n < 0 || k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    (1..=k)
        .map(|i| ((n - k + i) as f64).log2() - (i as f64).log2())
        .sum()
}

/// Binary entropy `H(x)`, zero at the endpoints.
pub fn binary_entropy(x: f64) -> f64 {
    if x <= 0.0 || x >= 1.0 {
        return 0.0;
    }
    -x * x.log2() - (1.0 - x) * (1.0 - x).log2()
}

/// Asymptotic `log2 C(n, k) ~ n H(k/n)`.
pub fn log2_binomial_approx(n: f64, k: f64) -> f64 {
    if k < 0.0 || k > n || n <= 0.0 {
        return f64::NEG_INFINITY;
    }
    n * binary_entropy(k / n)
}

/// `log2(2^a + 2^b)` without leaving the log domain.
pub fn log2_sum(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    if lo == f64::NEG_INFINITY {
        return hi;
    }
    hi + (1.0 + (lo - hi).exp2()).log2()
}

/// Basic operations of Gaussian elimination with the method of four Russians, block size `r`.
pub fn gaussian_elimination_complexity(n: i64, k: i64, r: i64) -> f64 {
    if r != 0 {
        let rows = (r * r) as f64 + (r as f64).exp2() + (n - k - r) as f64;
        return rows * ((n + r - 1) / r) as f64;
    }
    ((n - k) * (n - k)) as f64
}

/// Elements stored for the parity-check matrix plus the `2^r` lookup table.
pub fn matrix_memory(n: i64, k: i64, r: i64) -> f64 {
    (n - k) as f64 + (r as f64).exp2()
}

/// log2 cost of merging two lists of size `2^log_list` on `l` bits through a hash map.
pub fn log2_list_merge(log_list: f64, l: i64) -> f64 {
    if log_list <= 0.0 {
        return 0.0;
    }
    log2_sum(1.0 + log_list, 2.0 * log_list - l as f64)
}

/// Whether `q` is `p^e` for a prime `p` and `e >= 1`.
pub fn is_prime_power(q: u64) -> bool {
    if q < 2 {
        return false;
    }
    let mut p = 2u64;
    let mut rest = q;
    while p * p <= rest {
        if rest % p == 0 {
            while rest % p == 0 {
                rest /= p;
            }
            return rest == 1;
        }
        p += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn binomials() {
        assert!(close(log2_binomial(10, 3), 120f64.log2()));
        assert!(close(log2_binomial(10, 7), 120f64.log2()));
        assert_eq!(log2_binomial(5, 0), 0.0);
        assert_eq!(log2_binomial(5, 6), f64::NEG_INFINITY);
        assert!(close(log2_binomial(100, 10), 17_310_309_456_440f64.log2()));
    }

    #[test]
    fn entropy_and_approximation() {
        assert!(close(binary_entropy(0.5), 1.0));
        assert_eq!(binary_entropy(0.0), 0.0);
        assert!(close(log2_binomial_approx(100.0, 50.0), 100.0));
        assert!(log2_binomial_approx(100.0, 10.0) > log2_binomial(100, 10));
    }

    #[test]
    fn log_domain_sum() {
        assert!(close(log2_sum(3.0, 3.0), 4.0));
        assert!(close(log2_sum(0.0, f64::NEG_INFINITY), 0.0));
        assert!(close(log2_sum(1.0, 0.0), 3f64.log2()));
    }

    #[test]
    fn four_russians() {
        assert_eq!(gaussian_elimination_complexity(100, 50, 4), 1950.0);
        assert_eq!(gaussian_elimination_complexity(100, 50, 0), 2500.0);
        assert_eq!(matrix_memory(100, 50, 4), 66.0);
    }

    #[test]
    fn prime_powers() {
        for q in [2, 3, 4, 8, 9, 25, 27, 49, 251, 256] {
            assert!(is_prime_power(q), "{}", q);
        }
        for q in [0, 1, 6, 10, 12, 100, 255] {
            assert!(!is_prime_power(q), "{}", q);
        }
    }
}

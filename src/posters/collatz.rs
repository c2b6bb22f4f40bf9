//! Collatz trajectories: halve evens, 3n+1 odds, until 1.

use rand::Rng;

use super::{example_rng, fill_rows};
use crate::error::{PosterError, Result};

/// Trajectory cap per example; long chains are elided on the poster anyway.
pub const MAX_STEPS: usize = 20;

const SHOWN_TERMS: usize = 8;

pub fn collatz_step(n: u64) -> Option<u64> {
    if n % 2 == 0 {
        Some(n / 2)
    } else {
        n.checked_mul(3)?.checked_add(1)
    }
}

/// `n` and its successors, stopping at 1 or after `max_steps` terms.
pub fn collatz_chain(start: u64, max_steps: usize) -> Result<Vec<u64>> {
    if start == 0 {
        return Err(PosterError::domain("collatz start must be positive"));
    }
    if max_steps == 0 {
        return Err(PosterError::domain("collatz chain needs at least one term"));
    }
    let mut n = start;
    let mut chain = vec![n];
    while n != 1 && chain.len() < max_steps {
        n = collatz_step(n)
            .ok_or_else(|| PosterError::domain(format!("collatz overflow after {n}")))?;
        chain.push(n);
    }
    Ok(chain)
}

fn make_example(seed: u64) -> Result<String> {
    let n: u64 = example_rng(seed).gen_range(2..=9999);
    let chain = collatz_chain(n, MAX_STEPS)?;
    let mut short = chain
        .iter()
        .take(SHOWN_TERMS)
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("->");
    if chain.len() > SHOWN_TERMS {
        short.push_str("...");
    }
    Ok(format!("{n}: {short} "))
}

pub fn build_text_grid(cols: u32, rows: u32, seed: u64) -> Result<Vec<String>> {
    fill_rows(cols, rows, seed, make_example)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_reaches_one() {
        assert_eq!(collatz_chain(6, MAX_STEPS).unwrap(), vec![6, 3, 10, 5, 16, 8, 4, 2, 1]);
        assert_eq!(collatz_chain(1, MAX_STEPS).unwrap(), vec![1]);
    }

    #[test]
    fn test_chain_is_capped() {
        let chain = collatz_chain(27, MAX_STEPS).unwrap();
        assert_eq!(chain.len(), MAX_STEPS);
        assert_eq!(&chain[..4], &[27, 82, 41, 124]);
    }

    #[test]
    fn test_zero_start_is_domain_error() {
        assert!(matches!(collatz_chain(0, MAX_STEPS), Err(PosterError::Domain(_))));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(collatz_step(u64::MAX).is_none());
        assert!(collatz_chain(u64::MAX, MAX_STEPS).is_err());
    }

    #[test]
    fn test_example_elides_long_chains() {
        let example = make_example(3).unwrap();
        let (start, rest) = example.split_once(": ").unwrap();
        let n: u64 = start.parse().unwrap();
        let chain = collatz_chain(n, MAX_STEPS).unwrap();
        assert_eq!(rest.ends_with("... "), chain.len() > SHOWN_TERMS);
    }
}

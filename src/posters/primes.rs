//! Primes in order, separated by single spaces, so gaps show as texture.

use std::collections::VecDeque;

use crate::error::{PosterError, Result};

/// Width of each window sieved by [`PrimeStream`].
const SEGMENT_LEN: u64 = 1 << 15;

/// Largest accepted start; keeps the base sieve of each window small.
pub const MAX_START: u64 = 1_000_000_000_000;

/// All primes `<= limit` by the sieve of Eratosthenes.
pub fn sieve(limit: u64) -> Result<Vec<u64>> {
    if limit < 2 {
        return Err(PosterError::domain(format!(
            "sieve limit must be at least 2, got {limit}"
        )));
    }
    let limit = usize::try_from(limit)
        .map_err(|_| PosterError::domain(format!("sieve limit {limit} exceeds address space")))?;
    Ok(sieve_upto(limit))
}

fn sieve_upto(limit: usize) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let mut composite = vec![false; limit + 1];
    let mut primes = Vec::new();
    for i in 2..=limit {
        if composite[i] {
            continue;
        }
        primes.push(i as u64);
        if let Some(mut j) = i.checked_mul(i) {
            while j <= limit {
                composite[j] = true;
                j += i;
            }
        }
    }
    primes
}

fn isqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
        r += 1;
    }
    r
}

/// Primes in `[lo, hi)`, sieving only that window.
pub fn primes_in_range(lo: u64, hi: u64) -> Vec<u64> {
    if hi <= lo || hi <= 2 {
        return Vec::new();
    }
    let lo = lo.max(2);
    let base = sieve_upto(isqrt(hi - 1) as usize);
    let mut composite = vec![false; (hi - lo) as usize];
    for p in base {
        let first = match p.checked_mul(p) {
            Some(sq) if sq >= lo => sq,
            Some(_) => lo.div_ceil(p) * p,
            None => continue,
        };
        let mut m = first;
        while m < hi {
            composite[(m - lo) as usize] = true;
            m = match m.checked_add(p) {
                Some(next) => next,
                None => break,
            };
        }
    }
    composite
        .iter()
        .enumerate()
        .filter(|&(_, &c)| !c)
        .map(|(offset, _)| lo + offset as u64)
        .collect()
}

/// Unbounded increasing primes starting at a given value, sieved window by
/// window.
pub struct PrimeStream {
    next_lo: u64,
    buffered: VecDeque<u64>,
}

impl PrimeStream {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next_lo: start,
            buffered: VecDeque::new(),
        }
    }
}

impl Iterator for PrimeStream {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            if let Some(p) = self.buffered.pop_front() {
                return Some(p);
            }
            if self.next_lo == u64::MAX {
                return None;
            }
            let hi = self.next_lo.saturating_add(SEGMENT_LEN);
            self.buffered.extend(primes_in_range(self.next_lo, hi));
            self.next_lo = hi;
        }
    }
}

pub fn check_start(start: u64) -> Result<()> {
    if start > MAX_START {
        return Err(PosterError::domain(format!(
            "prime start {start} is above the supported maximum {MAX_START}"
        )));
    }
    Ok(())
}

/// Lines of `p ` tokens; the stream carries over from line to line.
pub fn build_text_grid(cols: u32, rows: u32, seed: u64) -> Result<Vec<String>> {
    check_start(seed)?;
    let cols = cols as usize;
    let mut stream = PrimeStream::starting_at(seed);
    let mut lines = Vec::with_capacity(rows as usize);
    for _ in 0..rows {
        let mut line = String::with_capacity(cols + 24);
        while line.len() < cols {
            let p = stream
                .next()
                .ok_or_else(|| PosterError::domain(format!("no primes left after seed {seed}")))?;
            line.push_str(&p.to_string());
            line.push(' ');
        }
        line.truncate(cols);
        lines.push(line);
    }
    Ok(lines)
}

//! 9 x n always collapses to 9 under repeated digit sums.

use std::convert::Infallible;

use rand::Rng;

use super::{example_rng, fill_rows};

/// `n`, then its digit sum, then that number's digit sum, until one digit.
pub fn digit_sum_chain(mut n: u64) -> Vec<u64> {
    let mut chain = vec![n];
    while n >= 10 {
        n = digits(n).iter().map(|&d| u64::from(d)).sum();
        chain.push(n);
    }
    chain
}

fn digits(n: u64) -> Vec<u8> {
    n.to_string().bytes().map(|b| b - b'0').collect()
}

/// `1+8=9 -> ...` rendering of a chain.
pub fn format_chain(chain: &[u64]) -> String {
    chain
        .windows(2)
        .map(|pair| {
            let addends: Vec<String> = digits(pair[0]).iter().map(|d| d.to_string()).collect();
            format!("{}={}", addends.join("+"), pair[1])
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn make_example(seed: u64) -> String {
    let n: u64 = example_rng(seed).gen_range(2..=9999);
    let product = 9 * n;
    let chain = digit_sum_chain(product);
    format!("9x{n}={product} | {} ", format_chain(&chain))
}

pub fn build_text_grid(cols: u32, rows: u32, seed: u64) -> Vec<String> {
    fill_rows(cols, rows, seed, |s| Ok::<_, Infallible>(make_example(s)))
        .unwrap_or_else(|never| match never {})
}

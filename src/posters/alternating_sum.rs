//! 11 divides n exactly when it divides the alternating digit sum.

use std::convert::Infallible;

use rand::Rng;

use super::{example_rng, fill_rows};

/// `d0 - d1 + d2 - ...`, digits read from the left.
pub fn alternating_sum(n: u64) -> i64 {
    n.to_string()
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = i64::from(b - b'0');
            if i % 2 == 0 {
                d
            } else {
                -d
            }
        })
        .sum()
}

fn make_example(seed: u64) -> String {
    let n: u64 = example_rng(seed).gen_range(11..=99_999);
    let alt = alternating_sum(n);
    let verdict = if alt % 11 == 0 { "Y" } else { "N" };
    format!("11|{n}? alt={alt} {verdict} ")
}

pub fn build_text_grid(cols: u32, rows: u32, seed: u64) -> Vec<String> {
    fill_rows(cols, rows, seed, |s| Ok::<_, Infallible>(make_example(s)))
        .unwrap_or_else(|never| match never {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_sum() {
        assert_eq!(alternating_sum(121), 1 - 2 + 1);
        assert_eq!(alternating_sum(90_817), 9 - 0 + 8 - 1 + 7);
        assert_eq!(alternating_sum(19), -8);
    }

    #[test]
    fn test_rule_matches_divisibility() {
        for n in 11..5_000u64 {
            assert_eq!(alternating_sum(n) % 11 == 0, n % 11 == 0, "n={n}");
        }
    }

    #[test]
    fn test_example_verdict() {
        let example = make_example(7);
        let verdict = example.trim_end().rsplit(' ').next().unwrap();
        assert!(verdict == "Y" || verdict == "N");
        assert!(example.starts_with("11|"));
    }
}

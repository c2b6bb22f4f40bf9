//! Digits of π, one per grid cell.
//!
//! Digits come from Machin's formula `π = 16·atan(1/5) − 4·atan(1/239)`
//! evaluated in fixed point with base-10⁹ limbs. Limb 0 holds the integer
//! part; a few guard limbs absorb the truncation error of each division.

use std::fmt::Write;

use crate::error::{PosterError, Result};

pub const DEFAULT_PRECISION: usize = 50_000;
/// Work grows with the square of the precision; 100k digits take seconds.
pub const MAX_PRECISION: usize = 100_000;

const LIMB: u64 = 1_000_000_000;
const LIMB_DIGITS: usize = 9;
const GUARD_LIMBS: usize = 3;

pub fn check_precision(precision: usize) -> Result<()> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(PosterError::domain(format!(
            "pi precision must be within 1..={MAX_PRECISION}, got {precision}"
        )));
    }
    Ok(())
}

/// The first `precision` significant digits of π, without the decimal point.
pub fn pi_digits(precision: usize) -> Result<String> {
    check_precision(precision)?;
    Ok(compute_digits(precision))
}

pub(crate) fn compute_digits(precision: usize) -> String {
    let len = precision / LIMB_DIGITS + GUARD_LIMBS + 1;

    let mut pi = arctan_inv(5, len);
    mul_small(&mut pi, 16);
    let mut tail = arctan_inv(239, len);
    mul_small(&mut tail, 4);
    sub_from(&mut pi, &tail, 0);

    let mut digits = String::with_capacity(len * LIMB_DIGITS + 1);
    digits.push_str(&pi[0].to_string());
    for limb in &pi[1..] {
        let _ = write!(digits, "{limb:09}");
    }
    digits.truncate(precision);
    digits
}

/// `atan(1/x)` as a fixed-point number of `len` limbs.
fn arctan_inv(x: u64, len: usize) -> Vec<u64> {
    let mut sum = vec![0u64; len];
    let mut term = vec![0u64; len];
    let mut scaled = vec![0u64; len];

    term[0] = 1;
    let mut lead = div_small(&mut term, x, 0);
    add_from(&mut sum, &term, lead);

    let x2 = x * x;
    let mut k = 1u64;
    loop {
        lead = div_small(&mut term, x2, lead);
        if lead >= len {
            break;
        }
        div_into(&term, 2 * k + 1, &mut scaled, lead);
        if k % 2 == 1 {
            sub_from(&mut sum, &scaled, lead);
        } else {
            add_from(&mut sum, &scaled, lead);
        }
        k += 1;
    }
    sum
}

/// Divide in place, skipping the known-zero prefix. Returns the new index of
/// the first non-zero limb (`len` when the value reached zero).
fn div_small(num: &mut [u64], divisor: u64, lead: usize) -> usize {
    let mut rem = 0u64;
    for limb in &mut num[lead..] {
        let cur = rem * LIMB + *limb;
        *limb = cur / divisor;
        rem = cur % divisor;
    }
    num[lead..]
        .iter()
        .position(|&l| l != 0)
        .map_or(num.len(), |offset| lead + offset)
}

fn div_into(num: &[u64], divisor: u64, out: &mut [u64], lead: usize) {
    out[..lead].fill(0);
    let mut rem = 0u64;
    for (dst, &src) in out[lead..].iter_mut().zip(&num[lead..]) {
        let cur = rem * LIMB + src;
        *dst = cur / divisor;
        rem = cur % divisor;
    }
}

/// `acc += addend`, where `addend` is zero below index `from`.
fn add_from(acc: &mut [u64], addend: &[u64], from: usize) {
    let mut carry = 0u64;
    for i in (from..acc.len()).rev() {
        let v = acc[i] + addend[i] + carry;
        if v >= LIMB {
            acc[i] = v - LIMB;
            carry = 1;
        } else {
            acc[i] = v;
            carry = 0;
        }
    }
    let mut i = from;
    while carry > 0 && i > 0 {
        i -= 1;
        acc[i] += 1;
        if acc[i] >= LIMB {
            acc[i] -= LIMB;
        } else {
            carry = 0;
        }
    }
}

/// `acc -= subtrahend`, where `subtrahend` is zero below index `from`.
/// Callers guarantee `acc >= subtrahend`.
fn sub_from(acc: &mut [u64], subtrahend: &[u64], from: usize) {
    let mut borrow = 0u64;
    for i in (from..acc.len()).rev() {
        let need = subtrahend[i] + borrow;
        if acc[i] >= need {
            acc[i] -= need;
            borrow = 0;
        } else {
            acc[i] = acc[i] + LIMB - need;
            borrow = 1;
        }
    }
    let mut i = from;
    while borrow > 0 && i > 0 {
        i -= 1;
        if acc[i] > 0 {
            acc[i] -= 1;
            borrow = 0;
        } else {
            acc[i] = LIMB - 1;
        }
    }
}

fn mul_small(num: &mut [u64], factor: u64) {
    let mut carry = 0u64;
    for limb in num.iter_mut().rev() {
        let v = *limb * factor + carry;
        *limb = v % LIMB;
        carry = v / LIMB;
    }
}

/// Fill the grid with consecutive digits starting at `seed mod len`,
/// wrapping to the start when the digits run out.
pub fn build_text_grid(digits: &str, cols: u32, rows: u32, seed: u64) -> Vec<String> {
    let bytes = digits.as_bytes();
    if bytes.is_empty() {
        return Vec::new();
    }
    let cols = cols as usize;
    let mut pos = (seed % bytes.len() as u64) as usize;
    (0..rows)
        .map(|_| {
            let mut line = String::with_capacity(cols);
            for _ in 0..cols {
                line.push(char::from(bytes[pos]));
                pos = (pos + 1) % bytes.len();
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_digits() {
        assert_eq!(
            pi_digits(50).unwrap(),
            "31415926535897932384626433832795028841971693993751"
        );
        assert_eq!(pi_digits(1).unwrap(), "3");
    }

    #[test]
    fn test_thousand_digits() {
        let digits = pi_digits(1_000).unwrap();
        assert_eq!(digits.len(), 1_000);
        // Six nines starting at decimal place 762.
        assert_eq!(&digits[762..768], "999999");
        assert_eq!(&digits[980..], "76611195909216420198");
    }

    #[test]
    fn test_precision_limits() {
        assert!(matches!(pi_digits(0), Err(PosterError::Domain(_))));
        assert!(matches!(
            pi_digits(MAX_PRECISION + 1),
            Err(PosterError::Domain(_))
        ));
    }

    #[test]
    fn test_precision_cap() {
        assert_eq!(MAX_PRECISION, 100_000);
        assert!(check_precision(MAX_PRECISION).is_ok());
        assert!(check_precision(DEFAULT_PRECISION).is_ok());
        assert!(matches!(
            check_precision(1_000_000),
            Err(PosterError::Domain(_))
        ));
    }

    #[test]
    fn test_grid_wraps_around() {
        let lines = build_text_grid("31415", 4, 2, 3);
        assert_eq!(lines, vec!["1531", "4153"]);
    }

    #[test]
    fn test_grid_offset_by_seed() {
        let digits = pi_digits(40).unwrap();
        let lines = build_text_grid(&digits, 10, 1, 0);
        assert_eq!(lines, vec!["3141592653"]);
        let shifted = build_text_grid(&digits, 10, 1, 42);
        assert_eq!(shifted, vec![digits[2..12].to_string()]);
    }
}

use anyhow::{Result, bail};
use std::collections::HashSet;

/// Seed used when the caller supplies none.
pub const DEFAULT_SEED: u64 = 1337;

/// Resolve CLI seed arguments into unique numeric seeds.
///
/// Accepts decimal integers (negative values map to their magnitude) and
/// `0x`-prefixed hexadecimal. Order is preserved and duplicates dropped.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let Some(seed) = parse_seed(token) else {
            bail!("Unrecognized seed token: {token}");
        };
        if seen.insert(seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}

fn parse_seed(token: &str) -> Option<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).ok();
    }
    if let Ok(value) = token.parse::<i64>() {
        return Some(value.unsigned_abs());
    }
    token.parse::<u64>().ok()
}

// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Returns the number of digits in the concatenation of `1, 2, ..., n`.
///
/// Numbers with `d` digits contribute `9 * 10^(d - 1)` numbers of `d` digits each, except for the
/// last, partially filled group that `n` falls into.
///
/// The count for `u64::MAX` is about `3.6e20`, so the result is a `u128`. Returns 0 for `n == 0`.
pub fn lang_getal(n: u64) -> u128 {
    let Some(magnitude) = n.checked_ilog10() else {
        return 0;
    };

    let full_groups: u128 = (0..magnitude)
        .map(|i| 9 * 10u128.pow(i) * u128::from(i + 1))
        .sum();
    let last_group = u128::from(n) - 10u128.pow(magnitude) + 1;

    full_groups + last_group * u128::from(magnitude + 1)
}

//! Integer division convention
//!
//! Division and modulo are **floored** everywhere in this crate (Python's
//! `//` and `%`): the quotient rounds toward negative infinity and the
//! remainder takes the sign of the divisor, so `a == b * floor_div(a, b) +
//! floor_mod(a, b)` always holds.
//!
//! | a  | b  | floor_div | floor_mod |
//! |----|----|-----------|-----------|
//! | 7  | 2  | 3         | 1         |
//! | -7 | 2  | -4        | 1         |
//! | 7  | -2 | -4        | -1        |
//! | -7 | -2 | 3         | -1        |
//!
//! Both return `None` on a zero divisor or on overflow (`i64::MIN / -1`).

/// Floored integer division
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

/// Floored modulo; the result has the sign of `b`
pub fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

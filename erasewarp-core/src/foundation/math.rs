/// Clamp to `[0, 1]`, mapping NaN to `0` (HLSL `saturate`).
#[inline]
pub(crate) fn saturate(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Four-point cubic blend through `p1` (t = 0) and `p2` (t = 1).
#[inline]
pub(crate) fn cubic(p: [f64; 4], t: f64) -> f64 {
    let [p0, p1, p2, p3] = p;
    p1 + 0.5
        * t
        * (p2 - p0 + t * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3 + t * (3.0 * (p1 - p2) + p3 - p0)))
}

/// Map pixel index `i` of an axis with `n` pixels onto `[0, 1]`.
///
/// A single-pixel axis maps to `0`.
#[inline]
pub(crate) fn normalized_index(i: u32, n: u32) -> f64 {
    if n <= 1 {
        0.0
    } else {
        f64::from(i) / f64::from(n - 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

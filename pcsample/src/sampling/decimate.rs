/// Select indices at a fixed stride of `ceil(n / target)`, starting at zero, so that the result
/// preserves input order and never exceeds `target` entries. A zero target selects nothing.
///
/// # Examples
///
/// ```
/// use pcsample::sampling::decimate::decimate;
/// assert_eq!(decimate(10, 3), vec![0, 4, 8]);
/// ```
pub fn decimate(n: usize, target: usize) -> Vec<usize> {
    if target == 0 {
        return Vec::new();
    }

    let stride = n.div_ceil(target).max(1);
    (0..n).step_by(stride).collect()
}

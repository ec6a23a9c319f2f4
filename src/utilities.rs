/// Linear interpolation of tabulated `y(x)` at `x_new`.
///
/// `x` must be ascending. Outside the tabulated range the nearest end value is
/// returned; an empty table yields zero.
pub fn interpolate_linear(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    let n = x.len().min(y.len());
    match n {
        0 => return 0.0,
        1 => return y[0],
        _ => {}
    }
    if x_new <= x[0] {
        return y[0];
    }
    if x_new >= x[n - 1] {
        return y[n - 1];
    }

    // first index with x > x_new; the bracket is [hi - 1, hi]
    let hi = x[..n].partition_point(|&xi| xi <= x_new);
    let lo = hi - 1;
    let t = (x_new - x[lo]) / (x[hi] - x[lo]);
    y[lo] + t * (y[hi] - y[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_linear() {
        let x = [0.0, 100.0, 300.0];
        let y = [0.1, 0.3, 0.7];
        assert_eq!(interpolate_linear(&x, &y, -5.0), 0.1);
        assert_eq!(interpolate_linear(&x, &y, 500.0), 0.7);
        assert!((interpolate_linear(&x, &y, 50.0) - 0.2).abs() < 1e-12);
        assert!((interpolate_linear(&x, &y, 200.0) - 0.5).abs() < 1e-12);
        assert_eq!(interpolate_linear(&x, &y, 100.0), 0.3);
    }

    #[test]
    fn test_degenerate_tables() {
        assert_eq!(interpolate_linear(&[], &[], 1.0), 0.0);
        assert_eq!(interpolate_linear(&[10.0], &[0.4], 1.0), 0.4);
    }
}

/// Pearson correlation over complete pairs.
///
/// Returns `None` when the coefficient is undefined: fewer than two pairs,
/// or zero variance on either side. Callers render that as "N/A" instead of
/// a numeric value.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_increasing_pair_is_one() {
        let pairs = [(100.0, 80.0), (150.0, 90.0), (200.0, 100.0)];
        let c = pearson(&pairs).unwrap();
        assert!((c - 1.0).abs() < 1e-9);
    }

    #[test]
    fn perfectly_opposed_pair_is_minus_one() {
        let pairs = [(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)];
        let c = pearson(&pairs).unwrap();
        assert!((c + 1.0).abs() < 1e-9);
    }

    #[test]
    fn correlation_is_symmetric() {
        let pairs = [(1.0, 5.0), (2.0, 3.0), (4.0, 9.0), (7.0, 2.0)];
        let swapped: Vec<(f64, f64)> = pairs.iter().map(|(x, y)| (*y, *x)).collect();
        assert_eq!(pearson(&pairs), pearson(&swapped));
    }

    #[test]
    fn undefined_for_fewer_than_two_pairs() {
        assert_eq!(pearson(&[]), None);
        assert_eq!(pearson(&[(1.0, 2.0)]), None);
    }

    #[test]
    fn undefined_for_zero_variance() {
        assert_eq!(pearson(&[(1.0, 2.0), (1.0, 3.0)]), None);
        assert_eq!(pearson(&[(1.0, 2.0), (3.0, 2.0)]), None);
    }
}

/// In-place L2 normalization helper to keep allocations down on the embed
/// path. Uses f32 throughout for better SIMD auto-vectorization.
pub(crate) fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_unit_length() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize_in_place(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_untouched() {
        let mut v = vec![0.0f32, 0.0, 0.0];
        l2_normalize_in_place(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn unit_norm_after_normalization() {
        let mut v: Vec<f32> = (1..=512).map(|i| i as f32).collect();
        l2_normalize_in_place(&mut v);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn empty_slice_is_fine() {
        let mut v: Vec<f32> = vec![];
        l2_normalize_in_place(&mut v);
        assert!(v.is_empty());
    }

    #[test]
    fn preserves_direction() {
        let mut v = vec![-1.0f32, 2.0, -3.0];
        l2_normalize_in_place(&mut v);
        assert!(v[0] < 0.0 && v[1] > 0.0 && v[2] < 0.0);
        let ratio = v[2] / v[0];
        assert!((ratio - 3.0).abs() < 1e-5);
    }
}

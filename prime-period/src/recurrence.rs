/// Euclidean distance ‖p − q‖.
pub fn euclidean_distance(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

/// Whether `p` and `q` are the same point to within `atol`.
pub fn recurs(p: &[f64], q: &[f64], atol: f64) -> bool {
    euclidean_distance(p, q) <= atol
}

use std::collections::HashMap;

/// Sparse term-weight vector. A term that is not stored has weight 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    weights: HashMap<String, f64>,
}

impl SparseVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { weights: HashMap::with_capacity(n) }
    }

    pub fn insert(&mut self, term: impl Into<String>, weight: f64) {
        self.weights.insert(term.into(), weight);
    }

    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut v = SparseVector::new();
        for (t, w) in iter {
            v.insert(t, w);
        }
        v
    }
}

/// Cosine similarity of a document vector `d` and a query vector `q`.
///
/// Disjoint supports score exactly 0. The document norm runs over all of
/// `d`, not only the query terms. A zero denominator (every shared term
/// weighs 0) or a non-finite result also scores 0.
pub fn cosine(d: &SparseVector, q: &SparseVector) -> f64 {
    if !q.iter().any(|(term, _)| d.contains(term)) {
        return 0.0;
    }
    let dot: f64 = q.iter().map(|(term, w)| d.weight(term) * w).sum();
    let denom = q.norm() * d.norm();
    let sim = dot / denom;
    if !sim.is_finite() {
        return 0.0;
    }
    sim.clamp(0.0, 1.0)
}

//! Cosine similarity ranking over a linear scan of candidates

use crate::error::{Error, Result};

/// A candidate paired with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<M> {
    pub item: M,
    pub score: f32,
}

/// Cosine similarity of two equal-length vectors
///
/// Returns `0.0` when either vector has zero norm. Fails with
/// [`Error::VectorSpace`] if the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::VectorSpace {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Score every candidate against `query` and order them by descending score
///
/// Equal scores keep their input order. Every candidate vector is checked
/// against the query dimension before anything is scored, so a mismatch
/// fails the whole ranking.
pub fn rank<'a, M, I>(query: &[f32], candidates: I) -> Result<Vec<Scored<M>>>
where
    I: IntoIterator<Item = (&'a [f32], M)>,
{
    let candidates: Vec<(&[f32], M)> = candidates.into_iter().collect();

    if let Some((vector, _)) = candidates.iter().find(|(v, _)| v.len() != query.len()) {
        return Err(Error::VectorSpace {
            expected: query.len(),
            actual: vector.len(),
        });
    }

    let mut scored = Vec::with_capacity(candidates.len());
    for (vector, item) in candidates {
        let score = cosine_similarity(query, vector)?;
        scored.push(Scored { item, score });
    }

    // sort_by is stable; ties stay in input order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = [0.6, 0.8];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        let score = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_sentinel() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let err = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::VectorSpace { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_rank_orders_descending() {
        let query = [1.0, 0.0];
        let low = [0.0, 1.0];
        let high = [1.0, 0.1];
        let mid = [1.0, 1.0];
        let ranked = rank(
            &query,
            vec![(&low[..], "low"), (&high[..], "high"), (&mid[..], "mid")],
        )
        .unwrap();

        let order: Vec<&str> = ranked.iter().map(|s| s.item).collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let query = [1.0, 1.0];
        let same = [2.0, 2.0];
        let ranked = rank(
            &query,
            vec![(&same[..], 0), (&same[..], 1), (&same[..], 2)],
        )
        .unwrap();

        let order: Vec<i32> = ranked.iter().map(|s| s.item).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_rank_zero_query_scores_all_zero() {
        let query = [0.0, 0.0, 0.0];
        let a = [0.1, 0.2, 0.3];
        let b = [0.5, 0.0, 0.0];
        let ranked = rank(&query, vec![(&a[..], 'a'), (&b[..], 'b')]).unwrap();
        assert!(ranked.iter().all(|s| s.score == 0.0));
        assert_eq!(ranked[0].item, 'a');
    }

    #[test]
    fn test_rank_rejects_mixed_dimensions() {
        let query = [1.0, 0.0];
        let ok = [1.0, 0.0];
        let stale = [1.0];
        let result = rank(&query, vec![(&ok[..], 1), (&stale[..], 2)]);
        assert!(matches!(result, Err(Error::VectorSpace { .. })));
    }

    #[test]
    fn test_rank_is_deterministic() {
        let query = [0.3, 0.7, 0.1];
        let candidates = [[0.2, 0.1, 0.9], [0.3, 0.7, 0.0], [0.9, 0.1, 0.1]];
        let run = || {
            rank(&query, candidates.iter().enumerate().map(|(i, c)| (&c[..], i))).unwrap()
        };
        assert_eq!(run(), run());
    }
}

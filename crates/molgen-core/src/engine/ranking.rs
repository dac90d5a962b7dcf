use crate::core::models::result::GenerationResult;

/// Orders results by ascending `|deviation|`.
///
/// The sort is stable, so results with equal absolute deviation keep the order
/// in which the search emitted them. The input slice is not modified.
pub fn rank(results: &[GenerationResult]) -> Vec<GenerationResult> {
    let mut ranked = results.to_vec();
    ranked.sort_by(|a, b| a.deviation().abs().total_cmp(&b.deviation().abs()));
    ranked
}

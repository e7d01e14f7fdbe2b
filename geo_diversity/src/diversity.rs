use log::debug;

use crate::config::*;

/// The Gini-Simpson index `1 - Σ p_i²` of a set of category weights.
///
/// The weights are first rescaled to sum to 1, so percentages and raw counts
/// can be passed as well as proportions. Zero weights do not contribute.
/// Returns `None` if there is no positive weight at all.
///
/// ```
/// use geo_diversity::gini_simpson;
///
/// assert_eq!(gini_simpson(&[0.5, 0.5]), Some(0.5));
/// assert_eq!(gini_simpson(&[1.0]), Some(0.0));
/// assert_eq!(gini_simpson(&[0.0, 0.0]), None);
/// ```
pub fn gini_simpson(weights: &[f64]) -> Option<f64> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let concentration: f64 = weights
        .iter()
        .filter(|w| **w > 0.0)
        .map(|w| {
            let p = w / total;
            p * p
        })
        .sum();
    Some((1.0 - concentration).clamp(0.0, 1.0))
}

/// Diversity index of each conference of a distribution.
///
/// The unknown share is left out before the proportions are rescaled. A
/// conference with no located record gets no score. Only the groups without a
/// year are scored: pass a distribution grouped by conference.
pub fn diversity(dist: &Distribution) -> Vec<DiversityScore> {
    let mut res: Vec<DiversityScore> = Vec::new();
    for group in dist.groups().iter().filter(|g| g.year.is_none()) {
        let known: Vec<f64> = dist
            .rows_for(group)
            .filter(|r| r.continent != Continent::Unknown)
            .map(|r| r.percentage)
            .collect();
        match gini_simpson(&known) {
            Some(index) => res.push(DiversityScore {
                conference: group.conference,
                index,
            }),
            None => {
                debug!("diversity: no located records for {:?}", group.conference);
            }
        }
    }
    res
}

use log::{debug, info};

use crate::config::*;

/// Orders conferences by decreasing value.
///
/// Equal values keep the order in which they are given. If a conference
/// appears several times, only its first value is used.
pub fn rank_values(values: &[(Conference, f64)]) -> Vec<Conference> {
    let mut seen: Vec<Conference> = Vec::new();
    let mut keyed: Vec<(Conference, f64)> = Vec::new();
    for (c, v) in values.iter() {
        if !seen.contains(c) {
            seen.push(*c);
            keyed.push((*c, *v));
        }
    }
    // sort_by is stable.
    keyed.sort_by(|a, b| b.1.total_cmp(&a.1));
    keyed.into_iter().map(|(c, _)| c).collect()
}

/// Orders the conferences of a distribution by decreasing share of
/// `key_continent`.
///
/// Conferences without a row for this continent are not part of the result.
///
/// ```
/// use geo_diversity::*;
/// use geo_diversity::builder::Builder;
///
/// let mut builder = Builder::new(&Vocabulary::standard(), RecordKind::Accepted);
/// builder.add_row("osdi", Some(2020), Some("NA"));
/// builder.add_row("osdi", Some(2020), Some("EU"));
/// builder.add_row("nsdi", Some(2020), Some("NA"));
/// builder.add_row("atc", Some(2020), Some("AS"));
///
/// let dist = aggregate(builder.records(), &AggregateOptions::DEFAULT_OPTIONS);
/// let order = rank(&dist, Continent::NorthAmerica);
/// assert_eq!(order, vec![Conference::Nsdi, Conference::Osdi]);
/// ```
pub fn rank(dist: &Distribution, key_continent: Continent) -> Vec<Conference> {
    let values: Vec<(Conference, f64)> = dist
        .rows
        .iter()
        .filter(|r| r.group.year.is_none() && r.continent == key_continent)
        .map(|r| (r.group.conference, r.percentage))
        .collect();
    let order = rank_values(&values);
    info!(
        "rank: {:?} conferences ordered by {}: {:?}",
        order.len(),
        key_continent,
        order
    );
    order
}

/// Completes an order with the conferences that were not ranked.
///
/// `present` lists the conferences of the table the order is applied to.
/// The missing ones are dropped or added at the end in their default order.
pub fn complete_order(
    order: &[Conference],
    present: &[Conference],
    placement: KeylessPlacement,
) -> Vec<Conference> {
    let mut res: Vec<Conference> = order
        .iter()
        .filter(|c| present.contains(c))
        .cloned()
        .collect();
    if placement == KeylessPlacement::Append {
        let mut rest: Vec<Conference> = present
            .iter()
            .filter(|c| !order.contains(c))
            .cloned()
            .collect();
        rest.sort();
        rest.dedup();
        debug!("complete_order: appending unranked conferences {:?}", rest);
        res.extend(rest);
    }
    res
}

/// Sorts the rows of a table following a conference order.
///
/// The relative order of the rows of a conference is preserved. The rows of
/// conferences missing from the order are dropped or appended depending on
/// `placement`.
pub fn apply_order<T: Clone>(
    order: &[Conference],
    rows: &[T],
    conference_of: impl Fn(&T) -> Conference,
    placement: KeylessPlacement,
) -> Vec<T> {
    let present: Vec<Conference> = rows.iter().map(&conference_of).collect();
    let full_order = complete_order(order, &present, placement);
    let mut res: Vec<T> = Vec::with_capacity(rows.len());
    for c in full_order.iter() {
        res.extend(rows.iter().filter(|r| conference_of(*r) == *c).cloned());
    }
    res
}

/// Reorders a distribution, keeping its rows grouped.
pub fn order_distribution(
    dist: &Distribution,
    order: &[Conference],
    placement: KeylessPlacement,
) -> Distribution {
    Distribution {
        rows: apply_order(order, &dist.rows, |r| r.group.conference, placement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(c: Conference, cont: Continent, p: f64) -> DistributionRow {
        DistributionRow {
            group: GroupKey {
                conference: c,
                year: None,
            },
            continent: cont,
            percentage: p,
        }
    }

    fn sample() -> Distribution {
        Distribution {
            rows: vec![
                row(Conference::Osdi, Continent::NorthAmerica, 40.0),
                row(Conference::Osdi, Continent::Unknown, 60.0),
                row(Conference::Atc, Continent::Asia, 100.0),
                row(Conference::Atc, Continent::Unknown, 0.0),
                row(Conference::Nsdi, Continent::NorthAmerica, 70.0),
                row(Conference::Nsdi, Continent::Unknown, 30.0),
                row(Conference::Sigcomm, Continent::NorthAmerica, 40.0),
                row(Conference::Sigcomm, Continent::Unknown, 60.0),
            ],
        }
    }

    #[test]
    fn test_rank_descending_stable() {
        let order = rank(&sample(), Continent::NorthAmerica);
        assert_eq!(
            order,
            vec![Conference::Nsdi, Conference::Osdi, Conference::Sigcomm]
        );
    }

    #[test]
    fn test_rank_is_permutation_of_keyed() {
        let dist = sample();
        let mut order = rank(&dist, Continent::Unknown);
        assert_eq!(order.len(), 4);
        order.sort();
        let mut confs = dist.conferences();
        confs.sort();
        assert_eq!(order, confs);
    }

    #[test]
    fn test_rank_values_ties() {
        let order = rank_values(&[
            (Conference::Ccgrid, 1.0),
            (Conference::Asplos, 2.0),
            (Conference::Middleware, 1.0),
            (Conference::Ccgrid, 5.0),
        ]);
        assert_eq!(
            order,
            vec![Conference::Asplos, Conference::Ccgrid, Conference::Middleware]
        );
    }

    #[test]
    fn test_apply_order_append() {
        let dist = sample();
        let order = rank(&dist, Continent::NorthAmerica);
        let ordered = order_distribution(&dist, &order, KeylessPlacement::Append);
        assert_eq!(
            ordered.conferences(),
            vec![
                Conference::Nsdi,
                Conference::Osdi,
                Conference::Sigcomm,
                Conference::Atc
            ]
        );
        assert_eq!(ordered.rows.len(), dist.rows.len());
        assert_eq!(ordered.rows[0].continent, Continent::NorthAmerica);
        assert_eq!(ordered.rows[1].continent, Continent::Unknown);
    }

    #[test]
    fn test_apply_order_omit() {
        let dist = sample();
        let order = rank(&dist, Continent::NorthAmerica);
        let ordered = order_distribution(&dist, &order, KeylessPlacement::Omit);
        assert_eq!(ordered.rows.len(), 6);
        assert!(ordered
            .rows
            .iter()
            .all(|r| r.group.conference != Conference::Atc));
    }

    #[test]
    fn test_order_applied_to_other_table() {
        // An order computed on one table drives another one.
        let order = vec![Conference::Sigcomm, Conference::Nsdi];
        let other = vec![
            (Conference::Nsdi, "a"),
            (Conference::EuroPar, "b"),
            (Conference::Sigcomm, "c"),
            (Conference::Asplos, "d"),
        ];
        let res = apply_order(&order, &other, |r| r.0, KeylessPlacement::Append);
        let labels: Vec<&str> = res.iter().map(|r| r.1).collect();
        assert_eq!(labels, vec!["c", "a", "d", "b"]);
    }
}

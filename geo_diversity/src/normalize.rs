//! Recoding of the raw categorical fields into the canonical vocabulary.
//!
//! All the functions here are pure lookups in a [`Vocabulary`].

use log::debug;

use crate::config::*;

/// Maps a raw conference name to its canonical identifier.
///
/// The lookup ignores case and surrounding whitespace, and is otherwise exact.
/// Names that are not in the alias table return `None`: the corresponding
/// rows are dropped from all the aggregates.
///
/// ```
/// use geo_diversity::*;
///
/// let vocab = Vocabulary::standard();
/// assert_eq!(normalize_conference(&vocab, "Cloud"), Some(Conference::Socc));
/// assert_eq!(normalize_conference(&vocab, "socc"), Some(Conference::Socc));
/// assert_eq!(normalize_conference(&vocab, "IEEEcloud"), Some(Conference::IeeeCloud));
/// assert_eq!(normalize_conference(&vocab, "vldb"), None);
/// ```
pub fn normalize_conference(vocab: &Vocabulary, raw: &str) -> Option<Conference> {
    let key = raw.trim().to_lowercase();
    let res = vocab.conference_aliases.get(&key).cloned();
    if res.is_none() {
        debug!("normalize_conference: unrecognized conference {:?}", raw);
    }
    res
}

/// Maps a raw continent code to its category.
///
/// `NA`, `EU` and `AS` are kept, `SA`, `OC` and `AF` are grouped as `Others`.
/// Anything else, including a missing or empty value, is `Unknown`.
/// When several codes are joined with `;` (committee members with multiple
/// affiliations), the first one is used. The committee tables list these
/// codes in alphabetical order, so a member of `EU;NA` counts for Europe and
/// one of `AS;NA` for Asia: such a member never counts for North America.
///
/// ```
/// use geo_diversity::*;
///
/// let vocab = Vocabulary::standard();
/// assert_eq!(normalize_continent(&vocab, Some("OC")), Continent::Others);
/// assert_eq!(normalize_continent(&vocab, Some("na")), Continent::NorthAmerica);
/// assert_eq!(normalize_continent(&vocab, Some("")), Continent::Unknown);
/// assert_eq!(normalize_continent(&vocab, None), Continent::Unknown);
/// assert_eq!(normalize_continent(&vocab, Some("AS;NA")), Continent::Asia);
/// ```
pub fn normalize_continent(vocab: &Vocabulary, raw: Option<&str>) -> Continent {
    let first_code = raw.and_then(|s| s.split(';').map(|c| c.trim()).find(|c| !c.is_empty()));
    match first_code {
        Some(code) => vocab
            .continent_groups
            .get(&code.to_uppercase())
            .cloned()
            .unwrap_or(Continent::Unknown),
        None => Continent::Unknown,
    }
}

/// Maps a continent label to the comparison categories.
///
/// The label can be a code (`NA`, `EU`, `AS`) or a full name
/// (`North America`, `Europe`, `Asia`). Everything else falls into `Other`,
/// unknown locations included.
pub fn normalize_comparison_continent(raw: &str) -> ComparisonContinent {
    match raw.trim().to_lowercase().as_str() {
        "na" | "north america" | "northamerica" => ComparisonContinent::NorthAmerica,
        "eu" | "europe" => ComparisonContinent::Europe,
        "as" | "asia" => ComparisonContinent::Asia,
        _ => ComparisonContinent::Other,
    }
}

/// Turns a raw row into a record, or drops it if the conference is unknown.
pub fn normalize_record(vocab: &Vocabulary, kind: RecordKind, raw: &RawRecord) -> Option<Record> {
    let conference = normalize_conference(vocab, &raw.conference)?;
    let continent = normalize_continent(vocab, raw.continent_code.as_deref());
    Some(Record {
        kind,
        conference,
        year: raw.year,
        continent,
        count_weight: raw.count_weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conference_aliases() {
        let vocab = Vocabulary::standard();
        assert_eq!(normalize_conference(&vocab, "NSDI"), Some(Conference::Nsdi));
        assert_eq!(normalize_conference(&vocab, " nsdi "), Some(Conference::Nsdi));
        assert_eq!(normalize_conference(&vocab, "Cloud"), Some(Conference::Socc));
        assert_eq!(normalize_conference(&vocab, "socc"), Some(Conference::Socc));
        assert_eq!(normalize_conference(&vocab, "europar"), Some(Conference::EuroPar));
        assert_eq!(normalize_conference(&vocab, "Euro-Par"), Some(Conference::EuroPar));
        assert_eq!(normalize_conference(&vocab, "IEEE Cloud"), Some(Conference::IeeeCloud));
    }

    #[test]
    fn test_conference_no_fuzzy_match() {
        let vocab = Vocabulary::standard();
        assert_eq!(normalize_conference(&vocab, "nsdi2020"), None);
        assert_eq!(normalize_conference(&vocab, "usenix atc"), None);
        assert_eq!(normalize_conference(&vocab, ""), None);
    }

    #[test]
    fn test_extra_alias() {
        let vocab = Vocabulary::standard()
            .with_alias("USENIX ATC", "ATC")
            .unwrap();
        assert_eq!(normalize_conference(&vocab, "usenix atc"), Some(Conference::Atc));
        let err = Vocabulary::standard().with_alias("vldb", "VLDB");
        assert_eq!(err, Err(GeoErrors::UnknownConference("VLDB".to_string())));
        assert_eq!(
            Vocabulary::standard().with_alias("  ", "ATC"),
            Err(GeoErrors::EmptyAlias)
        );
    }

    #[test]
    fn test_continent_codes() {
        let vocab = Vocabulary::standard();
        assert_eq!(normalize_continent(&vocab, Some("NA")), Continent::NorthAmerica);
        assert_eq!(normalize_continent(&vocab, Some("EU")), Continent::Europe);
        assert_eq!(normalize_continent(&vocab, Some("AS")), Continent::Asia);
        for code in ["SA", "OC", "AF"] {
            assert_eq!(normalize_continent(&vocab, Some(code)), Continent::Others);
        }
        assert_eq!(normalize_continent(&vocab, Some("AN")), Continent::Unknown);
        assert_eq!(normalize_continent(&vocab, Some("Unknown")), Continent::Unknown);
        assert_eq!(normalize_continent(&vocab, Some("  ")), Continent::Unknown);
    }

    #[test]
    fn test_continent_multiple_codes() {
        let vocab = Vocabulary::standard();
        assert_eq!(normalize_continent(&vocab, Some("EU;NA")), Continent::Europe);
        assert_eq!(normalize_continent(&vocab, Some(";AS")), Continent::Asia);
    }

    #[test]
    fn test_sorted_codes_never_pick_north_america() {
        let vocab = Vocabulary::standard();
        for joined in ["AS;NA", "EU;NA", "AS;EU;NA", "AF;NA"] {
            assert_ne!(
                normalize_continent(&vocab, Some(joined)),
                Continent::NorthAmerica,
                "{}",
                joined
            );
        }
        assert_eq!(normalize_continent(&vocab, Some("NA;OC")), Continent::NorthAmerica);
    }

    #[test]
    fn test_comparison_labels() {
        assert_eq!(
            normalize_comparison_continent("North America"),
            ComparisonContinent::NorthAmerica
        );
        assert_eq!(normalize_comparison_continent("NA"), ComparisonContinent::NorthAmerica);
        assert_eq!(normalize_comparison_continent("europe"), ComparisonContinent::Europe);
        assert_eq!(normalize_comparison_continent("AS"), ComparisonContinent::Asia);
        assert_eq!(normalize_comparison_continent("Oceania"), ComparisonContinent::Other);
        assert_eq!(normalize_comparison_continent("Unknown"), ComparisonContinent::Other);
        assert_eq!(normalize_comparison_continent(""), ComparisonContinent::Other);
    }

    #[test]
    fn test_comparison_from_continent() {
        assert_eq!(
            ComparisonContinent::from(Continent::Others),
            ComparisonContinent::Other
        );
        assert_eq!(
            ComparisonContinent::from(Continent::Unknown),
            ComparisonContinent::Other
        );
        assert_eq!(
            ComparisonContinent::from(Continent::Asia),
            ComparisonContinent::Asia
        );
    }

    #[test]
    fn test_record_dropped() {
        let vocab = Vocabulary::standard();
        let raw = RawRecord::new("vldb", Some(2020), Some("NA"));
        assert_eq!(normalize_record(&vocab, RecordKind::Accepted, &raw), None);
        let raw = RawRecord::new("osdi", Some(2020), Some("SA"));
        let rec = normalize_record(&vocab, RecordKind::Committee, &raw).unwrap();
        assert_eq!(rec.conference, Conference::Osdi);
        assert_eq!(rec.continent, Continent::Others);
        assert_eq!(rec.kind, RecordKind::Committee);
    }
}

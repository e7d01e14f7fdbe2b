pub use crate::config::*;
use crate::normalize::normalize_record;

use log::debug;

/// A builder for collecting the records of one dataset.
///
/// Rows are normalized as they are added. Rows of an unknown conference are
/// counted and dropped.
///
/// ```
/// pub use geo_diversity::builder::Builder;
/// pub use geo_diversity::{RecordKind, Vocabulary};
///
/// let vocab = Vocabulary::standard();
/// let mut builder = Builder::new(&vocab, RecordKind::Accepted);
///
/// builder.add_row("nsdi", Some(2020), Some("NA"));
/// builder.add_row("vldb", Some(2020), Some("EU"));
///
/// assert_eq!(builder.records().len(), 1);
/// assert_eq!(builder.dropped(), 1);
/// ```
pub struct Builder {
    pub(crate) _vocab: Vocabulary,
    pub(crate) _kind: RecordKind,
    pub(crate) _records: Vec<Record>,
    pub(crate) _dropped: usize,
}

impl Builder {
    pub fn new(vocab: &Vocabulary, kind: RecordKind) -> Builder {
        Builder {
            _vocab: vocab.clone(),
            _kind: kind,
            _records: Vec::new(),
            _dropped: 0,
        }
    }

    /// Adds an observation with a weight of 1.
    pub fn add_row(&mut self, conference: &str, year: Option<i32>, continent_code: Option<&str>) {
        self.add_raw(&RawRecord::new(conference, year, continent_code))
    }

    /// Adds a row that already stands for `count` observations.
    pub fn add_weighted_row(&mut self, conference: &str, continent_code: Option<&str>, count: f64) {
        self.add_raw(&RawRecord {
            conference: conference.to_string(),
            year: None,
            continent_code: continent_code.map(|s| s.to_string()),
            count_weight: count,
        })
    }

    pub fn add_raw(&mut self, raw: &RawRecord) {
        match normalize_record(&self._vocab, self._kind, raw) {
            Some(rec) => self._records.push(rec),
            None => {
                debug!(
                    "Builder: {}: dropping row of unknown conference {:?}",
                    self._kind.name(),
                    raw.conference
                );
                self._dropped += 1;
            }
        }
    }

    pub fn records(&self) -> &[Record] {
        &self._records
    }

    /// Number of rows dropped because of an unrecognized conference.
    pub fn dropped(&self) -> usize {
        self._dropped
    }

    pub fn build(self) -> Vec<Record> {
        self._records
    }
}

use std::collections::BTreeMap;

use tracing::info;

use crate::models::{SpeakerRecord, UppercaseOnly};

/// Records uppercased by the pre-step that have not been corrected further
///
/// Keyed by position in the speaker collection; the value is the name as it
/// was before uppercasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUppercase {
    originals: BTreeMap<usize, String>,
}

impl PendingUppercase {
    /// Drop a record that received a real correction, returning its original name
    pub fn resolve(&mut self, position: usize) -> Option<String> {
        self.originals.remove(&position)
    }

    /// Report the records that stayed merely uppercased
    pub fn into_leftovers(self, records: &[SpeakerRecord]) -> Vec<UppercaseOnly> {
        self.originals
            .into_iter()
            .filter_map(|(position, original)| {
                let uppercased = records.get(position)?.name()?.to_string();
                Some(UppercaseOnly {
                    position,
                    original,
                    uppercased,
                })
            })
            .collect()
    }
}

/// Uppercase every speaker name before resolution
///
/// Must run over the whole collection before any record is resolved.
pub fn uppercase_names(records: &mut [SpeakerRecord]) -> PendingUppercase {
    let mut pending = PendingUppercase::default();

    for (position, record) in records.iter_mut().enumerate() {
        let Some(name) = record.name() else {
            continue;
        };
        let upper = name.to_uppercase();
        if upper != name {
            pending.originals.insert(position, name.to_string());
            record.set_name(upper);
        }
    }

    info!(
        "Uppercase pre-step: {} speaker names uppercased",
        pending.originals.len()
    );
    pending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase_names_tracks_changed_records() {
        let mut records = vec![
            SpeakerRecord::new("jon", None),
            SpeakerRecord::new("ANE", None),
            SpeakerRecord::default(),
            SpeakerRecord::new("María", None),
        ];

        let pending = uppercase_names(&mut records);

        let originals: Vec<(usize, &str)> = pending
            .originals
            .iter()
            .map(|(position, name)| (*position, name.as_str()))
            .collect();
        assert_eq!(originals, vec![(0, "jon"), (3, "María")]);
        assert_eq!(records[0].name(), Some("JON"));
        assert_eq!(records[3].name(), Some("MARÍA"));
        assert!(!records[1].is_modified());
    }

    #[test]
    fn test_leftovers_exclude_resolved_records() {
        let mut records = vec![
            SpeakerRecord::new("jon", None),
            SpeakerRecord::new("guest", None),
        ];
        let mut pending = uppercase_names(&mut records);

        assert_eq!(pending.resolve(0).as_deref(), Some("jon"));
        assert_eq!(pending.resolve(0), None);

        let leftovers = pending.into_leftovers(&records);
        assert_eq!(
            leftovers,
            vec![UppercaseOnly {
                position: 1,
                original: "guest".to_string(),
                uppercased: "GUEST".to_string(),
            }]
        );
    }
}

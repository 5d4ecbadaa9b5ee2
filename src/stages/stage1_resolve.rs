use tracing::debug;

use crate::models::{
    normalize_key, AccentFill, Decision, MatchKind, Rename, RosterIndex, SpeakerRecord,
};

/// Decide how a single speaker record should change
///
/// Precedence:
/// 1. Direct alias match: the record takes the roster's canonical spelling.
/// 2. Canonical-form match: a record already carrying the canonical name is
///    kept as is; one carrying it in a different case is rewritten to the
///    uppercased canonical form.
/// 3. No match: nothing changes.
///
/// An existing non-empty accent is never replaced.
pub fn resolve(record: &SpeakerRecord, index: &RosterIndex) -> Decision {
    let Some(name) = record.name() else {
        return Decision::no_match();
    };

    let Some((kind, entry)) = index.lookup(name) else {
        debug!("No roster entry for speaker '{}'", name);
        return Decision::no_match();
    };

    let target = match kind {
        MatchKind::Alias => entry.canonical_name.clone(),
        MatchKind::Canonical if name.trim() == entry.canonical_name => {
            entry.canonical_name.clone()
        }
        MatchKind::Canonical => normalize_key(&entry.canonical_name),
    };

    let rename = (target != name).then(|| Rename {
        old: name.to_string(),
        new: target.clone(),
    });

    let accent_fill = (record.accent().trim().is_empty() && !entry.accent.trim().is_empty())
        .then(|| AccentFill {
            owner: target.clone(),
            value: entry.accent.clone(),
        });

    debug!(
        "Speaker '{}' matched {:?} entry '{}' (rename: {}, accent: {})",
        name,
        kind,
        entry.canonical_name,
        rename.is_some(),
        accent_fill.is_some()
    );

    Decision {
        matched: Some(kind),
        rename,
        accent_fill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RosterRow;

    fn index(rows: &[(&str, &str, &str)]) -> RosterIndex {
        RosterIndex::build(
            rows.iter()
                .map(|(raw, canonical, accent)| RosterRow::new(raw, *canonical, *accent)),
        )
    }

    #[test]
    fn test_alias_match_renames_and_fills_accent() {
        let index = index(&[("jon", "Jon Smith", "eastern")]);
        let record = SpeakerRecord::new("JON", Some(""));

        let decision = resolve(&record, &index);

        assert_eq!(decision.matched, Some(MatchKind::Alias));
        assert_eq!(
            decision.rename,
            Some(Rename {
                old: "JON".to_string(),
                new: "Jon Smith".to_string()
            })
        );
        assert_eq!(
            decision.accent_fill,
            Some(AccentFill {
                owner: "Jon Smith".to_string(),
                value: "eastern".to_string()
            })
        );
    }

    #[test]
    fn test_case_variants_resolve_identically() {
        let index = index(&[("Maria", "María López", "northern")]);
        let lower = resolve(&SpeakerRecord::new("maria", None), &index);
        let upper = resolve(&SpeakerRecord::new("MARIA", None), &index);

        assert_eq!(lower.matched, upper.matched);
        assert_eq!(
            lower.rename.map(|r| r.new),
            upper.rename.map(|r| r.new)
        );
        assert_eq!(lower.accent_fill, upper.accent_fill);
    }

    #[test]
    fn test_exact_canonical_name_is_kept() {
        let index = index(&[("ane", "Ane Garcia", "")]);
        let record = SpeakerRecord::new("Ane Garcia", Some("western"));

        let decision = resolve(&record, &index);

        assert_eq!(decision.matched, Some(MatchKind::Canonical));
        assert!(decision.is_noop());
    }

    #[test]
    fn test_canonical_in_wrong_case_is_uppercased() {
        let index = index(&[("ane", "Ane Garcia", "western")]);
        let record = SpeakerRecord::new("ane garcia", None);

        let decision = resolve(&record, &index);

        assert_eq!(decision.matched, Some(MatchKind::Canonical));
        assert_eq!(decision.rename.unwrap().new, "ANE GARCIA");
        assert_eq!(decision.accent_fill.unwrap().owner, "ANE GARCIA");
    }

    #[test]
    fn test_uppercased_canonical_is_stable() {
        let index = index(&[("ane", "Ane Garcia", "")]);
        let decision = resolve(&SpeakerRecord::new("ANE GARCIA", None), &index);
        assert!(decision.rename.is_none());
    }

    #[test]
    fn test_alias_wins_over_canonical() {
        // "Jon Smith" is an alias for one speaker and the canonical name of another
        let index = index(&[("jon", "Jon Smith", ""), ("jon smith", "Jonathan Smith", "")]);
        let decision = resolve(&SpeakerRecord::new("jon smith", None), &index);

        assert_eq!(decision.matched, Some(MatchKind::Alias));
        assert_eq!(decision.rename.unwrap().new, "Jonathan Smith");
    }

    #[test]
    fn test_existing_accent_is_never_overwritten() {
        let index = index(&[("jon", "Jon Smith", "eastern")]);
        let record = SpeakerRecord::new("jon", Some("southern"));

        let decision = resolve(&record, &index);

        assert!(decision.rename.is_some());
        assert!(decision.accent_fill.is_none());
    }

    #[test]
    fn test_blank_accent_counts_as_missing() {
        let index = index(&[("jon", "Jon Smith", "eastern")]);
        let decision = resolve(&SpeakerRecord::new("Jon Smith", Some("  ")), &index);

        assert!(decision.rename.is_none());
        assert_eq!(decision.accent_fill.unwrap().value, "eastern");
    }

    #[test]
    fn test_blank_roster_accent_fills_nothing() {
        let index = index(&[("jon", "Jon Smith", "")]);
        let decision = resolve(&SpeakerRecord::new("jon", None), &index);
        assert!(decision.accent_fill.is_none());
    }

    #[test]
    fn test_untrimmed_alias_is_rewritten() {
        let index = index(&[("jon", "Jon Smith", "")]);
        let decision = resolve(&SpeakerRecord::new(" Jon Smith ", None), &index);
        assert_eq!(decision.matched, Some(MatchKind::Canonical));
        assert_eq!(decision.rename.unwrap().new, "Jon Smith");
    }

    #[test]
    fn test_no_match_and_missing_name() {
        let index = index(&[("jon", "Jon Smith", "eastern")]);

        let unknown = resolve(&SpeakerRecord::new("Someone Else", None), &index);
        assert_eq!(unknown, Decision::no_match());

        let nameless = SpeakerRecord::from_attributes(vec![("id".to_string(), "spk1".to_string())]);
        assert_eq!(resolve(&nameless, &index), Decision::no_match());
    }
}

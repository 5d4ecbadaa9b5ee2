use tracing::info;

use super::stage0_uppercase::{uppercase_names, PendingUppercase};
use super::stage1_resolve::resolve;
use crate::models::{AccentChange, ChangeCounts, ChangeLog, NameChange, RosterIndex, SpeakerRecord};

/// Configuration for the reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct ReconcileConfig {
    /// Uppercase every name before resolving, and report names that stayed
    /// merely uppercased as their own category
    pub uppercase_first: bool,
}

/// Result of the reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct ReconcileResult {
    pub counts: ChangeCounts,
    pub log: ChangeLog,
}

/// Execute the reconciliation pass over the whole speaker collection
///
/// Records are visited in document order so the change log is reproducible.
/// Each record is resolved independently; the only shared state is the set of
/// records touched by the optional uppercase pre-step.
pub fn execute_reconcile(
    records: &mut [SpeakerRecord],
    index: &RosterIndex,
    config: &ReconcileConfig,
) -> ReconcileResult {
    let mut pending = if config.uppercase_first {
        uppercase_names(records)
    } else {
        PendingUppercase::default()
    };

    let mut result = reconcile_records(records, index, &mut pending);

    result.log.uppercased_only = pending.into_leftovers(records);
    result.counts.uppercased_only = result.log.uppercased_only.len();

    info!(
        "Reconciled {} speakers: {} names changed, {} accents filled, {} uppercased only",
        records.len(),
        result.counts.names_changed,
        result.counts.accents_changed,
        result.counts.uppercased_only
    );

    result
}

/// Resolve and apply every record, clearing corrected records from `pending`
pub fn reconcile_records(
    records: &mut [SpeakerRecord],
    index: &RosterIndex,
    pending: &mut PendingUppercase,
) -> ReconcileResult {
    let mut result = ReconcileResult::default();

    for (position, record) in records.iter_mut().enumerate() {
        let decision = resolve(record, index);

        // Any correction, rename or accent, takes the record out of the
        // uppercased-only category
        let original = if decision.is_noop() {
            None
        } else {
            pending.resolve(position)
        };

        if let Some(rename) = decision.rename {
            let old = original.unwrap_or(rename.old);
            record.set_name(rename.new.clone());
            result.log.names.push(NameChange {
                position,
                old,
                new: rename.new,
            });
            result.counts.names_changed += 1;
        }

        if let Some(fill) = decision.accent_fill {
            record.set_accent(fill.value.clone());
            result.log.accents.push(AccentChange {
                position,
                speaker: fill.owner,
                accent: fill.value,
            });
            result.counts.accents_changed += 1;
        }
    }

    result
}

pub mod error;
pub mod io;
pub mod models;
pub mod stages;

pub use error::{ReconcileError, Result};
pub use io::{parse_roster, read_roster_file, ChangeReport, RosterConfig, TrsDocument};
pub use models::{
    ChangeCounts, ChangeLog, Decision, MatchKind, RosterEntry, RosterIndex, RosterRow,
    SpeakerRecord,
};
pub use stages::{
    execute_reconcile, execute_render, output_path, resolve, uppercase_names, ReconcileConfig,
    ReconcileResult, RenderConfig,
};

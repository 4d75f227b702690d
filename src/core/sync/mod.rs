//! Resource table store and the table synchronizer.

mod store;
mod synchronizer;

pub use store::{ResourceStore, TableFile};
pub use synchronizer::{
    ChangeKind, FileChange, SyncOutcome, TranslationMap, fill, group_by_namespace, reconcile,
};

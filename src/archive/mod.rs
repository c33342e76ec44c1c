pub mod experiment;
pub mod ledger;
pub mod link;
pub mod logbook;
pub mod params;
pub mod paths;
pub mod util;

/// What to do when a barcode's destination link or ledger row already
/// exists from a previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Abort the whole run.
    Fail,
    /// Leave the existing link and ledger row untouched, warn, move on.
    Skip,
    /// Replace the existing link and ledger row.
    Overwrite,
}

//! Run-scoped record of errors and warnings.

mod ledger;

pub use ledger::ValidationLedger;

//! Character-creation wizard: point budget, selections and draw pools.

pub mod draw;
pub mod ledger;
pub mod selection;
pub mod session;
pub mod types;

pub use draw::{DrawPoolKind, DrawPoolState, DrawRecord};
pub use ledger::{BudgetLedger, BudgetState, LedgerCategory};
pub use selection::{SelectedEntry, Selection, SelectionOrigin};
pub use session::{BuildSession, FinalizeRejected};
pub use types::{sanitize_name, validate_name, Background, BuildId, CharacterBuild};

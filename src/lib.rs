pub mod csv;
pub mod ledger;
pub mod model;
pub mod rates;
pub mod store;

pub use ledger::{Ledger, LedgerError, Mode, Recorded, ReferralOutcome, ValidationError};
pub use model::{ActionType, CreditEvent, EventId, RecordRequest, UserId};
pub use rates::RateTable;
pub use store::{EventStore, MemoryStore};

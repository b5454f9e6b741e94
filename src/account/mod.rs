// Money handling: amount validation and the operations engine.

pub mod amount;
pub mod operations;

pub use amount::{format_amount, normalize, parse_amount, AmountError};
pub use operations::{Bank, OperationError, Receipt, TransferReceipt};

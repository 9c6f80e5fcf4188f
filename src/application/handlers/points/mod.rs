//! Points handlers - balance reads, ledger history, and spending.

mod get_balance;
mod list_transactions;
mod spend_points;

pub use get_balance::{BalanceView, GetBalanceHandler, GetBalanceQuery};
pub use list_transactions::{ListTransactionsHandler, ListTransactionsQuery};
pub use spend_points::{SpendPointsCommand, SpendPointsHandler};

pub mod alert;
pub mod coin;
pub mod user;

pub use alert::{Alert, AlertSet, Direction, FiredAlert};
pub use coin::CoinTable;
pub use user::{AllowList, Sender};

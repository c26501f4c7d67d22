pub mod calculations;
pub mod models;
pub mod session;
pub mod store;

pub use calculations::{PremiumCalculator, PremiumResult, ProgressModel};
pub use models::*;
pub use session::{QuoteSession, SessionError};
pub use store::{KeyValueStore, StoreError};

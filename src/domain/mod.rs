pub mod account;
pub mod listing;
pub mod payment;

pub use account::*;
pub use listing::*;
pub use payment::*;

pub mod config;
pub mod razorpay;
pub mod repository;

pub use config::*;
pub use razorpay::*;
pub use repository::*;

pub mod dispatch;
pub mod env;
pub mod fetch;
pub mod resolve;
pub mod strategies;

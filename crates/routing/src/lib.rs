pub mod dispatch;
pub mod protocol;
pub mod service;

pub use dispatch::*;
pub use protocol::*;
pub use service::*;

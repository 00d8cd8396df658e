mod membership;
mod message;
mod operation;
mod operation_log;

pub use membership::*;
pub use message::*;
pub use operation::*;
pub use operation_log::*;

pub extern crate serde;
pub extern crate serde_json;

pub use self::{call::*, context::*};

pub mod call;
pub mod context;

mod identity;

pub use identity::{SessionIdentity, Visitor};

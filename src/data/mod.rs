use std::fmt;

mod review;
mod user;

pub use review::*;
pub use user::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserID(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewID(pub String);

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

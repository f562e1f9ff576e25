mod question;

pub use question::*;

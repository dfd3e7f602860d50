mod nature;
mod stat;
mod usage;

#[cfg(test)]
pub mod test_util;

pub use nature::*;
pub use stat::*;
pub use usage::*;

pub mod map;
pub mod page;
pub mod reports;
pub mod submissions;

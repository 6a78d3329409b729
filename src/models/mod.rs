pub mod cache;
pub mod driver;
pub mod ergast;
pub mod error;
pub mod openf1;
pub mod race;
pub mod session;
pub mod standings;
pub mod statistics;

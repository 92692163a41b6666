pub mod identity;
pub mod jwt;
pub mod lookup;
pub mod ownership;
pub mod tags;

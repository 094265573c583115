//! `SeaORM` entity definitions.

pub mod accounts;
pub mod cars;
pub mod people;

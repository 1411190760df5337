//! Request handlers, one module per resource.

pub mod account;
pub mod health;
pub mod history;
pub mod schedules;
pub mod vaccinations;

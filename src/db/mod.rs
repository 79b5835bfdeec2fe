pub mod admins;
pub mod plans;
pub mod subscriptions;
pub mod transactions;
pub mod users;

pub mod pagination;
pub mod plans;
pub mod portfolio;
pub mod subscriptions;
pub mod transactions;
pub mod users;

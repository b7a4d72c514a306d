pub mod auth;
pub mod completed_exercises;
pub mod completed_programs;
pub mod exercises;
pub mod planned_programs;
pub mod programs;
pub mod reference;
pub mod user_subscriptions;

pub mod admin_access;
pub mod contact;
pub mod dashboard;
pub mod health;

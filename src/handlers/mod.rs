// Handlers module
pub mod health;

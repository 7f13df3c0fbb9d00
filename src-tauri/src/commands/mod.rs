pub mod config;
pub mod evaluators;
pub mod health;
pub mod keychain;
pub mod profile;
pub mod run;
pub mod schema;
pub mod testsets;
pub mod variants;

//! Schema-driven parameter pipeline behind the playground: parse a variant's
//! OpenAPI schema, wrap values for editing, pick controls, run variants and
//! keep the variant list.

pub mod controls;
pub mod enhanced;
pub mod parameter;
pub mod run;
pub mod variants;

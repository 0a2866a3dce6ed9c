//! Business-objects model framework.
//!
//! Models are declared with a [`schema::ModelSchema`] (properties, validation
//! rules, access rules), implemented once through the generic containers in
//! [`model`], and exposed to the API layer as a [`factory::ModelFactory`].

pub mod authorization;
pub mod context;
pub mod error;
pub mod factory;
pub mod methods;
pub mod model;
pub mod rules;
pub mod schema;
pub mod types;

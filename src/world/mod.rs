pub mod authority;
pub mod component;
pub mod component_map;
pub mod dispatcher;
pub mod error;
pub mod op;

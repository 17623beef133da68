// Engine modules: input routing and resource lookup

pub mod input;
pub mod resources;

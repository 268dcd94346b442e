pub mod assets;
pub mod extract;
pub mod fetch;

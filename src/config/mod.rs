//! Declarative ammo documents and their conversion to and from the model.
mod convert;
mod hcl_surface;
mod loader;
pub mod types;


pub use convert::{from_model, to_model};
pub use hcl_surface::render_hcl;
pub use loader::{load_document, load_model, render_toml};
pub use types::{
    AmmoDocument, PostprocessorBlock, RequestBlock, ScenarioBlock, SourceBlock, TemplaterField,
};

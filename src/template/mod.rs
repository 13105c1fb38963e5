//! Module registry and template weaving
//!
//! The registry owns parsed modules and hands out shared read-only handles.
//! The weaver consumes them to splice module code into shader templates.
//!
//! # Example
//!
//! ```text
//! #MODULES
//! Rim
//! #END
//!
//! struct Input
//! {
//!     [[MODULE:INPUT]]
//! };
//!
//! void vert(inout appdata v)
//! {
//!     [[MODULE:VERTEX:Rim:main(v.vertex.xyz)]]
//! }
//! ```

mod registry;
mod weaver;

pub use registry::{ModuleRegistry, RegistryError};
pub use weaver::{weave, ModuleTag, WeaveWarning, WovenTemplate};

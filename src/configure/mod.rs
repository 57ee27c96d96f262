//! Side-panel configuration for the selected block.
//!
//! A block's [`FormKind`] follows from its typed category. Agent forms also
//! produce a [`DeploymentDescriptor`], a pure function of the form values and
//! the block id.

pub mod descriptor;
pub mod schema;
pub mod session;
pub mod values;

pub use descriptor::*;
pub use schema::*;
pub use session::*;
pub use values::*;

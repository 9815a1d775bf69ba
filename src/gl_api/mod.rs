#[macro_use]
pub mod error;

pub mod context;
pub mod driver;
pub mod shader;

#[cfg(test)]
pub(crate) mod testing;

pub use self::{
    context::Context,
    driver::{Driver, GlDriver},
    error::{GlError, GlResult},
};

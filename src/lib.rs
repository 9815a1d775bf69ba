//! Shader program management on top of the `gl` crate.
//!
//! A [`ShaderProgram`] owns a program object and the stage objects that are attached to it until
//! the program is linked. Stages are read from files or strings, compiled and attached one at a
//! time; [`ShaderProgram::link`] links them and releases the stage objects.

#[macro_use]
pub mod gl_api;
pub mod config;
#[cfg(feature = "window")]
pub mod window;

pub use crate::{
    config::{ErrorPolicy, ProgramConfig},
    gl_api::{
        shader::{
            report_link_diagnostics, report_stage_diagnostics, LinkState, ProgramError,
            ShaderProgram, Stage, StageKind, Uniform, UniformLocation, UniformValue,
        },
        Context, Driver, GlDriver, GlError,
    },
};

use std::{fmt, io, path::PathBuf, sync::Arc};

use crate::gl_api::error::GlError;

pub mod program;
pub mod stage;
pub mod uniform;

pub use self::{program::*, stage::*, uniform::*};

/// Label that tags link and validation diagnostics, as opposed to a stage label.
pub const PROGRAM_LABEL: &str = "PROGRAM";

#[derive(Clone, Debug)]
pub enum ProgramError {
    /// The source file for a stage could not be read.
    SourceRead {
        stage: StageKind,
        path: PathBuf,
        source: Arc<io::Error>,
    },
    CompileFailed {
        stage: StageKind,
        log: String,
    },
    LinkFailed {
        log: String,
    },
    ValidateFailed {
        log: String,
    },
    /// A raw stage enum outside of the six known stage kinds.
    InvalidStageKind(u32),
    /// Stages can only be added before the program is linked.
    AlreadyLinked,
    ProgramCreation,
    /// The driver refused to create a shader object for `stage`. `gl` holds the driver error, if
    /// it raised one rather than returning a null handle.
    StageCreation {
        stage: StageKind,
        gl: Option<GlError>,
    },
    Gl(GlError),
}

impl ProgramError {
    /// The stage label, or [`PROGRAM_LABEL`] for anything concerning the program object itself.
    pub fn label(&self) -> &'static str {
        match self {
            ProgramError::SourceRead { stage, .. }
            | ProgramError::CompileFailed { stage, .. }
            | ProgramError::StageCreation { stage, .. } => stage.label(),
            _ => PROGRAM_LABEL,
        }
    }

    pub fn stage(&self) -> Option<StageKind> {
        match *self {
            ProgramError::SourceRead { stage, .. }
            | ProgramError::CompileFailed { stage, .. }
            | ProgramError::StageCreation { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProgramError::SourceRead { stage, path, source } => write!(
                f,
                "{} shader file not read from `{}`: {}",
                stage.label(),
                path.display(),
                source
            ),
            ProgramError::CompileFailed { stage, log } => {
                write!(f, "shader compilation failed for {} stage:\n{}", stage.label(), log)
            }
            ProgramError::LinkFailed { log } => {
                write!(f, "program linking failed ({}):\n{}", PROGRAM_LABEL, log)
            }
            ProgramError::ValidateFailed { log } => {
                write!(f, "program validation failed ({}):\n{}", PROGRAM_LABEL, log)
            }
            ProgramError::InvalidStageKind(raw) => {
                write!(f, "0x{:X} is not a valid shader stage", raw)
            }
            ProgramError::AlreadyLinked => write!(f, "stages cannot be added to a linked program"),
            ProgramError::ProgramCreation => write!(f, "the driver returned a null program"),
            ProgramError::StageCreation { stage, gl: None } => {
                write!(f, "the driver returned a null {} shader", stage.label())
            }
            ProgramError::StageCreation {
                stage,
                gl: Some(err),
            } => write!(f, "could not create {} shader: {}", stage.label(), err),
            ProgramError::Gl(err) => write!(f, "driver error: {}", err),
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::SourceRead { source, .. } => Some(&**source),
            ProgramError::Gl(err)
            | ProgramError::StageCreation {
                gl: Some(err), ..
            } => Some(err),
            _ => None,
        }
    }
}

impl From<GlError> for ProgramError {
    fn from(err: GlError) -> Self {
        ProgramError::Gl(err)
    }
}

use crate::gl_api::{context::Context, shader::ProgramError};
use gl::types::*;
use std::fmt;

#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum StageKind {
    Vertex = gl::VERTEX_SHADER,
    Fragment = gl::FRAGMENT_SHADER,
    TessControl = gl::TESS_CONTROL_SHADER,
    TessEval = gl::TESS_EVALUATION_SHADER,
    Geometry = gl::GEOMETRY_SHADER,
    Compute = gl::COMPUTE_SHADER,
}

impl StageKind {
    pub const ALL: [StageKind; 6] = [
        StageKind::Vertex,
        StageKind::Fragment,
        StageKind::TessControl,
        StageKind::TessEval,
        StageKind::Geometry,
        StageKind::Compute,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StageKind::Vertex => "VERTEX",
            StageKind::Fragment => "FRAGMENT",
            StageKind::TessControl => "TESS_CONTROL",
            StageKind::TessEval => "TESS_EVAL",
            StageKind::Geometry => "GEOMETRY",
            StageKind::Compute => "COMPUTE",
        }
    }

    pub fn from_gl_enum(raw: GLenum) -> Option<Self> {
        StageKind::ALL.iter().copied().find(|&kind| kind as GLenum == raw)
    }
}

impl TryFrom<GLenum> for StageKind {
    type Error = ProgramError;

    fn try_from(raw: GLenum) -> Result<Self, Self::Error> {
        StageKind::from_gl_enum(raw).ok_or(ProgramError::InvalidStageKind(raw))
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single shader object. The object is deleted when this is dropped.
pub struct Stage {
    ctx: Context,
    pub(crate) id: GLuint,
    kind: StageKind,
}

impl Stage {
    pub fn new(ctx: &Context, kind: StageKind) -> Result<Self, ProgramError> {
        let created = ctx.driver().create_shader(kind).map_err(|err| {
            log::error!("glCreateShader failed for {} stage with {:?}", kind, err);
            ProgramError::StageCreation {
                stage: kind,
                gl: Some(err),
            }
        })?;

        match created {
            0 => Err(ProgramError::StageCreation {
                stage: kind,
                gl: None,
            }),
            id => Ok(Stage {
                ctx: ctx.clone(),
                id,
                kind,
            }),
        }
    }

    pub fn source(&self, source: &str) {
        self.ctx.driver().shader_source(self.id, source);
    }

    pub fn compile(&self) -> Result<(), ProgramError> {
        self.ctx.driver().compile_shader(self.id);
        report_stage_diagnostics(self)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Stage")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.ctx.driver().delete_shader(self.id);
    }
}

/// Checks the compile status of `stage`, logging and returning the driver's info log when
/// compilation failed.
pub fn report_stage_diagnostics(stage: &Stage) -> Result<(), ProgramError> {
    let driver = stage.ctx.driver();
    if driver.compile_status(stage.id) {
        return Ok(());
    }

    let log = driver.shader_info_log(stage.id);
    log::error!(
        "shader compilation failed for {} stage (id {}):\n{}",
        stage.kind,
        stage.id,
        log
    );
    Err(ProgramError::CompileFailed {
        stage: stage.kind,
        log,
    })
}

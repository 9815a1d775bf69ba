use crate::{
    config::ProgramConfig,
    gl_api::{
        context::Context,
        shader::{
            stage::{Stage, StageKind},
            uniform::{Uniform, UniformLocation},
            ProgramError,
        },
    },
};
use gl::types::*;
use std::{collections::BTreeMap, fmt, fs, path::Path, sync::Arc};

/// The program object itself. The object is deleted when this is dropped.
pub struct RawProgram {
    ctx: Context,
    id: GLuint,
}

impl RawProgram {
    pub fn new(ctx: &Context) -> Result<Self, ProgramError> {
        match ctx.driver().create_program()? {
            0 => Err(ProgramError::ProgramCreation),
            id => Ok(RawProgram {
                ctx: ctx.clone(),
                id,
            }),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl Drop for RawProgram {
    fn drop(&mut self) {
        log::debug!("deleting program {}", self.id);
        self.ctx.driver().delete_program(self.id);
    }
}

/// Checks the link status of `program`, logging and returning the driver's info log when linking
/// failed.
pub fn report_link_diagnostics(program: &RawProgram) -> Result<(), ProgramError> {
    let driver = program.ctx.driver();
    if driver.link_status(program.id) {
        return Ok(());
    }

    let log = driver.program_info_log(program.id);
    log::error!("program {} failed to link:\n{}", program.id, log);
    Err(ProgramError::LinkFailed { log })
}

/// Checks the validate status of `program`. Only meaningful after `glValidateProgram`.
pub fn report_validate_diagnostics(program: &RawProgram) -> Result<(), ProgramError> {
    let driver = program.ctx.driver();
    if driver.validate_status(program.id) {
        return Ok(());
    }

    let log = driver.program_info_log(program.id);
    log::error!("program {} failed validation:\n{}", program.id, log);
    Err(ProgramError::ValidateFailed { log })
}

#[derive(Clone, Debug)]
pub enum LinkState {
    Unlinked,
    Linked,
    Failed(ProgramError),
}

/// A shader program that is built up one stage at a time and linked once.
///
/// ```ignore
/// let mut program = ShaderProgram::new(&ctx)?;
/// program.add_stage("shaders/solid.vert", StageKind::Vertex)?;
/// program.add_stage("shaders/solid.frag", StageKind::Fragment)?;
/// program.link()?;
///
/// program.bind();
/// program.set_uniform_float("u_time", 1.5);
/// ```
///
/// Every failure is logged, recorded in [`diagnostics`](ShaderProgram::diagnostics) and returned.
/// Whether an operation keeps going after a failure is decided by the program's
/// [`ErrorPolicy`](crate::config::ErrorPolicy).
pub struct ShaderProgram {
    // stages are declared before `raw` so they are released before the program
    stages: BTreeMap<StageKind, Stage>,
    raw: RawProgram,
    config: ProgramConfig,
    state: LinkState,
    diagnostics: Vec<ProgramError>,
}

impl ShaderProgram {
    pub fn new(ctx: &Context) -> Result<Self, ProgramError> {
        Self::with_config(ctx, ProgramConfig::default())
    }

    pub fn with_config(ctx: &Context, config: ProgramConfig) -> Result<Self, ProgramError> {
        let raw = RawProgram::new(ctx)?;
        log::debug!("created program {} ({:?})", raw.id, config.policy);

        Ok(ShaderProgram {
            stages: BTreeMap::new(),
            raw,
            config,
            state: LinkState::Unlinked,
            diagnostics: Vec::new(),
        })
    }

    /// Creates a program and adds a vertex and a fragment stage read from the given files.
    ///
    /// With the default policy, stage failures only show up in the program's diagnostics.
    pub fn from_files<V, F>(ctx: &Context, vertex: V, fragment: F) -> Result<Self, ProgramError>
    where
        V: AsRef<Path>,
        F: AsRef<Path>,
    {
        Self::from_files_with_config(ctx, vertex, fragment, ProgramConfig::default())
    }

    pub fn from_files_with_config<V, F>(
        ctx: &Context,
        vertex: V,
        fragment: F,
        config: ProgramConfig,
    ) -> Result<Self, ProgramError>
    where
        V: AsRef<Path>,
        F: AsRef<Path>,
    {
        let mut program = Self::with_config(ctx, config)?;

        let vertex = program.add_stage(vertex, StageKind::Vertex);
        if program.config.is_fail_fast() {
            vertex?;
        }

        let fragment = program.add_stage(fragment, StageKind::Fragment);
        if program.config.is_fail_fast() {
            fragment?;
        }

        Ok(program)
    }

    /// Reads the file at `path` and adds it as a stage of kind `kind`.
    ///
    /// An unreadable file is reported; under [`ErrorPolicy::LogAndContinue`] the stage is then
    /// compiled from an empty source, which fails and is reported in turn. The first failure is
    /// returned.
    ///
    /// [`ErrorPolicy::LogAndContinue`]: crate::config::ErrorPolicy::LogAndContinue
    pub fn add_stage<P>(&mut self, path: P, kind: StageKind) -> Result<(), ProgramError>
    where
        P: AsRef<Path>,
    {
        self.ensure_unlinked()?;

        let path = path.as_ref();
        let (source, read_error) = match fs::read_to_string(path) {
            Ok(source) => (source, None),
            Err(err) => {
                log::warn!(
                    "{} shader file not read from `{}`: {}",
                    kind,
                    path.display(),
                    err
                );
                let err = self.record(ProgramError::SourceRead {
                    stage: kind,
                    path: path.to_owned(),
                    source: Arc::new(err),
                });
                if self.config.is_fail_fast() {
                    return Err(err);
                }
                (String::new(), Some(err))
            }
        };

        let compiled = self.add_stage_source(&source, kind);
        match read_error {
            Some(err) => Err(err),
            None => compiled,
        }
    }

    /// Like [`add_stage`](ShaderProgram::add_stage), with the stage given as a raw GL enum.
    pub fn add_stage_raw<P>(&mut self, path: P, raw_kind: GLenum) -> Result<(), ProgramError>
    where
        P: AsRef<Path>,
    {
        match StageKind::from_gl_enum(raw_kind) {
            Some(kind) => self.add_stage(path, kind),
            None => {
                log::error!("0x{:X} is not a valid shader stage", raw_kind);
                Err(self.record(ProgramError::InvalidStageKind(raw_kind)))
            }
        }
    }

    /// Compiles `source` as a stage of kind `kind` and attaches it to the program.
    ///
    /// A stage of the same kind that was added earlier is detached and released.
    pub fn add_stage_source(&mut self, source: &str, kind: StageKind) -> Result<(), ProgramError> {
        self.ensure_unlinked()?;

        let stage = match Stage::new(&self.raw.ctx, kind) {
            Ok(stage) => stage,
            Err(err) => {
                log::error!("could not create {} shader: {}", kind, err);
                return Err(self.record(err));
            }
        };

        stage.source(source);
        let compiled = stage.compile();
        if let Err(err) = &compiled {
            let err = self.record(err.clone());
            if self.config.is_fail_fast() {
                return Err(err);
            }
        }

        let driver = self.raw.ctx.driver();
        driver.attach_shader(self.raw.id, stage.id);
        if let Some(previous) = self.stages.insert(kind, stage) {
            log::warn!(
                "program {} already had a {} stage (id {}), replacing it",
                self.raw.id,
                kind,
                previous.id
            );
            driver.detach_shader(self.raw.id, previous.id);
        }

        compiled
    }

    /// Links every attached stage into the program, then detaches and releases all stages.
    ///
    /// Once the program has been linked, calling this again returns the earlier outcome.
    pub fn link(&mut self) -> Result<(), ProgramError> {
        match &self.state {
            LinkState::Linked => return Ok(()),
            LinkState::Failed(err) => return Err(err.clone()),
            LinkState::Unlinked => {}
        }

        let driver = self.raw.ctx.driver();
        driver.link_program(self.raw.id);

        let mut result = report_link_diagnostics(&self.raw);
        if result.is_ok() && self.config.validate {
            driver.validate_program(self.raw.id);
            result = report_validate_diagnostics(&self.raw);
        }

        self.release_stages();

        self.state = match &result {
            Ok(()) => LinkState::Linked,
            Err(err) => LinkState::Failed(self.record(err.clone())),
        };
        result
    }

    fn release_stages(&mut self) {
        let driver = self.raw.ctx.driver();
        for (kind, stage) in std::mem::take(&mut self.stages) {
            log::debug!("releasing {} stage {} of program {}", kind, stage.id, self.raw.id);
            driver.detach_shader(self.raw.id, stage.id);
        }
    }

    /// Makes this the active program for subsequent draw calls.
    pub fn bind(&self) {
        self.raw.ctx.driver().use_program(self.raw.id);
    }

    /// Looks up `name` in the linked program. Missing uniforms resolve to `-1`.
    pub fn uniform_location(&self, name: &str) -> UniformLocation {
        self.raw.ctx.driver().uniform_location(self.raw.id, name)
    }

    /// Writes `uniform` to the uniform called `name`, binding the program first.
    ///
    /// Locations are looked up on every call. Writing to a name the program does not have does
    /// nothing.
    pub fn set_uniform<U: Uniform + ?Sized>(&self, name: &str, uniform: &U) {
        self.bind();
        let location = self.uniform_location(name);
        if location < 0 {
            log::debug!("program {} has no active uniform `{}`", self.raw.id, name);
        }
        self.raw
            .ctx
            .driver()
            .set_uniform(location, uniform.uniform_value());
    }

    pub fn set_uniform_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, &value);
    }

    pub fn set_uniform_int(&self, name: &str, value: i32) {
        self.set_uniform(name, &value);
    }

    pub fn set_uniform_float(&self, name: &str, value: f32) {
        self.set_uniform(name, &value);
    }

    /// Deletes the program object. Dropping the program does the same.
    pub fn destroy(self) {}

    pub fn id(&self) -> GLuint {
        self.raw.id
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    pub fn link_state(&self) -> &LinkState {
        &self.state
    }

    pub fn is_linked(&self) -> bool {
        matches!(self.state, LinkState::Linked)
    }

    /// The shader object currently held for `kind`, if any. Always `None` after linking.
    pub fn stage_id(&self, kind: StageKind) -> Option<GLuint> {
        self.stages.get(&kind).map(Stage::id)
    }

    pub fn live_stages(&self) -> impl Iterator<Item = StageKind> + '_ {
        self.stages.keys().copied()
    }

    /// Every failure reported by this program so far, oldest first.
    pub fn diagnostics(&self) -> &[ProgramError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ProgramError> {
        std::mem::take(&mut self.diagnostics)
    }

    fn ensure_unlinked(&mut self) -> Result<(), ProgramError> {
        match self.state {
            LinkState::Unlinked => Ok(()),
            _ => {
                log::error!("program {} is already linked, not adding a stage", self.raw.id);
                Err(self.record(ProgramError::AlreadyLinked))
            }
        }
    }

    fn record(&mut self, err: ProgramError) -> ProgramError {
        self.diagnostics.push(err.clone());
        err
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("id", &self.raw.id)
            .field("stages", &self.stages)
            .field("state", &self.state)
            .field("config", &self.config)
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

//! An in-memory driver that behaves enough like a GL implementation for the program wrapper.
//!
//! A stage compiles when its source has a `main` function. A program links when every attached
//! stage compiled and it has a vertex and fragment stage, or only a compute stage. Uniforms are
//! declared by `uniform <type> <name>;` lines in the linked sources.

use crate::gl_api::{
    driver::Driver,
    error::{GlError, GlResult},
    shader::{StageKind, UniformLocation, UniformValue},
};
use gl::types::*;
use std::{
    cell::{Ref, RefCell, RefMut},
    collections::HashMap,
};

#[derive(Debug)]
pub struct FakeShader {
    pub kind: StageKind,
    pub source: String,
    pub compiled: bool,
}

#[derive(Debug, Default)]
pub struct FakeProgram {
    pub attached: Vec<GLuint>,
    pub linked: bool,
    pub validated: bool,
    pub uniforms: Vec<String>,
    pub info_log: String,
}

/// How a `create_*` call should fail.
#[derive(Copy, Clone, Debug)]
pub enum CreateFailure {
    /// Return the null object without raising an error.
    Null,
    Error(GlError),
}

impl CreateFailure {
    fn result(self) -> GlResult<GLuint> {
        match self {
            CreateFailure::Null => Ok(0),
            CreateFailure::Error(err) => Err(err),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    next_id: GLuint,
    pub shaders: HashMap<GLuint, FakeShader>,
    pub programs: HashMap<GLuint, FakeProgram>,
    pub created_shaders: usize,
    pub deleted_shaders: Vec<GLuint>,
    pub deleted_programs: Vec<GLuint>,
    pub link_calls: usize,
    pub location_lookups: usize,
    pub bound: Option<GLuint>,
    pub uniform_writes: Vec<(UniformLocation, UniformValue)>,
    pub fail_validation: bool,
    pub fail_create_program: Option<CreateFailure>,
    pub fail_create_shader: Option<CreateFailure>,
}

impl FakeState {
    fn next_id(&mut self) -> GLuint {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    state: RefCell<FakeState>,
}

impl FakeDriver {
    pub fn state(&self) -> Ref<FakeState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<FakeState> {
        self.state.borrow_mut()
    }

    pub fn shader_is_live(&self, shader: GLuint) -> bool {
        self.state().shaders.contains_key(&shader)
    }

    pub fn program_is_live(&self, program: GLuint) -> bool {
        self.state().programs.contains_key(&program)
    }

    pub fn source_of(&self, shader: GLuint) -> Option<String> {
        self.state().shaders.get(&shader).map(|s| s.source.clone())
    }

    pub fn attached(&self, program: GLuint) -> Vec<GLuint> {
        self.state()
            .programs
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let mut words = line.trim().trim_end_matches(';').split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("uniform"), Some(_), Some(name)) => Some(name.to_string()),
            _ => None,
        }
    })
}

impl Driver for FakeDriver {
    fn create_program(&self) -> GlResult<GLuint> {
        let mut state = self.state_mut();
        if let Some(failure) = state.fail_create_program {
            return failure.result();
        }
        let id = state.next_id();
        state.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state_mut();
        assert!(state.programs.remove(&program).is_some(), "double delete of program {}", program);
        state.deleted_programs.push(program);
    }

    fn create_shader(&self, kind: StageKind) -> GlResult<GLuint> {
        let mut state = self.state_mut();
        if let Some(failure) = state.fail_create_shader {
            return failure.result();
        }
        let id = state.next_id();
        state.created_shaders += 1;
        state.shaders.insert(
            id,
            FakeShader {
                kind,
                source: String::new(),
                compiled: false,
            },
        );
        Ok(id)
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state_mut();
        assert!(state.shaders.remove(&shader).is_some(), "double delete of shader {}", shader);
        state.deleted_shaders.push(shader);
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        if let Some(s) = self.state_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        if let Some(s) = self.state_mut().shaders.get_mut(&shader) {
            s.compiled = s.source.contains("void main()");
        }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        self.state().shaders.get(&shader).map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        match self.state().shaders.get(&shader) {
            Some(s) if !s.compiled => "0:1(1): error: syntax error, missing `main`".to_string(),
            _ => String::new(),
        }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.state_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.state_mut().programs.get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state_mut();
        state.link_calls += 1;

        let state = &mut *state;
        let p = match state.programs.get_mut(&program) {
            Some(p) => p,
            None => return,
        };
        let stages = p
            .attached
            .iter()
            .filter_map(|id| state.shaders.get(id))
            .collect::<Vec<_>>();

        let has = |kind| stages.iter().any(|s| s.kind == kind);
        let complete = (has(StageKind::Vertex) && has(StageKind::Fragment))
            || (has(StageKind::Compute) && stages.len() == 1);

        p.linked = complete && stages.iter().all(|s| s.compiled);
        p.uniforms.clear();
        if p.linked {
            p.info_log.clear();
            p.uniforms
                .extend(stages.iter().flat_map(|s| declared_uniforms(&s.source)));
        } else if stages.is_empty() {
            p.info_log = "error: no shaders attached to the program".to_string();
        } else {
            p.info_log = "error: linking with uncompiled or incomplete stages".to_string();
        }
    }

    fn link_status(&self, program: GLuint) -> bool {
        self.state().programs.get(&program).map_or(false, |p| p.linked)
    }

    fn validate_program(&self, program: GLuint) {
        let mut state = self.state_mut();
        let fail = state.fail_validation;
        if let Some(p) = state.programs.get_mut(&program) {
            p.validated = p.linked && !fail;
            if !p.validated {
                p.info_log = "error: program is not valid in the current state".to_string();
            }
        }
    }

    fn validate_status(&self, program: GLuint) -> bool {
        self.state().programs.get(&program).map_or(false, |p| p.validated)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state()
            .programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: GLuint) {
        self.state_mut().bound = Some(program);
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> UniformLocation {
        let mut state = self.state_mut();
        state.location_lookups += 1;
        state
            .programs
            .get(&program)
            .and_then(|p| p.uniforms.iter().position(|u| u == name))
            .map_or(-1, |index| index as UniformLocation)
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue) {
        if location >= 0 {
            self.state_mut().uniform_writes.push((location, value));
        }
    }
}

use crate::gl_api::{
    error::GlResult,
    shader::{StageKind, UniformLocation, UniformValue},
};
use gl::types::*;
use std::{ffi::CString, ptr};

/// The subset of the graphics driver that programs and stages are built from.
///
/// Every method is a thin wrapper over a single driver entry point. Implementations are expected to
/// be thread-affine; they are only ever reached through a [`Context`](crate::gl_api::Context).
pub trait Driver {
    fn create_program(&self) -> GlResult<GLuint>;
    fn delete_program(&self, program: GLuint);

    fn create_shader(&self, kind: StageKind) -> GlResult<GLuint>;
    fn delete_shader(&self, shader: GLuint);
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;

    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);

    fn link_program(&self, program: GLuint);
    fn link_status(&self, program: GLuint) -> bool;
    fn validate_program(&self, program: GLuint);
    fn validate_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;

    fn use_program(&self, program: GLuint);
    /// Returns `-1` when `name` does not name an active uniform.
    fn uniform_location(&self, program: GLuint, name: &str) -> UniformLocation;
    /// Writes to location `-1` are silently ignored.
    fn set_uniform(&self, location: UniformLocation, value: UniformValue);
}

/// [`Driver`] backed by the global function pointers of the `gl` crate.
///
/// The pointers must have been loaded for the current context, which [`Context::load`] does.
///
/// [`Context::load`]: crate::gl_api::Context::load
#[derive(Debug, Default)]
pub struct GlDriver {
    _priv: (),
}

impl GlDriver {
    pub(crate) fn new() -> Self {
        GlDriver { _priv: () }
    }
}

impl Driver for GlDriver {
    fn create_program(&self) -> GlResult<GLuint> {
        gl_call!(CreateProgram())
    }

    fn delete_program(&self, program: GLuint) {
        gl_call!(log DeleteProgram(program));
    }

    fn create_shader(&self, kind: StageKind) -> GlResult<GLuint> {
        gl_call!(CreateShader(kind as GLenum))
    }

    fn delete_shader(&self, shader: GLuint) {
        gl_call!(log DeleteShader(shader));
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        gl_call!(log ShaderSource(
            shader,
            1,
            &(source.as_ptr() as *const GLchar),
            &(source.len() as GLint)
        ));
    }

    fn compile_shader(&self, shader: GLuint) {
        gl_call!(log CompileShader(shader));
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut status = 0;
        gl_call!(log GetShaderiv(shader, gl::COMPILE_STATUS, &mut status));
        status != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut length = 0;
        gl_call!(log GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length));
        read_info_log(length, |len, buf| {
            gl_call!(log GetShaderInfoLog(shader, len, ptr::null_mut(), buf));
        })
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        gl_call!(log AttachShader(program, shader));
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        gl_call!(log DetachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        gl_call!(log LinkProgram(program));
    }

    fn link_status(&self, program: GLuint) -> bool {
        program_status(program, gl::LINK_STATUS)
    }

    fn validate_program(&self, program: GLuint) {
        gl_call!(log ValidateProgram(program));
    }

    fn validate_status(&self, program: GLuint) -> bool {
        program_status(program, gl::VALIDATE_STATUS)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut length = 0;
        gl_call!(log GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length));
        read_info_log(length, |len, buf| {
            gl_call!(log GetProgramInfoLog(program, len, ptr::null_mut(), buf));
        })
    }

    fn use_program(&self, program: GLuint) {
        gl_call!(log UseProgram(program));
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> UniformLocation {
        match CString::new(name) {
            Ok(c_string) => gl_call!(log GetUniformLocation(program, c_string.as_ptr())),
            Err(_) => {
                log::debug!("uniform name {:?} contains a NUL byte", name);
                -1
            }
        }
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue) {
        match value {
            UniformValue::Int(v) => gl_call!(log Uniform1i(location, v)),
            UniformValue::UInt(v) => gl_call!(log Uniform1ui(location, v)),
            UniformValue::Float(v) => gl_call!(log Uniform1f(location, v)),
            UniformValue::Vec2([x, y]) => gl_call!(log Uniform2f(location, x, y)),
            UniformValue::Vec3([x, y, z]) => gl_call!(log Uniform3f(location, x, y, z)),
            UniformValue::Vec4([x, y, z, w]) => gl_call!(log Uniform4f(location, x, y, z, w)),
            UniformValue::IVec2([x, y]) => gl_call!(log Uniform2i(location, x, y)),
            UniformValue::IVec3([x, y, z]) => gl_call!(log Uniform3i(location, x, y, z)),
            UniformValue::IVec4([x, y, z, w]) => gl_call!(log Uniform4i(location, x, y, z, w)),
            UniformValue::Mat3(m) => {
                gl_call!(log UniformMatrix3fv(location, 1, gl::FALSE, m.as_ptr() as *const f32))
            }
            UniformValue::Mat4(m) => {
                gl_call!(log UniformMatrix4fv(location, 1, gl::FALSE, m.as_ptr() as *const f32))
            }
        }
    }
}

fn program_status(program: GLuint, ty: GLenum) -> bool {
    let mut status = 0;
    gl_call!(log GetProgramiv(program, ty, &mut status));
    status != 0
}

// `length` includes the trailing NUL; the returned string does not.
fn read_info_log<F>(length: GLint, fill: F) -> String
where
    F: FnOnce(GLint, *mut GLchar),
{
    if length <= 0 {
        return String::new();
    }

    let mut buffer = vec![0u8; length as usize];
    fill(length, buffer.as_mut_ptr() as *mut GLchar);

    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    buffer.truncate(end);
    String::from_utf8_lossy(&buffer).into_owned()
}

use std::fmt;

pub type GlResult<T> = Result<T, GlError>;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlError {
    code: gl::types::GLenum,
}

impl GlError {
    pub fn get() -> Self {
        GlError {
            code: unsafe { gl::GetError() },
        }
    }

    pub fn from_code(code: gl::types::GLenum) -> Self {
        GlError { code }
    }

    pub fn code(&self) -> gl::types::GLenum {
        self.code
    }

    pub fn result<T>(self, res: T) -> GlResult<T> {
        match self.code {
            gl::NO_ERROR => Ok(res),
            _ => Err(self),
        }
    }

    fn name(&self) -> &'static str {
        match self.code {
            gl::INVALID_ENUM => "GL_INVALID_ENUM",
            gl::INVALID_VALUE => "GL_INVALID_VALUE",
            gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
            gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
            gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
            gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
            _ => "unknown",
        }
    }
}

impl fmt::Debug for GlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:X} {}", self.code, self.name())
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (0x{:X})", self.name(), self.code)
    }
}

impl std::error::Error for GlError {}

/// Calls a raw `gl` function and checks `glGetError` afterwards.
///
/// The bare form evaluates to a `GlResult` of the call's return value. The `log` form never fails:
/// it reports the error code at warn level and evaluates to the return value, which is what
/// release paths and fire-and-forget state changes want.
macro_rules! gl_call {
    ($name:ident($($args:expr),*)) => {{
        let ret = unsafe { ::gl::$name($($args),*) };
        $crate::gl_api::error::GlError::get().result(ret)
    }};

    (log $name:ident($($args:expr),*)) => {{
        let ret = unsafe { ::gl::$name($($args),*) };
        if let Err(err) = $crate::gl_api::error::GlError::get().result(()) {
            ::log::warn!("gl{} failed with error code {:?}", stringify!($name), err);
        }
        ret
    }};
}

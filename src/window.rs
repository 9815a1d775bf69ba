use crate::gl_api::Context;
use anyhow::{anyhow, Result};
use glfw::{Context as _, OpenGlProfileHint, WindowHint, WindowMode};

/// A window that is never shown, kept around only for the GL context it owns.
pub struct HiddenWindow {
    // declared before `glfw` so the window is destroyed before glfw terminates
    window: glfw::PWindow,
    _events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    _glfw: glfw::Glfw,
}

impl HiddenWindow {
    /// Creates a hidden window with a 3.3 core context and makes that context current.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut glfw = glfw::init(glfw::log_errors)
            .map_err(|err| anyhow!("failed to initialize glfw: {:?}", err))?;

        glfw.window_hint(WindowHint::Visible(false));
        glfw.window_hint(WindowHint::ContextVersion(3, 3));
        glfw.window_hint(WindowHint::OpenGlProfile(OpenGlProfileHint::Core));
        glfw.window_hint(WindowHint::OpenGlForwardCompat(true));

        let (mut window, events) = glfw
            .create_window(width, height, "shader-program", WindowMode::Windowed)
            .ok_or_else(|| anyhow!("failed to create a {}x{} GL window", width, height))?;
        window.make_current();
        log::debug!("created hidden {}x{} window", width, height);

        Ok(HiddenWindow {
            window,
            _events: events,
            _glfw: glfw,
        })
    }

    /// Loads GL for this window's context.
    pub fn load_context(&mut self) -> Context {
        let window = &mut self.window;
        Context::load(|symbol| window.get_proc_address(symbol) as *const _)
    }
}

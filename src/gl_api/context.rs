use crate::gl_api::driver::{Driver, GlDriver};
use std::{fmt, marker::PhantomData, rc::Rc};

/// Handle to the driver of the GL context that is current on this thread.
///
/// Cloning is cheap. Every program and stage object keeps a clone so that it can release itself
/// when dropped.
#[derive(Clone)]
pub struct Context(Rc<ContextInner>);

struct ContextInner {
    // Make sure this isn't Send or Sync
    _marker: PhantomData<*mut ()>,
    driver: Rc<dyn Driver>,
}

impl Context {
    /// Loads the `gl` function pointers for the current context.
    pub fn load<F>(mut load_fn: F) -> Context
    where
        F: FnMut(&'static str) -> *const (),
    {
        gl::load_with(|symbol| load_fn(symbol) as *const _);
        log::debug!("loaded GL function pointers");

        Context::with_driver(Rc::new(GlDriver::new()))
    }

    pub fn with_driver<D>(driver: Rc<D>) -> Context
    where
        D: Driver + 'static,
    {
        Context(Rc::new(ContextInner {
            _marker: PhantomData,
            driver,
        }))
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.0.driver
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("ptr", &Rc::as_ptr(&self.0))
            .finish()
    }
}

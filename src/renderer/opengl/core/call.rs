use glow::HasContext;
use log::warn;
use snafu::Snafu;
use std::fmt;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    #[snafu(display(
        "OpenGL call '{}' at {}:{} raised {}",
        expression,
        file,
        line,
        describe_codes(codes)
    ))]
    CallFailed {
        expression: &'static str,
        file: &'static str,
        line: u32,
        codes: Vec<GlErrorCode>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlErrorCode(pub u32);

impl GlErrorCode {
    pub fn name(&self) -> Option<&'static str> {
        let name = match self.0 {
            glow::INVALID_ENUM => "GL_INVALID_ENUM",
            glow::INVALID_VALUE => "GL_INVALID_VALUE",
            glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
            glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
            glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
            glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for GlErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:X})", name, self.0),
            None => write!(f, "unknown error (0x{:X})", self.0),
        }
    }
}

fn describe_codes(codes: &[GlErrorCode]) -> String {
    codes
        .iter()
        .map(|code| code.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Discards every queued code, returning how many there were.
pub fn drain_error_codes(mut poll: impl FnMut() -> u32) -> usize {
    let mut drained = 0;
    while poll() != glow::NO_ERROR {
        drained += 1;
    }
    drained
}

/// Collects every queued code in reporting order.
pub fn collect_error_codes(mut poll: impl FnMut() -> u32) -> Vec<GlErrorCode> {
    let mut codes = Vec::new();
    loop {
        let code = poll();
        if code == glow::NO_ERROR {
            break;
        }
        codes.push(GlErrorCode(code));
    }
    codes
}

/// Runs one raw invocation between two sweeps of the error queue. Codes
/// queued beforehand belong to some earlier unchecked call and are logged
/// and discarded; codes found afterwards fail the call.
pub fn checked_with<T>(
    mut poll: impl FnMut() -> u32,
    expression: &'static str,
    file: &'static str,
    line: u32,
    invoke: impl FnOnce() -> T,
) -> Result<T> {
    for stale in collect_error_codes(&mut poll) {
        warn!(
            "Discarding stale OpenGL error {} queued before '{}'",
            stale, expression
        );
    }

    let value = invoke();

    let codes = collect_error_codes(poll);
    if codes.is_empty() {
        Ok(value)
    } else {
        CallFailed {
            expression,
            file,
            line,
            codes,
        }
        .fail()
    }
}

/// [`checked_with`] polling a live context.
pub fn checked<T>(
    gl: &glow::Context,
    expression: &'static str,
    file: &'static str,
    line: u32,
    invoke: impl FnOnce() -> T,
) -> Result<T> {
    checked_with(|| unsafe { gl.get_error() }, expression, file, line, invoke)
}

/// `checked` for calls kept infallible by contract, such as binds and
/// handle releases: debug builds stop on the diagnostic, release builds
/// run the invocation bare.
pub fn debug_checked<T>(
    gl: &glow::Context,
    expression: &'static str,
    file: &'static str,
    line: u32,
    invoke: impl FnOnce() -> T,
) -> T {
    if cfg!(debug_assertions) {
        match checked(gl, expression, file, line, invoke) {
            Ok(value) => value,
            Err(error) => panic!("{}", error),
        }
    } else {
        invoke()
    }
}

/// Runs a raw OpenGL invocation through `checked`, capturing the call
/// expression and source location for the diagnostic. The invocation runs
/// inside an `unsafe` block; callers uphold the current-context contract.
#[macro_export]
macro_rules! gl_call {
    ($gl:expr, $invocation:expr) => {
        $crate::renderer::opengl::core::call::checked(
            $gl,
            stringify!($invocation),
            file!(),
            line!(),
            || unsafe { $invocation },
        )
    };
}

/// `gl_call!` routed through `debug_checked`.
#[macro_export]
macro_rules! gl_debug_call {
    ($gl:expr, $invocation:expr) => {
        $crate::renderer::opengl::core::call::debug_checked(
            $gl,
            stringify!($invocation),
            file!(),
            line!(),
            || unsafe { $invocation },
        )
    };
}

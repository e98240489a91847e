use anyhow::{anyhow, Context, Result};
use glint::renderer::opengl::{
    AttributeKind, GlContext, IndexBuffer, Renderer, ShaderProgram, VertexArray, VertexBuffer,
    VertexLayout,
};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextAttributesBuilder, PossiblyCurrentContext},
    display::GetGlDisplay,
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, error, warn};
use nalgebra_glm as glm;
use serde::Deserialize;
use simplelog::*;
use std::{ffi::CString, fs::File, num::NonZeroU32, sync::Arc};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    raw_window_handle::HasWindowHandle,
    window::{Window, WindowId},
};

#[derive(Debug, Deserialize)]
pub struct Settings {
    width: i64,
    height: i64,
}

pub struct App {
    settings: Settings,
    state: Option<RenderState>,
    failure: Option<anyhow::Error>,
}

impl App {
    pub const TITLE: &'static str = "Glint - Indexed Quad";
    pub const LOG_FILE: &'static str = "glint.log";
    pub const SETTINGS_FILE: &'static str = "settings.toml";

    pub fn run() -> Result<()> {
        Self::setup_logger()?;

        let settings = Self::load_settings()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            settings,
            state: None,
            failure: None,
        };
        event_loop.run_app(&mut app)?;

        match app.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn setup_logger() -> Result<()> {
        CombinedLogger::init(vec![
            TermLogger::new(LevelFilter::max(), Config::default(), TerminalMode::Mixed),
            WriteLogger::new(
                LevelFilter::Info,
                Config::default(),
                File::create(Self::LOG_FILE)
                    .with_context(|| format!("log file path: {}", Self::LOG_FILE))?,
            ),
        ])?;
        Ok(())
    }

    fn load_settings() -> Result<Settings> {
        debug!("Loading settings file");
        let mut config = config::Config::default();
        config
            .merge(config::File::with_name(Self::SETTINGS_FILE))
            .with_context(|| format!("settings file path: {}", Self::SETTINGS_FILE))?;
        let settings: Settings = config.try_into()?;
        Ok(settings)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match RenderState::new(event_loop, &self.settings) {
            Ok(state) => self.state = Some(state),
            Err(error) => {
                error!("Failed to initialize rendering: {}", error);
                self.failure = Some(error);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_ref() {
                    state.resize(size);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(state) = self.state.as_mut() {
                    if let Err(error) = state.render_frame() {
                        error!("Halting after a rendering failure: {}", error);
                        self.failure = Some(error);
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }
}

// Field order doubles as drop order: the scene's GL objects go away while
// the surface and context that loaded them are still alive.
struct RenderState {
    scene: Scene,
    renderer: Renderer,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl RenderState {
    fn new(event_loop: &ActiveEventLoop, settings: &Settings) -> Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(App::TITLE)
            .with_inner_size(PhysicalSize::new(
                settings.width as u32,
                settings.height as u32,
            ));

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), |mut configs| {
                configs.next().expect("at least one GL framebuffer config")
            })
            .map_err(|error| anyhow!("Failed to pick a GL framebuffer config: {}", error))?;
        let window = window.context("The display builder returned no window")?;

        let gl_display = gl_config.display();
        let raw_window_handle = window
            .window_handle()
            .context("Failed to get the native window handle")?
            .as_raw();

        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("Failed to create a GL context")?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .context("Failed to describe the window surface")?;
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .context("Failed to create the window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("Failed to make the GL context current")?;

        if let Err(error) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            warn!("Failed to enable vsync: {}", error);
        }

        let gl_context = Arc::new(unsafe {
            GlContext::new(|symbol| {
                let symbol = CString::new(symbol).expect("GL symbol names never contain NUL");
                gl_display.get_proc_address(symbol.as_c_str())
            })
        });

        let renderer = Renderer::new(gl_context.clone());
        let size = window.inner_size();
        renderer.set_viewport(size.width, size.height);

        let scene = Scene::new(&gl_context)?;

        Ok(Self {
            scene,
            renderer,
            surface,
            context,
            window,
        })
    }

    fn resize(&self, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.surface.resize(&self.context, width, height);
            self.renderer.set_viewport(size.width, size.height);
        }
    }

    fn render_frame(&mut self) -> Result<()> {
        self.scene.render(&self.renderer)?;
        self.surface
            .swap_buffers(&self.context)
            .context("Failed to swap buffers")?;
        Ok(())
    }
}

const QUAD_VERTICES: [f32; 8] = [
    -0.5, -0.5, // bottom left
    0.5, -0.5, // bottom right
    0.5, 0.5, // top right
    -0.5, 0.5, // top left
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

struct Scene {
    vertex_array: VertexArray,
    _vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    program: ShaderProgram,
    red_channel: f32,
    red_step: f32,
}

impl Scene {
    const SHADER_PATH: &'static str = "assets/shaders/basic.shader";

    fn new(context: &Arc<GlContext>) -> Result<Self> {
        let vertex_buffer = VertexBuffer::new(context.clone(), &QUAD_VERTICES)?;

        let mut layout = VertexLayout::new();
        layout.push(AttributeKind::Float, 2);

        let vertex_array = VertexArray::new(context.clone())?;
        vertex_array.add_buffer(&vertex_buffer, &layout)?;

        let index_buffer = IndexBuffer::new(context.clone(), &QUAD_INDICES)?;

        let program = ShaderProgram::from_file(context.clone(), Self::SHADER_PATH)?;
        let projection = glm::ortho(-2.0, 2.0, -1.5, 1.5, -1.0, 1.0);
        program.set_uniform_mat4("u_MVP", &projection)?;

        Ok(Self {
            vertex_array,
            _vertex_buffer: vertex_buffer,
            index_buffer,
            program,
            red_channel: 0.0,
            red_step: 0.05,
        })
    }

    fn render(&mut self, renderer: &Renderer) -> Result<()> {
        renderer.set_clear_color(0.05, 0.05, 0.08, 1.0);
        renderer.clear();

        self.program
            .set_uniform_4_f32("u_Color", self.red_channel, 0.3, 0.8, 1.0)?;
        renderer.draw(&self.vertex_array, &self.index_buffer, &self.program)?;

        if self.red_channel > 1.0 {
            self.red_step = -0.05;
        } else if self.red_channel < 0.0 {
            self.red_step = 0.05;
        }
        self.red_channel += self.red_step;

        Ok(())
    }
}

//! Flow control and the application event loop.
//!
//! A "flow" is the scene being shown. The loop owns the window, the GPU
//! context and the input state, and drives the flow once per redraw:
//!
//! 1. poll input into a [`SixAxis`](crate::input::SixAxis) snapshot
//! 2. build the [`FrameContext`] for the current frame-in-flight slot
//! 3. `update_uniforms` (uniform writes are queued on the device queue)
//! 4. begin a render pass and call `populate_commands` for the same slot
//! 5. submit, present and advance to the next slot
//!
//! Queue writes land before any later submission, so the uniforms of slot
//! `i` are always visible to the draws recorded for slot `i`.

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::AppConfig,
    context::{Context, InitContext},
    frame::{FrameContext, FrameSlots},
    input::InputState,
};

/// What the loop should do after a flow callback returns.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Out {
    /// Leave the event loop once the current frame has been presented.
    Exit,
    #[default]
    Empty,
}

/// A scene driven by the frame loop.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once after the context exists; configure it here
/// 2. `on_window_resize()` is called after the surface changed size
/// 3. `update_uniforms()` then `populate_commands()` are called every frame
///    with the same frame-in-flight index
pub trait GraphicsFlow {
    fn on_init(&mut self, ctx: &mut Context) -> Out;

    fn on_window_resize(&mut self, _ctx: &Context, _width: u32, _height: u32) -> Out {
        Out::Empty
    }

    /// Write this frame's uniforms into the slots of `frame.frame_index`.
    /// An error stops the loop.
    fn update_uniforms(&mut self, ctx: &Context, frame: &FrameContext) -> anyhow::Result<Out>;

    /// Record this frame's draws. The pass already targets the frame's
    /// colour and depth attachments.
    fn populate_commands(&self, render_pass: &mut wgpu::RenderPass<'_>, frame_index: usize);
}

/// Asynchronously builds the flow once the GPU is available.
pub type FlowConstructor = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow>>>>>,
>;

/// GPU context plus surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &AppConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        Ok(Self {
            ctx,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
            log::debug!(
                "surface resized to {width}x{height}, aspect {}",
                self.ctx.aspect_ratio()
            );
        }
    }

    fn render(&mut self, flow: &dyn GraphicsFlow, frame_index: usize) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            flow.populate_commands(&mut render_pass, frame_index);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        self.ctx.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: AppConfig,
    state: Option<AppState>,
    flow: Option<Box<dyn GraphicsFlow>>,
    // Taken on first resume.
    constructor: Option<FlowConstructor>,
    input: InputState,
    slots: FrameSlots,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        config: AppConfig,
        constructor: FlowConstructor,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            slots: FrameSlots::new(config.frames_in_flight),
            config,
            state: None,
            flow: None,
            constructor: Some(constructor),
            input: InputState::new(),
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop, mut state: AppState, mut flow: Box<dyn GraphicsFlow>) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        if flow.on_init(&mut state.ctx) == Out::Exit {
            event_loop.exit();
        }
        state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(state);
        self.flow = Some(flow);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(state), Some(flow)) = (self.state.as_mut(), self.flow.as_mut()) else {
            return;
        };
        state.ctx.window.request_redraw();
        if !state.is_surface_configured {
            return;
        }

        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();
        let frame = FrameContext::new(
            self.slots.current(),
            state.ctx.aspect_ratio(),
            self.input.poll(dt),
        );

        let out = match flow.update_uniforms(&state.ctx, &frame) {
            Ok(out) => out,
            Err(e) => {
                self.fail(event_loop, e.context("uniform update failed"));
                return;
            }
        };

        match state.render(&**flow, frame.frame_index) {
            Ok(()) => {
                self.slots.advance();
            }
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let PhysicalSize { width, height } = state.ctx.window.inner_size();
                state.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("surface is out of memory"));
                return;
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
            }
        }

        if out == Out::Exit {
            log::info!("exit requested");
            event_loop.exit();
        }
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(anyhow::Result<(AppState, Box<dyn GraphicsFlow>)>),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(Ok(_)) => f.write_str("Initialized(Ok)"),
            Self::Initialized(Err(e)) => write!(f, "Initialized(Err({e}))"),
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructor) = self.constructor.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(self.config.window.resizable);

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes = window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => log::warn!("no #{CANVAS_ID} element, letting winit create a canvas"),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("failed to create window"));
                return;
            }
        };

        let config = self.config.clone();
        let init_future = async move {
            let app_state = AppState::new(window, &config).await?;
            let flow = constructor((&app_state.ctx).into()).await?;
            Ok::<_, anyhow::Error>((app_state, flow))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let result: anyhow::Result<(AppState, Box<dyn GraphicsFlow>)> =
                self.async_runtime.block_on(init_future);
            match result {
                Ok((state, flow)) => self.start(event_loop, state, flow),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if proxy.send_event(FlowEvent::Initialized(init_future.await)).is_err() {
                    log::error!("event loop closed before initialization finished");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // Sent by the wasm `spawn_local` in `resumed`
            FlowEvent::Initialized(Ok((state, flow))) => self.start(event_loop, state, flow),
            FlowEvent::Initialized(Err(e)) => self.fail(event_loop, e),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        self.input.handle_device_event(&event);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        self.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let (Some(state), Some(flow)) = (self.state.as_mut(), self.flow.as_mut()) else {
                    return;
                };
                state.resize(size.width, size.height);
                if flow.on_window_resize(&state.ctx, size.width, size.height) == Out::Exit {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open a window and run `constructor`'s flow until it exits.
///
/// Returns the first fatal error met during initialization or rendering.
pub fn run(config: AppConfig, constructor: FlowConstructor) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: Could not initialize logger: {e}");
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| anyhow::anyhow!("could not initialize logger: {e}"))?;
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config, constructor)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

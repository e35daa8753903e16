//! The winit/glutin backend: one resizable window, one GL context bound to
//! it, and the host event queue pumped cooperatively from the device run
//! loop.
//!
//! The event loop is pumped with a zero timeout so `poll_events` never
//! blocks; window and context are created on the first `resumed` callback
//! the host delivers, and custom cursor resources are materialized inside
//! the pump because the host only mints them while its loop is live.

mod types;

use std::collections::HashMap;
use std::ffi::CString;
use std::num::NonZeroU32;
use std::os::raw::c_void;
use std::time::{Duration, Instant};

use glutin::config::{ColorBufferType, Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{Display, GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{
    ElementState, KeyEvent as HostKeyEvent, MouseScrollDelta, Touch as HostTouch,
    TouchPhase as HostTouchPhase, WindowEvent as HostWindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::ModifiersState;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::platform::scancode::PhysicalKeyExtScancode;
use winit::window::{Cursor, CustomCursor, CustomCursorSource, Fullscreen, Window, WindowId};

use crate::errors::Result;
use crate::math::prelude::Vector2;
use crate::video::DriverType;

use super::super::cursor::CursorStyle;
use super::super::events::{
    Event, KeyEvent, MouseAction, MouseEvent, TouchEvent, UserEvent,
};
use super::super::keymap::{Key, KeyMap};
use super::super::mouse::{ClickParams, MouseState};
use super::super::time::Timestamp;
use super::super::touch::TouchTracker;
use super::super::DeviceParams;
use super::{CursorHandle, CursorImage, VideoMode, Visitor};

/// How long one startup pump may wait for the host, and how many pumps we
/// grant it before giving up on the resume notification.
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(50);
const STARTUP_PUMP_ATTEMPTS: usize = 100;

// Field order is release order: the host state (cursor resources, context
// and surface, window) goes before the event loop that minted it.
pub struct WinitVisitor {
    host: Host,
    proxy: EventLoopProxy<UserEvent>,
    event_loop: EventLoop<UserEvent>,
}

impl WinitVisitor {
    pub fn new(params: &DeviceParams) -> Result<Self> {
        let event_loop = EventLoop::<UserEvent>::with_user_event()
            .build()
            .map_err(|err| format_err!("could not initialize the windowing system: {}", err))?;
        let proxy = event_loop.create_proxy();

        let mut visitor = WinitVisitor {
            host: Host::new(params),
            proxy,
            event_loop,
        };
        visitor.wait_for_window()?;
        Ok(visitor)
    }

    /// Pumps the host until the window and context exist. The host promises
    /// a resume notification shortly after startup on every desktop
    /// platform; a bounded wait keeps a broken host from hanging us.
    fn wait_for_window(&mut self) -> Result<()> {
        for _ in 0..STARTUP_PUMP_ATTEMPTS {
            let status = self
                .event_loop
                .pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut self.host);

            if let Some(err) = self.host.create_error.take() {
                return Err(err);
            }
            if self.host.window.is_some() {
                return Ok(());
            }
            if let PumpStatus::Exit(code) = status {
                return Err(format_err!(
                    "the event loop exited during startup (status {})",
                    code
                ));
            }
        }

        Err(format_err!(
            "the windowing system did not deliver a resume event"
        ))
    }

    #[inline]
    fn pump(&mut self) {
        let _ = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.host);
    }
}

impl Visitor for WinitVisitor {
    fn dimensions(&self) -> Vector2<u32> {
        match self.host.window.as_ref() {
            Some(window) => {
                let size = window.inner_size();
                Vector2::new(size.width, size.height)
            }
            None => self.host.config.size,
        }
    }

    fn position(&self) -> Vector2<i32> {
        self.host
            .window
            .as_ref()
            .and_then(|window| window.outer_position().ok())
            .map(|position| Vector2::new(position.x, position.y))
            .unwrap_or_else(|| Vector2::new(0, 0))
    }

    fn set_caption(&mut self, caption: &str) {
        if let Some(window) = self.host.window.as_ref() {
            window.set_title(caption);
        }
    }

    fn set_dimensions(&mut self, dimensions: Vector2<u32>) {
        if let Some(window) = self.host.window.as_ref() {
            // The host resizes asynchronously; the resulting resize event
            // flows back through the normal translation path.
            let _ = window.request_inner_size(PhysicalSize::new(dimensions.x, dimensions.y));
        }
    }

    fn set_resizable(&mut self, resizable: bool) {
        if let Some(window) = self.host.window.as_ref() {
            window.set_resizable(resizable);
        }
    }

    fn minimize(&mut self) {
        if let Some(window) = self.host.window.as_ref() {
            window.set_minimized(true);
        }
    }

    fn maximize(&mut self) {
        if let Some(window) = self.host.window.as_ref() {
            window.set_maximized(true);
        }
    }

    fn restore(&mut self) {
        if let Some(window) = self.host.window.as_ref() {
            window.set_minimized(false);
            window.set_maximized(false);
        }
    }

    #[inline]
    fn is_focused(&self) -> bool {
        self.host.focused
    }

    fn is_minimized(&self) -> bool {
        self.host
            .window
            .as_ref()
            .and_then(|window| window.is_minimized())
            .unwrap_or(false)
    }

    fn video_modes(&self) -> Vec<VideoMode> {
        let monitor = self
            .host
            .window
            .as_ref()
            .and_then(|window| window.current_monitor());

        match monitor {
            Some(monitor) => monitor
                .video_modes()
                .map(|mode| VideoMode {
                    dimensions: Vector2::new(mode.size().width, mode.size().height),
                    bits: mode.bit_depth(),
                    refresh_millihertz: mode.refresh_rate_millihertz(),
                })
                .collect(),
            None => Vec::new(),
        }
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        if let PumpStatus::Exit(_) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.host)
        {
            self.host.close = true;
        }

        events.append(&mut self.host.events);
    }

    #[inline]
    fn close_requested(&self) -> bool {
        self.host.close
    }

    fn post_user_event(&mut self, event: UserEvent) {
        if self.proxy.send_event(event).is_err() {
            warn!("the event loop is gone; user event dropped");
        }
    }

    fn resize_surface(&mut self, dimensions: Vector2<u32>) {
        if let Some(gl) = self.host.gl.as_ref() {
            gl.surface.resize(
                &gl.context,
                NonZeroU32::new(dimensions.x).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(dimensions.y).unwrap_or(NonZeroU32::MIN),
            );
        }
    }

    fn swap_buffers(&mut self) -> Result<()> {
        match self.host.gl.as_ref() {
            Some(gl) => gl
                .surface
                .swap_buffers(&gl.context)
                .map_err(|err| format_err!("could not swap buffers: {}", err)),
            None => Err(format_err!("no rendering context")),
        }
    }

    fn proc_address(&self, symbol: &str) -> *const c_void {
        let gl = match self.host.gl.as_ref() {
            Some(gl) => gl,
            None => return ::std::ptr::null(),
        };
        match CString::new(symbol) {
            Ok(symbol) => gl.display.get_proc_address(&symbol),
            Err(_) => ::std::ptr::null(),
        }
    }

    fn named_cursor(&mut self, style: CursorStyle) -> CursorHandle {
        let id = self.host.next_cursor;
        self.host.next_cursor += 1;
        self.host
            .cursors
            .insert(id, Cursor::Icon(types::named_cursor_icon(style)));
        CursorHandle(id)
    }

    fn create_cursor(&mut self, image: CursorImage) -> Result<CursorHandle> {
        let width = u16::try_from(image.width)
            .map_err(|_| format_err!("cursor image is {} pixels wide", image.width))?;
        let height = u16::try_from(image.height)
            .map_err(|_| format_err!("cursor image is {} pixels tall", image.height))?;

        let source = CustomCursor::from_rgba(
            image.rgba,
            width,
            height,
            image.hotspot.x as u16,
            image.hotspot.y as u16,
        )
        .map_err(|err| format_err!("bad cursor image: {}", err))?;

        let id = self.host.next_cursor;
        self.host.next_cursor += 1;
        self.host.pending_cursors.push((id, source));

        // Custom cursors are minted by the live event loop; one pump
        // materializes the request.
        self.pump();

        if self.host.cursors.contains_key(&id) {
            Ok(CursorHandle(id))
        } else {
            Err(format_err!("the host did not materialize the cursor"))
        }
    }

    fn set_cursor(&mut self, cursor: &CursorHandle) {
        let window = match self.host.window.as_ref() {
            Some(window) => window,
            None => return,
        };
        match self.host.cursors.get(&cursor.0) {
            Some(resource) => window.set_cursor(resource.clone()),
            None => warn!("set_cursor with an unknown cursor resource {}", cursor.0),
        }
    }

    fn delete_cursor(&mut self, cursor: CursorHandle) {
        if self.host.cursors.remove(&cursor.0).is_none() {
            warn!("cursor resource {} released twice", cursor.0);
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if let Some(window) = self.host.window.as_ref() {
            window.set_cursor_visible(visible);
        }
    }

    #[inline]
    fn cursor_position(&self) -> Vector2<i32> {
        self.host.mouse.position()
    }

    fn set_cursor_position(&mut self, position: Vector2<i32>) {
        if let Some(window) = self.host.window.as_ref() {
            let target = PhysicalPosition::new(position.x, position.y);
            if let Err(err) = window.set_cursor_position(target) {
                warn!("could not warp the cursor: {}", err);
                return;
            }
        }
        self.host.mouse.on_moved(position);
    }
}

/// The creation settings the host needs, copied out of `DeviceParams`.
struct CreationConfig {
    driver_type: DriverType,
    title: String,
    size: Vector2<u32>,
    bits: u8,
    depth_bits: u8,
    fullscreen: bool,
    vsync: bool,
    stereo: bool,
    double_buffer: bool,
    with_alpha: bool,
    antialias: u8,
}

struct GlState {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    display: Display,
}

/// The pump-side state. Field order doubles as release order: cursor
/// resources first, then the context and surface, then the window.
struct Host {
    cursors: HashMap<u64, Cursor>,
    gl: Option<GlState>,
    window: Option<Window>,

    config: CreationConfig,
    create_error: Option<::failure::Error>,
    close: bool,
    focused: bool,
    events: Vec<Event>,

    keymap: KeyMap,
    touches: TouchTracker<::winit::event::DeviceId>,
    mouse: MouseState,
    modifiers: ModifiersState,
    clock: Instant,

    next_cursor: u64,
    pending_cursors: Vec<(u64, CustomCursorSource)>,
}

impl Host {
    fn new(params: &DeviceParams) -> Self {
        let keymap = types::build_keymap();
        debug!("key map built with {} entries", keymap.len());

        Host {
            cursors: HashMap::new(),
            gl: None,
            window: None,
            config: CreationConfig {
                driver_type: params.driver_type,
                title: params.title.clone(),
                size: params.size,
                bits: params.bits,
                depth_bits: params.depth_bits,
                fullscreen: params.fullscreen,
                vsync: params.vsync,
                stereo: params.stereo,
                double_buffer: params.double_buffer,
                with_alpha: params.with_alpha,
                antialias: params.antialias,
            },
            create_error: None,
            close: false,
            focused: false,
            events: Vec::new(),
            keymap,
            touches: TouchTracker::new(),
            mouse: MouseState::new(ClickParams::default()),
            modifiers: ModifiersState::empty(),
            clock: Instant::now(),
            next_cursor: 0,
            pending_cursors: Vec::new(),
        }
    }

    #[inline]
    fn timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.clock.elapsed().as_millis() as u64)
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut attributes = Window::default_attributes()
            .with_title(self.config.title.as_str())
            .with_inner_size(PhysicalSize::new(self.config.size.x, self.config.size.y));
        if self.config.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let mut template = ConfigTemplateBuilder::new()
            .with_alpha_size(if self.config.with_alpha { 8 } else { 0 })
            .with_depth_size(self.config.depth_bits)
            .with_single_buffering(!self.config.double_buffer);
        if self.config.bits == 16 {
            template = template.with_buffer_type(ColorBufferType::Rgb {
                r_size: 5,
                g_size: 6,
                b_size: 5,
            });
        }
        if self.config.antialias > 1 {
            template = template.with_multisampling(self.config.antialias);
        }
        if self.config.stereo {
            template = template.with_stereoscopy(Some(true));
        }

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, pick_config)
            .map_err(|err| format_err!("could not create window: {}", err))?;
        let window = window.ok_or_else(|| format_err!("no window was created"))?;

        let raw_window_handle = window.window_handle().ok().map(|handle| handle.as_raw());
        let display = gl_config.display();

        let preferred = ContextAttributesBuilder::new()
            .with_context_api(context_api(self.config.driver_type))
            .build(raw_window_handle);
        let not_current = match unsafe { display.create_context(&gl_config, &preferred) } {
            Ok(context) => context,
            Err(err) => {
                // One retry with a higher baseline of the same API family.
                warn!(
                    "could not create the requested context profile ({}), \
                     retrying with a version 3 baseline",
                    err
                );
                let fallback = ContextAttributesBuilder::new()
                    .with_context_api(fallback_context_api(self.config.driver_type))
                    .build(raw_window_handle);
                unsafe { display.create_context(&gl_config, &fallback) }
                    .map_err(|err| format_err!("could not create context: {}", err))?
            }
        };

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
            .map_err(|err| format_err!("could not derive surface attributes: {}", err))?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|err| format_err!("could not create the window surface: {}", err))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|err| format_err!("could not make the context current: {}", err))?;

        let interval = if self.config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            warn!("could not set the swap interval: {}", err);
        }

        self.gl = Some(GlState {
            context,
            surface,
            display,
        });
        self.window = Some(window);
        self.focused = true;
        Ok(())
    }

    fn push_mouse(&mut self, action: MouseAction) {
        self.events.push(Event::Mouse(MouseEvent {
            action,
            position: self.mouse.position(),
            buttons: self.mouse.buttons(),
            shift: self.modifiers.shift_key(),
            control: self.modifiers.control_key(),
        }));
    }

    fn push_key(&mut self, key: Key, character: Option<char>, down: bool) {
        self.events.push(Event::Key(KeyEvent {
            key,
            character,
            down,
            shift: self.modifiers.shift_key(),
            control: self.modifiers.control_key(),
        }));
    }

    fn translate_key(&mut self, event: HostKeyEvent) {
        let key = match event.physical_key.to_scancode() {
            Some(native) => self.keymap.lookup(native),
            None => Key::Unknown,
        };
        let down = event.state == ElementState::Pressed;
        self.push_key(key, None, down);

        // Text content is carried independently of the key map, one
        // down/up pair per produced character.
        if down {
            if let Some(text) = event.text {
                for character in text.chars() {
                    self.push_key(Key::Unknown, Some(character), true);
                    self.push_key(Key::Unknown, Some(character), false);
                }
            }
        }
    }

    fn translate_touch(&mut self, touch: HostTouch) {
        let id = match touch.phase {
            HostTouchPhase::Started => self.touches.add(touch.device_id, touch.id),
            _ => self.touches.find(touch.device_id, touch.id),
        };
        // The count reported for an ending contact still includes it.
        let touched_count = self.touches.len();
        if let HostTouchPhase::Ended | HostTouchPhase::Cancelled = touch.phase {
            self.touches.remove(id);
        }

        self.events.push(Event::Touch(TouchEvent {
            id,
            phase: types::from_touch_phase(touch.phase),
            position: Vector2::new(touch.location.x as i32, touch.location.y as i32),
            touched_count,
        }));
    }

    fn translate(&mut self, event: HostWindowEvent) {
        match event {
            HostWindowEvent::CloseRequested | HostWindowEvent::Destroyed => self.close = true,

            HostWindowEvent::Focused(focused) => self.focused = focused,

            HostWindowEvent::Resized(size) => self.events.push(Event::WindowResized {
                size: Vector2::new(size.width, size.height),
            }),

            HostWindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),

            HostWindowEvent::CursorMoved { position, .. } => {
                self.mouse
                    .on_moved(Vector2::new(position.x as i32, position.y as i32));
                self.push_mouse(MouseAction::Moved);
            }

            HostWindowEvent::MouseInput { state, button, .. } => {
                let button = types::from_mouse_button(button);
                match state {
                    ElementState::Pressed => {
                        let now = self.timestamp();
                        let clicks = self.mouse.on_pressed(now, button);
                        self.push_mouse(MouseAction::Pressed(button));
                        match clicks {
                            2 => self.push_mouse(MouseAction::DoubleClick(button)),
                            3 => self.push_mouse(MouseAction::TripleClick(button)),
                            _ => {}
                        }
                    }
                    ElementState::Released => {
                        self.mouse.on_released(button);
                        self.push_mouse(MouseAction::Released(button));
                    }
                }
            }

            HostWindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                self.push_mouse(MouseAction::Wheel(delta));
            }

            HostWindowEvent::KeyboardInput { event, .. } => self.translate_key(event),

            HostWindowEvent::Touch(touch) => self.translate_touch(touch),

            _ => {}
        }
    }
}

impl ApplicationHandler<UserEvent> for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);

        if self.window.is_some() || self.create_error.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            error!("could not create the window or context: {}", err);
            self.create_error = Some(err);
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: HostWindowEvent) {
        self.translate(event);
    }

    fn user_event(&mut self, _: &ActiveEventLoop, event: UserEvent) {
        self.events.push(Event::User(event));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        for (id, source) in self.pending_cursors.drain(..) {
            let cursor = event_loop.create_custom_cursor(source);
            self.cursors.insert(id, Cursor::Custom(cursor));
        }
    }
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, candidate| {
            if candidate.num_samples() > best.num_samples() {
                candidate
            } else {
                best
            }
        })
        .expect("at least one framebuffer config matches the template")
}

fn context_api(driver_type: DriverType) -> ContextApi {
    match driver_type {
        DriverType::GlEs1 => ContextApi::Gles(Some(Version::new(1, 0))),
        DriverType::GlEs2 | DriverType::WebGl => ContextApi::Gles(Some(Version::new(2, 0))),
        _ => ContextApi::OpenGl(None),
    }
}

fn fallback_context_api(driver_type: DriverType) -> ContextApi {
    match driver_type {
        DriverType::GlEs1 | DriverType::GlEs2 | DriverType::WebGl => {
            ContextApi::Gles(Some(Version::new(3, 0)))
        }
        _ => ContextApi::OpenGl(Some(Version::new(3, 0))),
    }
}

mod pixel_buffer;
pub mod surface;

#[allow(unused_imports)]
pub use pixel_buffer::{BlendMode, PixelBuffer};
#[allow(unused_imports)]
pub use surface::{ResizeAdapter, SurfaceGeometry};

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::{MouseButton, MouseState};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    // Pressed-button bitmask carried across events: 1=primary, 2=secondary,
    // 4=auxiliary. Touch contact reports as the primary bit.
    button_mask: u32,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
}

/// Where a pointer event came from. Touch movement without contact is
/// dropped by the controls; mouse hover is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    PointerMove {
        x: f32,
        y: f32,
        buttons: u32,
        pressure: f32,
        kind: PointerKind,
    },
    PointerDown {
        x: f32,
        y: f32,
        buttons: u32,
        pressure: f32,
        kind: PointerKind,
    },
    PointerUp {
        x: f32,
        y: f32,
        buttons: u32,
        pressure: f32,
        kind: PointerKind,
    },
    /// Pointer left the window
    PointerLeave,
    /// The pointer stream was interrupted (window minimized, device lost)
    PointerCancel,
    FocusLost,
    /// Window size changed; displayed size in logical pixels
    Resized {
        width: u32,
        height: u32,
    },
}

impl Display {
    /// Create display with custom resolution and VSync settings
    /// vsync=true: locked to monitor refresh (typically 60fps)
    /// vsync=false: uncapped framerate for performance testing
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .allow_highdpi()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                canvas,
                event_pump,
                button_mask: 0,
            },
            texture_creator,
        ))
    }

    /// Window size in logical (displayed) pixels
    pub fn displayed_size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }

    /// Ratio of drawable pixels to displayed pixels (> 1 on high-DPI outputs)
    pub fn scale_factor(&self) -> f32 {
        let (logical_w, _) = self.canvas.window().size();
        let (drawable_w, _) = self.canvas.window().drawable_size();
        if logical_w == 0 {
            1.0
        } else {
            drawable_w as f32 / logical_w as f32
        }
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), String> {
        self.canvas
            .window_mut()
            .set_title(title)
            .map_err(|e| e.to_string())
    }

    pub fn present(
        &mut self,
        target: &mut RenderTarget,
        buffer: &PixelBuffer,
    ) -> Result<(), String> {
        target
            .texture
            .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Drain pending SDL events into the unified pointer event stream.
    /// Mouse and touch collapse to the same pointer payloads; window-level
    /// signals (leave, focus loss, minimize, resize) come through as their
    /// own variants.
    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let (win_w, win_h) = self.canvas.window().size();
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::MouseMotion {
                    mousestate, x, y, ..
                } => {
                    self.button_mask = button_mask(&mousestate);
                    events.push(InputEvent::PointerMove {
                        x: x as f32,
                        y: y as f32,
                        buttons: self.button_mask,
                        pressure: 0.0,
                        kind: PointerKind::Mouse,
                    });
                },
                Event::MouseButtonDown {
                    x, y, mouse_btn, ..
                } => {
                    self.button_mask |= button_bit(mouse_btn);
                    events.push(InputEvent::PointerDown {
                        x: x as f32,
                        y: y as f32,
                        buttons: self.button_mask,
                        pressure: 0.0,
                        kind: PointerKind::Mouse,
                    });
                },
                Event::MouseButtonUp {
                    x, y, mouse_btn, ..
                } => {
                    self.button_mask &= !button_bit(mouse_btn);
                    events.push(InputEvent::PointerUp {
                        x: x as f32,
                        y: y as f32,
                        buttons: self.button_mask,
                        pressure: 0.0,
                        kind: PointerKind::Mouse,
                    });
                },
                // Finger coordinates arrive normalized to the window
                Event::FingerDown { x, y, pressure, .. } => {
                    events.push(InputEvent::PointerDown {
                        x: x * win_w as f32,
                        y: y * win_h as f32,
                        buttons: 1,
                        pressure,
                        kind: PointerKind::Touch,
                    });
                },
                Event::FingerMotion { x, y, pressure, .. } => {
                    events.push(InputEvent::PointerMove {
                        x: x * win_w as f32,
                        y: y * win_h as f32,
                        buttons: 1,
                        pressure,
                        kind: PointerKind::Touch,
                    });
                },
                Event::FingerUp { x, y, .. } => {
                    events.push(InputEvent::PointerUp {
                        x: x * win_w as f32,
                        y: y * win_h as f32,
                        buttons: 0,
                        pressure: 0.0,
                        kind: PointerKind::Touch,
                    });
                },
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::Leave => events.push(InputEvent::PointerLeave),
                    WindowEvent::FocusLost => events.push(InputEvent::FocusLost),
                    WindowEvent::Minimized => events.push(InputEvent::PointerCancel),
                    WindowEvent::SizeChanged(w, h) => events.push(InputEvent::Resized {
                        width: w.max(0) as u32,
                        height: h.max(0) as u32,
                    }),
                    _ => {},
                },
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create render target with custom resolution
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self { texture })
    }
}

fn button_bit(btn: MouseButton) -> u32 {
    match btn {
        MouseButton::Left => 1,
        MouseButton::Right => 2,
        MouseButton::Middle => 4,
        _ => 0,
    }
}

fn button_mask(state: &MouseState) -> u32 {
    let mut mask = 0;
    if state.left() {
        mask |= 1;
    }
    if state.right() {
        mask |= 2;
    }
    if state.middle() {
        mask |= 4;
    }
    mask
}

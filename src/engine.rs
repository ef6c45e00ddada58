use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::audio::{AudioContext, SoundConfig};
use crate::input::InputState;
use crate::renderer::Renderer;
use crate::renderer::pipeline::SpriteVertex;
use crate::renderer::text::{TextVertex, generate_text_mesh};

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Self = Self([1.0, 1.0, 0.0, 1.0]);
    pub const GOLD: Self = Self([1.0, 0.84, 0.0, 1.0]);
    pub const BROWN: Self = Self([0.55, 0.27, 0.07, 1.0]);
    pub const TRANSPARENT: Self = Self([0.0, 0.0, 0.0, 0.0]);

    fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.0[0] as f64,
            g: self.0[1] as f64,
            b: self.0[2] as f64,
            a: self.0[3] as f64,
        }
    }
}

// ── Game trait ──────────────────────────────────────────────────────────────

pub trait Game {
    fn on_enter(&mut self, _engine: &mut Engine) {}
    fn update(&mut self, engine: &mut Engine);
    fn render(&mut self, engine: &mut Engine);
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine {
    /// GPU renderer — holds the WGPU surface, pipelines, and atlas textures.
    pub renderer: Renderer,
    /// Queued sprite vertices; cleared before each render.
    sprite_vertices: Vec<SpriteVertex>,
    /// Queued text vertices and indices; cleared before each render.
    text_vertices: Vec<TextVertex>,
    text_indices: Vec<u32>,
    dt: f32,
    tick: u64,
    /// Unified input state (keyboard and mouse).
    pub input: InputState,
    /// Set to `true` by `request_quit()`; the event loop exits after the current tick.
    pub(crate) quit_requested: bool,
    /// Audio subsystem for music and sound effects.
    pub audio: AudioContext,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn from_renderer(renderer: Renderer) -> Self {
        Self {
            renderer,
            sprite_vertices: Vec::new(),
            text_vertices: Vec::new(),
            text_indices: Vec::new(),
            dt: 0.0,
            tick: 0,
            input: InputState::new(),
            quit_requested: false,
            audio: AudioContext::new(),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn dt(&self) -> f32 { self.dt }
    pub fn tick(&self) -> u64 { self.tick }

    /// Current window size in pixels.
    pub fn window_size(&self) -> (f32, f32) {
        let size = self.renderer.window.inner_size();
        (size.width as f32, size.height as f32)
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.input.is_key_held(key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.input.is_key_pressed(key) }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.input.is_mouse_held(button) }
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool { self.input.is_mouse_pressed(button) }
    pub fn mouse_pos(&self) -> [f32; 2] { self.input.mouse_pos }

    /// Exit the event loop after the current tick finishes.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    // ── Drawing API ────────────────────────────────────────────────────────

    pub fn set_background(&mut self, color: Color) {
        self.renderer.set_clear_color(color.to_wgpu());
    }

    /// Pixel dimensions of a loaded sprite texture, or None when unknown.
    pub fn sprite_size(&self, name: &str) -> Option<(f32, f32)> {
        self.renderer.sprite_size(name)
    }

    /// Queue a sprite quad centred at `(x, y)` in window pixels (y-down),
    /// scaled uniformly.  Unknown sprite names are logged and skipped.
    pub fn draw_sprite(&mut self, name: &str, x: f32, y: f32, scale: f32, tint: Color) {
        let Some(atlas) = self.renderer.sprite_atlas.as_ref() else {
            return;
        };
        let Some(data) = atlas.sprites.get(name) else {
            eprintln!("[engine] unknown sprite '{name}'");
            return;
        };

        let half_w = data.pixel_w as f32 * scale / 2.0;
        let half_h = data.pixel_h as f32 * scale / 2.0;
        let (x0, y0) = (x - half_w, y - half_h);
        let (x1, y1) = (x + half_w, y + half_h);
        let [u0, v0] = data.uv_min;
        let [u1, v1] = data.uv_max;
        let tint = tint.0;

        // Two CCW triangles (Y-down): TL-TR-BL, TR-BR-BL.
        self.sprite_vertices.extend_from_slice(&[
            SpriteVertex { position: [x0, y0], uv: [u0, v0], tint },
            SpriteVertex { position: [x1, y0], uv: [u1, v0], tint },
            SpriteVertex { position: [x0, y1], uv: [u0, v1], tint },
            SpriteVertex { position: [x1, y0], uv: [u1, v0], tint },
            SpriteVertex { position: [x1, y1], uv: [u1, v1], tint },
            SpriteVertex { position: [x0, y1], uv: [u0, v1], tint },
        ]);
    }

    /// Queue a single line of text with its top-left corner at `(x, y)`.
    /// `font_size` is the glyph height in pixels.  No-op until a font loads.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        let Some(font) = self.renderer.font.as_ref() else {
            return;
        };
        let (verts, indices) = generate_text_mesh(text, font, [x, y], font_size, color.0);
        let base = self.text_vertices.len() as u32;
        self.text_vertices.extend(verts);
        self.text_indices.extend(indices.into_iter().map(|i| i + base));
    }

    /// Rendered pixel width of `text` at `font_size`; 0 until a font loads.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.renderer
            .font
            .as_ref()
            .map(|f| f.measure(text, font_size))
            .unwrap_or(0.0)
    }

    /// Play a loaded sound effect by name with a light pitch variation so
    /// repeated pickups do not sound machine-gun identical.
    pub fn play_sound(&mut self, name: &str) {
        self.audio.play(
            name,
            SoundConfig {
                pitch_variation: 0.05,
                ..SoundConfig::default()
            },
        );
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    target_ups: u32,
    sprite_folder: Option<String>,
    font: Option<(String, String)>,
    cursor_visible: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "coinchase".into(),
            width: 800,
            height: 600,
            target_ups: 60,
            sprite_folder: None,
            font: None,
            cursor_visible: true,
        }
    }
}

impl EngineBuilder {
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }
    pub fn with_ups(mut self, ups: u32) -> Self { self.target_ups = ups.max(1); self }

    /// Specify a directory to scan recursively for `.png` sprite files.
    /// The atlas is baked once at startup before the game loop begins.
    pub fn with_sprite_folder(mut self, path: &str) -> Self {
        self.sprite_folder = Some(path.to_string()); self
    }

    /// Load a bitmap font from an atlas PNG plus its glyph-map JSON.
    pub fn with_font(mut self, atlas_path: &str, glyphs_path: &str) -> Self {
        self.font = Some((atlas_path.to_string(), glyphs_path.to_string())); self
    }

    /// Hide the OS cursor over the window (the game draws its own pointer).
    pub fn hide_cursor(mut self) -> Self {
        self.cursor_visible = false; self
    }

    pub fn run(self, game: impl Game + 'static) {
        let event_loop = EventLoop::new().unwrap();
        let fixed_dt = 1.0 / self.target_ups as f32;
        let mut app = App {
            config: self,
            game: Box::new(game),
            engine: None,
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
        };
        event_loop.run_app(&mut app).unwrap();
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    engine: Option<Engine>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(&self.config.title)
                        .with_inner_size(winit::dpi::PhysicalSize::new(
                            self.config.width,
                            self.config.height,
                        ))
                        .with_resizable(false),
                )
                .unwrap(),
        );
        window.set_cursor_visible(self.config.cursor_visible);

        let mut renderer = pollster::block_on(Renderer::new(window));

        if let Some(folder) = &self.config.sprite_folder {
            renderer.load_sprite_folder(folder);
        }
        if let Some((atlas, glyphs)) = &self.config.font {
            renderer.load_font(atlas, glyphs);
        }

        let mut engine = Engine::from_renderer(renderer);
        self.game.on_enter(&mut engine);
        self.engine = Some(engine);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                engine.renderer.resize(size);
            }

            WindowEvent::CursorMoved { position, .. } => {
                engine.input.mouse_pos = [position.x as f32, position.y as f32];
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => {
                    if engine.input.mouse_held.insert(button) {
                        engine.input.mouse_pressed.insert(button);
                    }
                }
                ElementState::Released => {
                    engine.input.mouse_held.remove(&button);
                    engine.input.mouse_released.insert(button);
                }
            },

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                while self.accumulator >= self.fixed_dt {
                    engine.dt = self.fixed_dt;
                    engine.tick += 1;
                    self.game.update(engine);
                    if engine.quit_requested {
                        event_loop.exit();
                        return;
                    }
                    self.accumulator -= self.fixed_dt;
                }

                engine.sprite_vertices.clear();
                engine.text_vertices.clear();
                engine.text_indices.clear();
                self.game.render(engine);

                let sprite_verts = std::mem::take(&mut engine.sprite_vertices);
                let text_verts = std::mem::take(&mut engine.text_vertices);
                let text_indices = std::mem::take(&mut engine.text_indices);
                match engine.renderer.render(&sprite_verts, &text_verts, &text_indices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = engine.renderer.window.inner_size();
                        engine.renderer.resize(size);
                    }
                    Err(e) => eprintln!("render error: {e}"),
                }

                // Restore the queues so their capacity survives to the next frame.
                engine.sprite_vertices = sprite_verts;
                engine.text_vertices = text_verts;
                engine.text_indices = text_indices;

                engine.input.clear_frame_state();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if engine.input.keys_held.insert(code) {
                        engine.input.keys_pressed.insert(code);
                    }
                }
                ElementState::Released => {
                    engine.input.keys_held.remove(&code);
                    engine.input.keys_released.insert(code);
                }
            },

            _ => {}
        }
    }
}

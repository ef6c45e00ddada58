pub mod pipeline;
pub mod sprite_atlas;
pub mod text;
pub mod text_pipeline;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use pipeline::{SpritePipeline, SpriteVertex, create_sprite_pipeline, orthographic_projection};
use sprite_atlas::SpriteAtlas;
use text::{Font, TextVertex};
use text_pipeline::{TextPipeline, create_text_pipeline};

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprite_pipeline: SpritePipeline,
    text_pipeline: TextPipeline,
    /// Orthographic pixel-space projection shared by both pipelines.
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    /// Same buffer, bound through the text pipeline's layout.
    text_projection_bind_group: wgpu::BindGroup,
    /// Bind group for the sprite atlas (None until load_sprite_folder is called).
    atlas_bind_group: Option<wgpu::BindGroup>,
    pub(crate) sprite_atlas: Option<SpriteAtlas>,
    /// Bind group for the font atlas (None until load_font is called).
    font_bind_group: Option<wgpu::BindGroup>,
    pub(crate) font: Option<Font>,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window)).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .expect("no suitable GPU adapter found");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("failed to create device");

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sprite_pipeline = create_sprite_pipeline(&device, format);
        let text_pipeline = create_text_pipeline(&device, format);

        // ── Shared pixel-space projection buffer ──────────────────────────
        let proj = orthographic_projection(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &sprite_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let text_projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text_projection_bg"),
            layout: &text_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        Self {
            window,
            surface,
            device,
            queue,
            config,
            sprite_pipeline,
            text_pipeline,
            projection_buffer,
            projection_bind_group,
            text_projection_bind_group,
            atlas_bind_group: None,
            sprite_atlas: None,
            font_bind_group: None,
            font: None,
            clear_color: wgpu::Color::BLACK,
        }
    }

    /// Load all `.png` files from `path` (recursively) into the sprite atlas.
    /// Must be called once during initialisation, before the game loop starts.
    pub fn load_sprite_folder(&mut self, path: &str) {
        let atlas = SpriteAtlas::load_folder(&self.device, &self.queue, path);

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_atlas_bg"),
            layout: &self.sprite_pipeline.atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        });

        self.atlas_bind_group = Some(bind_group);
        self.sprite_atlas = Some(atlas);
    }

    /// Load the bitmap font from an atlas PNG and its char-keyed glyph JSON.
    /// Text drawing is a no-op until this succeeds.
    pub fn load_font(&mut self, atlas_path: &str, glyphs_path: &str) {
        let img = match image::open(atlas_path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                eprintln!("[font] failed to load atlas '{atlas_path}': {e}");
                return;
            }
        };

        let json = match std::fs::read_to_string(glyphs_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("[font] failed to read glyph map '{glyphs_path}': {e}");
                return;
            }
        };

        let (tex_w, tex_h) = img.dimensions();
        let font = match Font::from_atlas_json(&json, tex_w, tex_h) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[font] malformed glyph map '{glyphs_path}': {e}");
                return;
            }
        };

        let (texture_view, sampler) = SpriteAtlas::upload(&self.device, &self.queue, &img);

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("font_bg"),
            layout: &self.text_pipeline.font_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.font_bind_group = Some(bind_group);
        self.font = Some(font);
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Pixel dimensions of a loaded sprite, or None when unknown.
    pub fn sprite_size(&self, name: &str) -> Option<(f32, f32)> {
        let atlas = self.sprite_atlas.as_ref()?;
        let data = atlas.sprites.get(name)?;
        Some((data.pixel_w as f32, data.pixel_h as f32))
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let proj = orthographic_projection(new_size.width as f32, new_size.height as f32);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&proj));
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Render one frame: clear, sprite pass, then text on top.
    pub fn render(
        &mut self,
        sprite_verts: &[SpriteVertex],
        text_verts: &[TextVertex],
        text_indices: &[u32],
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            // ── Pass 1: sprites ────────────────────────────────────────────
            if !sprite_verts.is_empty() {
                if let Some(atlas_bg) = &self.atlas_bind_group {
                    let vbuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("sprite_vertex_buffer"),
                        contents: bytemuck::cast_slice(sprite_verts),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                    pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
                    pass.set_bind_group(0, &self.projection_bind_group, &[]);
                    pass.set_bind_group(1, atlas_bg, &[]);
                    pass.set_vertex_buffer(0, vbuf.slice(..));
                    pass.draw(0..sprite_verts.len() as u32, 0..1);
                }
            }

            // ── Pass 2: text overlay (always on top) ──────────────────────
            if !text_verts.is_empty() && !text_indices.is_empty() {
                if let Some(font_bg) = &self.font_bind_group {
                    let vbuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("text_vertex_buffer"),
                        contents: bytemuck::cast_slice(text_verts),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                    let ibuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("text_index_buffer"),
                        contents: bytemuck::cast_slice(text_indices),
                        usage: wgpu::BufferUsages::INDEX,
                    });
                    pass.set_pipeline(&self.text_pipeline.render_pipeline);
                    pass.set_bind_group(0, &self.text_projection_bind_group, &[]);
                    pass.set_bind_group(1, font_bg, &[]);
                    pass.set_vertex_buffer(0, vbuf.slice(..));
                    pass.set_index_buffer(ibuf.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..text_indices.len() as u32, 0, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

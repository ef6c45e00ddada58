use std::collections::HashMap;

use serde::Deserialize;

// ── TextVertex ────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextVertex {
    /// Screen-space position in pixels, y-down.
    pub position: [f32; 2],
    /// Normalised font-atlas texture coordinates in `[0, 1]`.
    pub uv: [f32; 2],
    /// Glyph color; the atlas stores white-on-transparent.
    pub color: [f32; 4],
}

impl TextVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

// ── Glyph / Font ─────────────────────────────────────────────────────────────

/// Pixel rectangle of one character inside the font atlas.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A bitmap font: a char-keyed glyph map over a single atlas texture.
///
/// Atlas dimensions are stored so vertex generation can normalise pixel
/// coordinates to UVs.  All glyphs advance by their own width (uniform-grid
/// atlas fonts).
pub struct Font {
    pub glyphs: HashMap<char, Glyph>,
    /// Vertical distance between successive baselines in pixels.
    pub line_height: u32,
    pub texture_width: u32,
    pub texture_height: u32,
}

impl Font {
    /// Deserialise a `Font` from the atlas JSON format, where each key is a
    /// single character and the value is a pixel rectangle:
    ///
    /// ```json
    /// { "A": { "x": 0, "y": 0, "w": 16, "h": 24 }, ... }
    /// ```
    pub fn from_atlas_json(
        json: &str,
        texture_width: u32,
        texture_height: u32,
    ) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct AtlasEntry {
            x: u32,
            y: u32,
            w: u32,
            h: u32,
        }

        let raw: HashMap<String, AtlasEntry> = serde_json::from_str(json)?;

        let line_height = raw.values().map(|e| e.h).max().unwrap_or(0);

        let glyphs = raw
            .into_iter()
            .filter_map(|(key, entry)| {
                // Only accept single-character keys.
                let mut chars = key.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Some((ch, Glyph { x: entry.x, y: entry.y, width: entry.w, height: entry.h }))
            })
            .collect();

        Ok(Self { glyphs, line_height, texture_width, texture_height })
    }

    /// Look up a character, falling back to its uppercase form.  The built-in
    /// atlas carries uppercase letters only.
    fn resolve(&self, ch: char) -> Option<&Glyph> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.glyphs.get(&ch.to_ascii_uppercase()))
    }

    /// Rendered pixel width of a single-line string at `font_size`.
    /// Characters with no glyph contribute nothing, matching the mesh.
    pub fn measure(&self, text: &str, font_size: f32) -> f32 {
        if self.line_height == 0 {
            return 0.0;
        }
        let scale = font_size / self.line_height as f32;
        text.chars()
            .filter_map(|ch| self.resolve(ch))
            .map(|g| g.width as f32 * scale)
            .sum()
    }
}

// ── generate_text_mesh ───────────────────────────────────────────────────────

/// Convert `text` into a flat vertex + index buffer.
///
/// Each renderable character produces 4 vertices and 6 indices (two
/// triangles, Y-axis pointing down).  `'\n'` resets the X cursor and
/// advances Y by one scaled line height; characters absent from the font
/// (after uppercase fallback) are silently skipped.  Returns empty buffers
/// when `font.line_height` is zero.
pub fn generate_text_mesh(
    text: &str,
    font: &Font,
    start_pos: [f32; 2],
    font_size: f32,
    color: [f32; 4],
) -> (Vec<TextVertex>, Vec<u32>) {
    if font.line_height == 0 {
        return (Vec::new(), Vec::new());
    }

    let scale = font_size / font.line_height as f32;
    let tw = font.texture_width as f32;
    let th = font.texture_height as f32;

    let mut vertices: Vec<TextVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let mut current_x = start_pos[0];
    let mut current_y = start_pos[1];

    for ch in text.chars() {
        if ch == '\n' {
            current_x = start_pos[0];
            current_y += font.line_height as f32 * scale;
            continue;
        }

        let Some(glyph) = font.resolve(ch) else {
            continue;
        };

        let quad_w = glyph.width as f32 * scale;
        let quad_h = glyph.height as f32 * scale;

        let uv_x0 = glyph.x as f32 / tw;
        let uv_y0 = glyph.y as f32 / th;
        let uv_x1 = (glyph.x + glyph.width) as f32 / tw;
        let uv_y1 = (glyph.y + glyph.height) as f32 / th;

        let base = vertices.len() as u32;

        // Corners in reading order: top-left, top-right, bottom-left, bottom-right.
        vertices.push(TextVertex { position: [current_x, current_y], uv: [uv_x0, uv_y0], color });
        vertices.push(TextVertex { position: [current_x + quad_w, current_y], uv: [uv_x1, uv_y0], color });
        vertices.push(TextVertex { position: [current_x, current_y + quad_h], uv: [uv_x0, uv_y1], color });
        vertices.push(TextVertex { position: [current_x + quad_w, current_y + quad_h], uv: [uv_x1, uv_y1], color });

        // Two CCW triangles (Y-down): TL-TR-BL, TR-BR-BL.
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);

        current_x += quad_w;
    }

    (vertices, indices)
}

use std::collections::{HashMap, HashSet};

use image::RgbaImage;
use wgpu::util::DeviceExt;

// ── SpriteData ───────────────────────────────────────────────────────────────

/// UV coordinates and pixel dimensions for a single named sprite.
#[derive(Clone, Debug)]
pub struct SpriteData {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// Unscaled width of the source image in pixels.
    pub pixel_w: u32,
    /// Unscaled height of the source image in pixels.
    pub pixel_h: u32,
}

// ── Shelf packing (pure, GPU-free) ───────────────────────────────────────────

/// One sprite's position inside the packed atlas.
#[derive(Debug, PartialEq)]
pub(crate) struct PlacedSprite {
    pub name: String,
    /// Top-left pixel coordinate inside the atlas.
    pub atlas_x: u32,
    pub atlas_y: u32,
    pub pixel_w: u32,
    pub pixel_h: u32,
}

/// Pure shelf-packing algorithm — no I/O, no GPU.
///
/// `items` is a slice of `(name, pixel_w, pixel_h)`.  Duplicate names are
/// skipped (only the first occurrence after the height sort is packed), and
/// sprites wider than `max_width` are skipped with a warning.
///
/// Returns `(placements, atlas_pixel_width, atlas_pixel_height)`; both atlas
/// dimensions are rounded up to the next power of two.
pub(crate) fn pack(items: &[(String, u32, u32)], max_width: u32) -> (Vec<PlacedSprite>, u32, u32) {
    // Sort by height descending for better shelf utilisation.
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].2.cmp(&items[a].2));

    let mut placed_names: HashSet<&str> = HashSet::new();
    let mut placements: Vec<PlacedSprite> = Vec::new();
    let mut cur_x = 0u32;
    let mut cur_y = 0u32;
    let mut row_h = 0u32;

    for &i in &order {
        let (ref name, w, h) = items[i];

        if !placed_names.insert(name.as_str()) {
            continue;
        }

        if w > max_width {
            eprintln!("[atlas] '{name}' is wider ({w}px) than the atlas ({max_width}px); skipping");
            continue;
        }

        if cur_x + w > max_width {
            // Start a new shelf.
            cur_y += row_h;
            cur_x = 0;
            row_h = 0;
        }

        placements.push(PlacedSprite {
            name: name.clone(),
            atlas_x: cur_x,
            atlas_y: cur_y,
            pixel_w: w,
            pixel_h: h,
        });
        cur_x += w;
        row_h = row_h.max(h);
    }

    let used_h = cur_y + row_h;
    let atlas_h = used_h.next_power_of_two().max(1);
    let atlas_w = max_width.next_power_of_two();
    (placements, atlas_w, atlas_h)
}

// ── SpriteAtlas ──────────────────────────────────────────────────────────────

pub struct SpriteAtlas {
    pub sprites: HashMap<String, SpriteData>,
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl SpriteAtlas {
    /// Maximum row width of the packed atlas texture in pixels.
    const ATLAS_WIDTH: u32 = 256;

    /// Scan `path` recursively for `.png` files, pack them with a shelf
    /// algorithm, upload to the GPU, and return a ready-to-use atlas.
    pub fn load_folder(device: &wgpu::Device, queue: &wgpu::Queue, path: &str) -> Self {
        // ── 1. Discover and decode PNG files ─────────────────────────────
        let mut loaded: Vec<(String, image::DynamicImage)> = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();

        for entry in walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match file_path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };

            // Only the first file with a given stem name is used.
            if !seen_names.insert(name.clone()) {
                eprintln!("[atlas] duplicate name '{}' from {:?}; skipping", name, file_path);
                continue;
            }

            match image::open(file_path) {
                Ok(img) => loaded.push((name, img)),
                Err(e) => eprintln!("[atlas] failed to load {:?}: {e}", file_path),
            }
        }

        if loaded.is_empty() {
            eprintln!("[atlas] no sprites found under '{path}'");
            return Self::empty(device, queue);
        }

        // ── 2. Pack (pure, no GPU) ───────────────────────────────────────
        let dims: Vec<(String, u32, u32)> = loaded
            .iter()
            .map(|(name, img)| (name.clone(), img.width(), img.height()))
            .collect();

        let (placements, atlas_w, atlas_h) = pack(&dims, Self::ATLAS_WIDTH);

        // ── 3. Composite into a single RGBA image ────────────────────────
        let mut atlas_img = RgbaImage::new(atlas_w, atlas_h);
        let img_lookup: HashMap<&str, &image::DynamicImage> =
            loaded.iter().map(|(n, i)| (n.as_str(), i)).collect();

        let mut sprites = HashMap::new();

        for p in &placements {
            // Always matches because `loaded` is deduplicated.
            let Some(img) = img_lookup.get(p.name.as_str()) else {
                continue;
            };
            let rgba = img.to_rgba8();

            for dy in 0..p.pixel_h {
                for dx in 0..p.pixel_w {
                    atlas_img.put_pixel(p.atlas_x + dx, p.atlas_y + dy, *rgba.get_pixel(dx, dy));
                }
            }

            let uv_min = [
                p.atlas_x as f32 / atlas_w as f32,
                p.atlas_y as f32 / atlas_h as f32,
            ];
            let uv_max = [
                (p.atlas_x + p.pixel_w) as f32 / atlas_w as f32,
                (p.atlas_y + p.pixel_h) as f32 / atlas_h as f32,
            ];

            sprites.insert(
                p.name.clone(),
                SpriteData { uv_min, uv_max, pixel_w: p.pixel_w, pixel_h: p.pixel_h },
            );
        }

        // ── 4. Upload to GPU ─────────────────────────────────────────────
        let (texture_view, sampler) = Self::upload(device, queue, &atlas_img);
        Self { sprites, texture_view, sampler }
    }

    /// 1×1 transparent atlas used when no sprites are available.
    fn empty(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let img = RgbaImage::new(1, 1);
        let (texture_view, sampler) = Self::upload(device, queue, &img);
        Self { sprites: HashMap::new(), texture_view, sampler }
    }

    pub(crate) fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &RgbaImage,
    ) -> (wgpu::TextureView, wgpu::Sampler) {
        let (w, h) = img.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("sprite_atlas_tex"),
                size: wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        (texture_view, sampler)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, w: u32, h: u32) -> (String, u32, u32) {
        (name.to_string(), w, h)
    }

    #[test]
    fn empty_input_produces_no_placements() {
        let (placements, atlas_w, atlas_h) = pack(&[], 256);
        assert!(placements.is_empty());
        assert_eq!(atlas_w, 256);
        assert_eq!(atlas_h, 1);
    }

    #[test]
    fn single_sprite_lands_at_origin() {
        let (pl, _, _) = pack(&[item("player", 32, 40)], 256);
        assert_eq!(pl.len(), 1);
        assert_eq!((pl[0].atlas_x, pl[0].atlas_y), (0, 0));
    }

    #[test]
    fn game_sprites_share_one_shelf() {
        // wolf (48), player (40), coin (24) all fit in one 256px row.
        let items = [item("player", 32, 40), item("coin", 24, 24), item("wolf", 48, 48)];
        let (pl, _, _) = pack(&items, 256);
        assert_eq!(pl.len(), 3);
        assert!(pl.iter().all(|p| p.atlas_y == 0));
        // Tallest first: wolf leads the shelf.
        assert_eq!(pl[0].name, "wolf");
    }

    #[test]
    fn row_overflow_starts_a_new_shelf() {
        let items = [item("a", 100, 16), item("b", 100, 16), item("c", 100, 16)];
        let (pl, _, _) = pack(&items, 256);
        let second_row: Vec<_> = pl.iter().filter(|p| p.atlas_y > 0).collect();
        assert_eq!(second_row.len(), 1);
        assert_eq!(second_row[0].atlas_y, 16, "new shelf starts below the previous row");
    }

    #[test]
    fn oversized_sprite_is_skipped() {
        let items = [item("banner", 300, 20), item("coin", 24, 24)];
        let (pl, _, _) = pack(&items, 256);
        assert_eq!(pl.len(), 1);
        assert_eq!(pl[0].name, "coin");
    }

    #[test]
    fn duplicate_name_is_packed_once() {
        let items = [item("coin", 24, 24), item("coin", 48, 48)];
        let (pl, _, _) = pack(&items, 256);
        assert_eq!(pl.len(), 1);
    }

    #[test]
    fn atlas_dimensions_are_powers_of_two() {
        let items = [item("a", 48, 48), item("b", 32, 40)];
        let (_, atlas_w, atlas_h) = pack(&items, 200);
        assert!(atlas_w.is_power_of_two());
        assert!(atlas_h.is_power_of_two());
    }

    #[test]
    fn placements_stay_inside_the_atlas() {
        let items: Vec<_> = (0..12).map(|i| item(&format!("s{i}"), 48, 24 + i)).collect();
        let (pl, atlas_w, atlas_h) = pack(&items, 128);
        for p in &pl {
            assert!(p.atlas_x + p.pixel_w <= atlas_w, "'{}' overflows x", p.name);
            assert!(p.atlas_y + p.pixel_h <= atlas_h, "'{}' overflows y", p.name);
        }
    }

    #[test]
    fn placements_never_overlap() {
        let items: Vec<_> = (0..8).map(|i| item(&format!("s{i}"), 60, 20)).collect();
        let (pl, _, _) = pack(&items, 128);
        for (i, a) in pl.iter().enumerate() {
            for b in pl.iter().skip(i + 1) {
                let apart_x = a.atlas_x + a.pixel_w <= b.atlas_x || b.atlas_x + b.pixel_w <= a.atlas_x;
                let apart_y = a.atlas_y + a.pixel_h <= b.atlas_y || b.atlas_y + b.pixel_h <= a.atlas_y;
                assert!(apart_x || apart_y, "'{}' overlaps '{}'", a.name, b.name);
            }
        }
    }
}

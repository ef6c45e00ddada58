use std::fs::File;
use std::io::Write;
use std::path::Path;

use image::{Rgba, RgbaImage};

// ── Sprites ──────────────────────────────────────────────────────────────────

fn draw_player(width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    let body = Rgba([0x3C, 0xB0, 0x43, 0xFF]);
    let dark = Rgba([0x1A, 0x55, 0x20, 0xFF]);
    let eye = Rgba([0x10, 0x10, 0x10, 0xFF]);

    // Rounded capsule body: skip the corners so it reads as a standing figure.
    for y in 0..height {
        for x in 0..width {
            let corner = (x < 3 || x >= width - 3) && (y < 4 || y >= height - 4);
            if !corner {
                img.put_pixel(x, y, body);
            }
        }
    }
    for x in 3..width - 3 {
        img.put_pixel(x, 0, dark);
        img.put_pixel(x, height - 1, dark);
    }
    for y in 4..height - 4 {
        img.put_pixel(0, y, dark);
        img.put_pixel(width - 1, y, dark);
    }
    // Two pixel eyes at ~1/3 height.
    let ey = height / 3;
    for ex in [width / 4, 3 * width / 4] {
        for dy in 0..2 {
            for dx in 0..2 {
                img.put_pixel(ex + dx, ey + dy, eye);
            }
        }
    }
    img
}

fn draw_coin(size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let gold = Rgba([0xF5, 0xC2, 0x18, 0xFF]);
    let rim = Rgba([0xA8, 0x7A, 0x00, 0xFF]);
    let shine = Rgba([0xFF, 0xF0, 0x90, 0xFF]);

    let c = size as i32 / 2;
    let r = c - 1;
    for y in 0..size {
        for x in 0..size {
            let dx = x as i32 - c;
            let dy = y as i32 - c;
            let d2 = dx * dx + dy * dy;
            if d2 <= r * r {
                let color = if d2 >= (r - 1) * (r - 1) { rim } else { gold };
                img.put_pixel(x, y, color);
            }
        }
    }
    // Off-centre highlight.
    for dy in 0..3 {
        for dx in 0..3 {
            img.put_pixel(size / 3 + dx, size / 3 + dy, shine);
        }
    }
    img
}

fn draw_wolf(size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let fur = Rgba([0x60, 0x60, 0x68, 0xFF]);
    let dark = Rgba([0x28, 0x28, 0x2E, 0xFF]);
    let eye = Rgba([0xE0, 0x30, 0x20, 0xFF]);

    // Head-on silhouette: narrow at the top, widening toward the muzzle.
    let h = size as i32;
    for y in 0..size {
        for x in 0..size {
            let half = (y as i32 * (h / 2)) / h + 4;
            let dx = (x as i32 - h / 2).abs();
            if dx <= half {
                let color = if dx >= half - 1 { dark } else { fur };
                img.put_pixel(x, y, color);
            }
        }
    }
    // Ears.
    for dy in 0..6u32 {
        for dx in 0..3u32 {
            img.put_pixel(size / 2 - 7 + dx, dy, dark);
            img.put_pixel(size / 2 + 5 + dx, dy, dark);
        }
    }
    // Eyes.
    let ey = size / 2;
    for dy in 0..2 {
        for dx in 0..2 {
            img.put_pixel(size / 2 - 6 + dx, ey + dy, eye);
            img.put_pixel(size / 2 + 5 + dx, ey + dy, eye);
        }
    }
    img
}

// ── Bitmap font ──────────────────────────────────────────────────────────────
//
// 5×7 pixel glyphs, scaled ×3 into 16×24 atlas cells, 16 columns per row.
// The glyph map JSON matches Font::from_atlas_json: char key → pixel rect.

const GLYPH_W: u32 = 5;
const GLYPH_SCALE: u32 = 3;
const CELL_W: u32 = 16;
const CELL_H: u32 = 24;
const ATLAS_COLS: u32 = 16;

/// Each glyph is 7 rows of 5 bits, bit 4 = leftmost pixel.
const FONT: &[(char, [u8; 7])] = &[
    ('A', [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
    ('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
    ('D', [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E]),
    ('E', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
    ('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
    ('G', [0x0E, 0x11, 0x10, 0x13, 0x11, 0x11, 0x0E]),
    ('H', [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('I', [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
    ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
    ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
    ('M', [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
    ('N', [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11]),
    ('O', [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
    ('Q', [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
    ('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
    ('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
    ('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
    ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
    ('X', [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
    ('Y', [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04]),
    ('Z', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
    ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
    ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
    ('3', [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
    ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
    ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
    ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
    ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
    ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    (':', [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]),
    ('-', [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
    ('!', [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]),
    ('?', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04]),
];

fn build_font_atlas() -> (RgbaImage, String) {
    let rows = (FONT.len() as u32).div_ceil(ATLAS_COLS);
    let mut img = RgbaImage::new(ATLAS_COLS * CELL_W, rows * CELL_H);
    let white = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

    let mut entries: Vec<String> = Vec::new();

    for (i, (ch, bitmap)) in FONT.iter().enumerate() {
        let cell_x = (i as u32 % ATLAS_COLS) * CELL_W;
        let cell_y = (i as u32 / ATLAS_COLS) * CELL_H;

        for (row, bits) in bitmap.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits >> (GLYPH_W - 1 - col) & 1 == 0 {
                    continue;
                }
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        img.put_pixel(
                            cell_x + col * GLYPH_SCALE + dx,
                            cell_y + row as u32 * GLYPH_SCALE + dy,
                            white,
                        );
                    }
                }
            }
        }

        // serde_json is not available to the build script; the format is flat
        // enough to emit by hand.  Every key is a single plain character, so
        // no escaping is needed.
        entries.push(format!(
            "  \"{}\": {{ \"x\": {}, \"y\": {}, \"w\": {}, \"h\": {} }}",
            ch, cell_x, cell_y, CELL_W, CELL_H
        ));
    }

    let json = format!("{{\n{}\n}}\n", entries.join(",\n"));
    (img, json)
}

// ── Sound effects ────────────────────────────────────────────────────────────

const SAMPLE_RATE: u32 = 22_050;

/// Minimal mono 16-bit PCM WAV writer.
fn write_wav(path: &str, samples: &[i16]) -> std::io::Result<()> {
    let data_len = (samples.len() * 2) as u32;
    let mut f = File::create(path)?;
    f.write_all(b"RIFF")?;
    f.write_all(&(36 + data_len).to_le_bytes())?;
    f.write_all(b"WAVE")?;
    f.write_all(b"fmt ")?;
    f.write_all(&16u32.to_le_bytes())?;
    f.write_all(&1u16.to_le_bytes())?; // PCM
    f.write_all(&1u16.to_le_bytes())?; // mono
    f.write_all(&SAMPLE_RATE.to_le_bytes())?;
    f.write_all(&(SAMPLE_RATE * 2).to_le_bytes())?; // byte rate
    f.write_all(&2u16.to_le_bytes())?; // block align
    f.write_all(&16u16.to_le_bytes())?; // bits per sample
    f.write_all(b"data")?;
    f.write_all(&data_len.to_le_bytes())?;
    for s in samples {
        f.write_all(&s.to_le_bytes())?;
    }
    Ok(())
}

/// Two short ascending blips — the classic pickup chirp.
fn coin_pickup_samples() -> Vec<i16> {
    let mut out = Vec::new();
    for (freq, secs) in [(880.0_f32, 0.07_f32), (1318.5, 0.11)] {
        let n = (SAMPLE_RATE as f32 * secs) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - i as f32 / n as f32;
            let s = (t * freq * std::f32::consts::TAU).sin() * env * 0.4;
            out.push((s * i16::MAX as f32) as i16);
        }
    }
    out
}

/// Downward-sweeping tone with a slow vibrato.
fn wolf_howl_samples() -> Vec<i16> {
    let secs = 0.8_f32;
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    let mut out = Vec::with_capacity(n);
    let mut phase = 0.0_f32;
    for i in 0..n {
        let t = i as f32 / n as f32;
        let freq = 550.0 - 280.0 * t + 18.0 * (t * 38.0).sin();
        phase += freq * std::f32::consts::TAU / SAMPLE_RATE as f32;
        let env = (1.0 - t) * (t * 14.0).min(1.0);
        out.push((phase.sin() * env * 0.35 * i16::MAX as f32) as i16);
    }
    out
}

// ── Entry ────────────────────────────────────────────────────────────────────

fn save_if_missing(path: &str, img: RgbaImage) {
    if !Path::new(path).exists() {
        img.save(path)
            .unwrap_or_else(|e| panic!("build: could not save {path}: {e}"));
    }
}

fn main() {
    for dir in ["resources/sprites", "resources/font", "resources/sounds"] {
        std::fs::create_dir_all(dir).expect("build: failed to create resources dirs");
    }

    save_if_missing("resources/sprites/player.png", draw_player(32, 40));
    save_if_missing("resources/sprites/coin.png", draw_coin(24));
    save_if_missing("resources/sprites/wolf.png", draw_wolf(48));

    let (atlas, glyph_json) = build_font_atlas();
    save_if_missing("resources/font/font_atlas.png", atlas);
    if !Path::new("resources/font/font_glyphs.json").exists() {
        std::fs::write("resources/font/font_glyphs.json", glyph_json)
            .expect("build: could not write font_glyphs.json");
    }

    if !Path::new("resources/sounds/coin_pickup.wav").exists() {
        write_wav("resources/sounds/coin_pickup.wav", &coin_pickup_samples())
            .expect("build: could not write coin_pickup.wav");
    }
    if !Path::new("resources/sounds/wolf_howl.wav").exists() {
        write_wav("resources/sounds/wolf_howl.wav", &wolf_howl_samples())
            .expect("build: could not write wolf_howl.wav");
    }

    println!("cargo:rerun-if-changed=build.rs");
}

pub mod audio;
pub mod config;
pub mod engine;
pub mod game;
pub mod input;
pub mod renderer;
pub mod schedule;
pub mod sprite;

/// Asset locations relative to the working directory.  Everything under
/// `resources/` is generated by the build script on first build.
pub const SPRITE_FOLDER: &str = "resources/sprites";
pub const FONT_ATLAS_PATH: &str = "resources/font/font_atlas.png";
pub const FONT_GLYPHS_PATH: &str = "resources/font/font_glyphs.json";
pub const SOUND_FOLDER: &str = "resources/sounds";

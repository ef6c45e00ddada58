use coinchase::config::{SAVE_PATH, SETTINGS_PATH, SaveData, Settings};
use coinchase::engine::Engine;
use coinchase::game::CoinGame;
use coinchase::{FONT_ATLAS_PATH, FONT_GLYPHS_PATH, SPRITE_FOLDER};

fn main() {
    let settings = Settings::load(SETTINGS_PATH);
    let save = SaveData::load(SAVE_PATH);

    let game = CoinGame::new(
        settings.window_width as f32,
        settings.window_height as f32,
        save.high_score,
    )
    .with_volume(settings.volume);

    Engine::builder()
        .with_title("Coin Chase")
        .with_size(settings.window_width, settings.window_height)
        .with_ups(60)
        .with_sprite_folder(SPRITE_FOLDER)
        .with_font(FONT_ATLAS_PATH, FONT_GLYPHS_PATH)
        .hide_cursor()
        .run(game);
}

//! Colors for game elements

/// Linear RGBA, 0-1 per channel
pub type Rgba = [f32; 4];

const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Drop alpha for light colors
pub const fn light(color: Rgba) -> [f32; 3] {
    [color[0], color[1], color[2]]
}

pub const RED: Rgba = rgb(180, 20, 20);
pub const GOLD: Rgba = rgb(255, 215, 0);
pub const WOOD: Rgba = rgb(101, 67, 33);
pub const SEAT: Rgba = rgb(60, 20, 20);
pub const SKIN: Rgba = rgb(255, 204, 170);
pub const WHITE: Rgba = rgb(255, 255, 255);
pub const BLACK: Rgba = rgb(20, 20, 20);
pub const FUR_LIGHT: Rgba = rgb(139, 69, 19);
pub const FUR_DARK: Rgba = rgb(101, 67, 33);
pub const ANTLER: Rgba = rgb(210, 180, 140);
pub const REINDEER_NOSE: Rgba = rgb(200, 0, 0);
pub const SNOW: Rgba = rgb(240, 240, 255);
pub const DEEP_SNOW: Rgba = rgb(200, 210, 230);
pub const CARROT: Rgba = rgb(255, 100, 0);
pub const LEAF: Rgba = rgb(30, 100, 30);
pub const GIFT_RED: Rgba = rgb(255, 50, 50);
pub const MOON: Rgba = rgb(255, 255, 240);
pub const STAR: Rgba = rgb(255, 220, 50);
pub const ICE: Rgba = rgb(0, 255, 255);
pub const ROCK: Rgba = [0.5, 0.5, 0.5, 1.0];
pub const MOUNTAIN_ROCK: Rgba = rgb(60, 55, 65);

pub const SANTA_RED: Rgba = rgb(214, 40, 40);
pub const SANTA_BELT: Rgba = rgb(30, 30, 30);
pub const SANTA_WHITE: Rgba = rgb(240, 240, 240);
pub const SANTA_BOOT: Rgba = rgb(20, 20, 20);

pub const BEAR_FUR: Rgba = rgb(245, 245, 255);
pub const BEAR_NOSE: Rgba = rgb(40, 40, 50);

/// Night sky
pub const BACKGROUND: Rgba = [0.05, 0.05, 0.2, 1.0];
/// Sky tint on a frame where the player took a hit
pub const HIT_FLASH: Rgba = [0.3, 0.05, 0.1, 1.0];

/// Reindeer nose glow while sledding
pub const NOSE_GLOW: [f32; 3] = [1.0, 0.8, 0.1];

use ab_glyph::{point, Font, FontRef, InvalidFont, OutlinedGlyph, PxScale, ScaleFont};
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

pub const TEXTURE_WIDTH: u32 = 512;
pub const TEXTURE_HEIGHT: u32 = 256;

const STRIPE_HALF_HEIGHT: i32 = 50;
const DISC_RADIUS: f32 = 40.0;
const NUMBER_EM_PX: f32 = 50.0;

const WHITE: [u8; 3] = [0xFF, 0xFF, 0xFF];
const BLACK: [u8; 3] = [0x00, 0x00, 0x00];

const PALETTE: [[u8; 3]; 16] = [
    WHITE,              // cue
    [0xFF, 0xC1, 0x07], // yellow
    [0x03, 0xA9, 0xF4], // blue
    [0xF4, 0x43, 0x36], // red
    [0x9C, 0x27, 0xB0], // purple
    [0xFF, 0x98, 0x00], // orange
    [0x4C, 0xAF, 0x50], // green
    [0x79, 0x55, 0x48], // maroon
    BLACK,              // eight
    [0xFF, 0xC1, 0x07],
    [0x03, 0xA9, 0xF4],
    [0xF4, 0x43, 0x36],
    [0x9C, 0x27, 0xB0],
    [0xFF, 0x98, 0x00],
    [0x4C, 0xAF, 0x50],
    [0x79, 0x55, 0x48],
];

static BALL_FONT_DATA: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BallStyle {
    Cue,
    Solid,
    Stripe,
}

impl BallStyle {
    pub fn for_number(number: usize) -> Self {
        match number {
            0 => BallStyle::Cue,
            1..=8 => BallStyle::Solid,
            _ => BallStyle::Stripe,
        }
    }
}

pub fn ball_rgb(number: usize) -> [u8; 3] {
    PALETTE[number % PALETTE.len()]
}

/// Bold face used for the numbers printed on the balls.
#[derive(Clone, Debug)]
pub struct BallFont(FontRef<'static>);

impl BallFont {
    pub fn load() -> Result<Self, InvalidFont> {
        FontRef::try_from_slice(BALL_FONT_DATA).map(Self)
    }

    /// `PxScale` covers ascent to descent, so convert from an em size.
    fn em_scale(&self, em_px: f32) -> PxScale {
        match self.0.units_per_em() {
            Some(upem) if upem > 0.0 => PxScale::from(em_px * self.0.height_unscaled() / upem),
            _ => PxScale::from(em_px),
        }
    }

    fn outline(&self, label: &str, em_px: f32) -> Vec<OutlinedGlyph> {
        let scale = self.em_scale(em_px);
        let scaled = self.0.as_scaled(scale);
        let mut caret = 0.0;
        let mut glyphs = Vec::new();
        for ch in label.chars() {
            let id = self.0.glyph_id(ch);
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            if let Some(outlined) = self.0.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
        }
        glyphs
    }
}

/// Equirectangular face for ball `number`: base fill, stripe band, number disc.
///
/// Without a font the disc is left blank.
pub fn texture_rgba(number: usize, font: Option<&BallFont>) -> Vec<u8> {
    let style = BallStyle::for_number(number);
    let color = ball_rgb(number);
    let base = if style == BallStyle::Solid { color } else { WHITE };

    let w = TEXTURE_WIDTH as i32;
    let h = TEXTURE_HEIGHT as i32;
    let cx = w / 2;
    let cy = h / 2;

    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let mut px = base;
            if style == BallStyle::Stripe
                && y >= cy - STRIPE_HALF_HEIGHT
                && y < cy + STRIPE_HALF_HEIGHT
            {
                px = color;
            }
            if style != BallStyle::Cue {
                let dx = (x - cx) as f32;
                let dy = (y - cy) as f32;
                if dx * dx + dy * dy <= DISC_RADIUS * DISC_RADIUS {
                    px = WHITE;
                }
            }
            data.extend_from_slice(&[px[0], px[1], px[2], 0xFF]);
        }
    }

    if let (Some(font), true) = (font, style != BallStyle::Cue) {
        stamp_label(&mut data, font, &number.to_string(), Vec2::new(cx as f32, cy as f32));
    }
    data
}

/// Darkens `data` by glyph coverage, with the ink box centred on `center`.
fn stamp_label(data: &mut [u8], font: &BallFont, label: &str, center: Vec2) {
    let glyphs = font.outline(label, NUMBER_EM_PX);
    let Some(first) = glyphs.first() else {
        return;
    };
    let mut min = first.px_bounds().min;
    let mut max = first.px_bounds().max;
    for g in &glyphs[1..] {
        let b = g.px_bounds();
        min.x = min.x.min(b.min.x);
        min.y = min.y.min(b.min.y);
        max.x = max.x.max(b.max.x);
        max.y = max.y.max(b.max.y);
    }
    let shift_x = (center.x - (min.x + max.x) / 2.0).round() as i32;
    let shift_y = (center.y - (min.y + max.y) / 2.0).round() as i32;

    let w = TEXTURE_WIDTH as i32;
    let h = TEXTURE_HEIGHT as i32;
    for g in &glyphs {
        let b = g.px_bounds();
        let left = b.min.x as i32 + shift_x;
        let top = b.min.y as i32 + shift_y;
        g.draw(|gx, gy, coverage| {
            let x = left + gx as i32;
            let y = top + gy as i32;
            if x < 0 || y < 0 || x >= w || y >= h {
                return;
            }
            let keep = 1.0 - coverage.clamp(0.0, 1.0);
            let i = ((y * w + x) * 4) as usize;
            for channel in &mut data[i..i + 3] {
                *channel = (f32::from(*channel) * keep).round() as u8;
            }
        });
    }
}

pub fn ball_image(number: usize, font: Option<&BallFont>) -> Image {
    Image::new(
        Extent3d {
            width: TEXTURE_WIDTH,
            height: TEXTURE_HEIGHT,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        texture_rgba(number, font),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

pub fn ball_material(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        metallic: 0.1,
        perceptual_roughness: 0.2,
        ..default()
    }
}

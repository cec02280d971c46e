// Canvas drawing for one engine frame.
use rand::Rng;
use web_sys::CanvasRenderingContext2d;

use super::sprites::BrandSprites;
use crate::game::Engine;

const BACKGROUND: &str = "#111";
const HEAD: &str = "#ccff00";
const BODY: &str = "#fff";
const FOOD_BACKDROP: &str = "#ffffff";
const FOOD_PLACEHOLDER: &str = "#ccff00";
// Gap between body segments, in pixels.
const SEGMENT_GAP: f64 = 2.0;

pub fn draw<R: Rng>(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    engine: &Engine<R>,
    sprites: &BrandSprites,
) {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);

    let cell = engine.grid().map_or(engine.config().cell_size, |g| g.cell_size) as f64;

    for (i, seg) in engine.snake().iter().enumerate() {
        ctx.set_fill_style_str(if i == 0 { HEAD } else { BODY });
        let side = cell - SEGMENT_GAP;
        ctx.fill_rect(seg.x as f64 * cell, seg.y as f64 * cell, side, side);
    }

    if let Some(food) = engine.food() {
        let fx = food.position.x as f64 * cell;
        let fy = food.position.y as f64 * cell;
        ctx.set_fill_style_str(FOOD_BACKDROP);
        ctx.fill_rect(fx, fy, cell, cell);
        let drawn = sprites.ready(food.brand).is_some_and(|img| {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(img, fx, fy, cell, cell)
                .is_ok()
        });
        if !drawn {
            ctx.set_fill_style_str(FOOD_PLACEHOLDER);
            ctx.fill_rect(fx, fy, cell, cell);
        }
    }
}

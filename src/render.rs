//! Per-frame drawing of the cached snapshot and the placement preview.
//! Pure with respect to its inputs: no awaits, no state writes, and a missing
//! sprite never fails a frame (coloured disk + element glyph instead).

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::assets::{AssetSource, BACKGROUND_KEY, ImageCache, sprite_key};
use crate::model::{Enemy, GameSnapshot, Unit};
use crate::state::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::util::short_label;

const UNIT_SIZE: f64 = 40.0;
const ENEMY_SIZE: f64 = 35.0;
const PREVIEW_RADIUS: f64 = 40.0;
const PREVIEW_ARM: f64 = 50.0;
/// Narrowest visible health fill, in logical px.
const MIN_BAR_SLIVER: f64 = 2.0;
/// Enemies above this line still show where they are headed.
const ENEMY_PATH_CUTOFF_Y: f64 = LOGICAL_HEIGHT - 200.0;
const ENEMY_PATH_END_Y: f64 = LOGICAL_HEIGHT - 150.0;

/// Drawing surface in logical battlefield coordinates.
pub trait Painter {
    fn clear(&self);
    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str, width: f64);
    fn vertical_gradient(&self, top: &str, bottom: &str);
    fn fill_circle(&self, x: f64, y: f64, r: f64, color: &str);
    fn stroke_circle(&self, x: f64, y: f64, r: f64, color: &str, width: f64, dash: &[f64]);
    fn line(&self, from: (f64, f64), to: (f64, f64), color: &str, width: f64, dash: &[f64]);
    fn triangle(&self, a: (f64, f64), b: (f64, f64), c: (f64, f64), color: &str);
    /// Centred on `x`, baseline at `y`.
    fn text(&self, x: f64, y: f64, text: &str, font: &str, color: &str, shadow: bool);
    fn set_alpha(&self, alpha: f64);
    /// Only called after the asset source reported `key` ready.
    fn sprite(&self, key: &str, x: f64, y: f64, w: f64, h: f64);
}

/// Everything one frame depends on.
pub struct Frame<'a> {
    pub snapshot: Option<&'a GameSnapshot>,
    pub pending_x: Option<f64>,
    pub preview_y: f64,
    pub now_ms: f64,
}

pub fn render_frame(p: &dyn Painter, assets: &dyn AssetSource, frame: &Frame) {
    p.clear();
    draw_background(p, assets);
    if let Some(snap) = frame.snapshot {
        for unit in &snap.field {
            draw_unit(p, assets, unit, snap, frame.now_ms);
        }
        for enemy in &snap.enemies {
            draw_enemy(p, assets, enemy);
        }
    }
    if let Some(x) = frame.pending_x {
        draw_preview(p, x, frame.preview_y);
    }
}

fn draw_background(p: &dyn Painter, assets: &dyn AssetSource) {
    if assets.is_ready(BACKGROUND_KEY) {
        p.sprite(BACKGROUND_KEY, 0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT);
    } else {
        p.vertical_gradient("#2c3e50", "#34495e");
    }
}

pub fn draw_health_bar(
    p: &dyn Painter,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    fraction: f64,
    bg: &str,
    fg: &str,
) {
    p.fill_rect(x, y, w, h, bg);
    let filled = (w * fraction.clamp(0.0, 1.0)).max(MIN_BAR_SLIVER);
    p.fill_rect(x, y, filled, h, fg);
    p.stroke_rect(x, y, w, h, "#111", 1.0);
}

fn draw_fallback_token(p: &dyn Painter, x: f64, y: f64, size: f64, color: &str, glyph: &str) {
    p.fill_circle(x, y, size / 2.0, color);
    p.stroke_circle(x, y, size / 2.0, "#333", 2.0, &[]);
    p.text(
        x,
        y + size / 4.0,
        glyph,
        &format!("{}px Arial", size / 2.0),
        "#fff",
        false,
    );
}

fn draw_unit(p: &dyn Painter, assets: &dyn AssetSource, unit: &Unit, snap: &GameSnapshot, now_ms: f64) {
    let (x, y) = unit.position();
    let size = UNIT_SIZE;
    let key = sprite_key(&unit.name);
    if assets.is_ready(&key) {
        if unit.is_advancing() {
            // Trailing ghost while walking.
            p.set_alpha(0.3);
            p.sprite(&key, x - size / 2.0 - 3.0, y - size / 2.0 - 3.0, size, size);
            p.set_alpha(1.0);
        }
        if unit.reached_enemy_base {
            p.set_alpha((now_ms / 300.0).sin() * 0.1 + 0.9);
        }
        p.sprite(&key, x - size / 2.0, y - size / 2.0, size, size);
        p.set_alpha(1.0);
    } else {
        draw_fallback_token(p, x, y, size, unit.element.color(), unit.element.glyph());
    }

    p.text(
        x,
        y + size + 15.0,
        &short_label(&unit.name, 10),
        "bold 12px Arial",
        "#fff",
        true,
    );

    if unit.reached_enemy_base {
        p.text(x, y + size + 30.0, "⚔️ Base", "bold 10px Arial", "#ff0000", false);
        p.set_alpha((now_ms / 200.0).sin() * 0.5 + 0.5);
        p.fill_circle(x, y, size / 2.0 + 2.0, "rgba(255, 0, 0, 0.3)");
        p.set_alpha(1.0);
    }

    let bar_y = y - size - 15.0;
    draw_health_bar(p, x - 30.0, bar_y, 60.0, 8.0, unit.health_fraction(), "#333", "#ff0000");

    if unit.is_advancing() {
        p.fill_circle(x + size / 2.0 + 5.0, bar_y - 5.0, 4.0, "#ffd700");
        p.triangle(
            (x, y - size / 2.0 - 10.0),
            (x - 5.0, y - size / 2.0 - 20.0),
            (x + 5.0, y - size / 2.0 - 20.0),
            "#ffd700",
        );
    }

    if !unit.reached_enemy_base {
        if let Some(target) = unit.target.and_then(|id| snap.enemy(id)) {
            p.line((x, y), target.position(), "#ff4500", 1.5, &[3.0, 3.0]);
        }
    }
}

fn draw_enemy(p: &dyn Painter, assets: &dyn AssetSource, enemy: &Enemy) {
    let (x, y) = enemy.position();
    let size = ENEMY_SIZE;
    let key = sprite_key(&enemy.name);
    if assets.is_ready(&key) {
        p.sprite(&key, x - size / 2.0, y - size / 2.0, size, size);
    } else {
        draw_fallback_token(p, x, y, size, "#dc3545", "👾");
    }

    p.text(
        x,
        y + size + 10.0,
        &short_label(&enemy.name, 8),
        "bold 11px Arial",
        "#fff",
        true,
    );

    draw_health_bar(
        p,
        x - 25.0,
        y - size - 10.0,
        50.0,
        6.0,
        enemy.health_fraction(),
        "#ff6b6b",
        "#ffc107",
    );

    if y < ENEMY_PATH_CUTOFF_Y {
        let tip = y + size / 2.0 + 5.0;
        p.triangle((x, tip), (x - 4.0, tip - 10.0), (x + 4.0, tip - 10.0), "#fff");
        p.line(
            (x, tip),
            (x, ENEMY_PATH_END_Y),
            "rgba(255, 255, 255, 0.3)",
            1.0,
            &[2.0, 2.0],
        );
    }
}

fn draw_preview(p: &dyn Painter, x: f64, y: f64) {
    p.stroke_circle(x, y, PREVIEW_RADIUS, "#00ff00", 3.0, &[5.0, 5.0]);
    let arm_color = "rgba(0, 255, 0, 0.5)";
    p.line((x, y - PREVIEW_ARM), (x, y + PREVIEW_ARM), arm_color, 1.0, &[]);
    p.line((x - PREVIEW_ARM, y), (x + PREVIEW_ARM, y), arm_color, 1.0, &[]);
    p.text(
        x,
        y - 60.0,
        &format!("Position: {x}"),
        "14px Arial",
        "#00ff00",
        false,
    );
}

/// `Painter` over a 2D canvas context whose backing store is the logical size.
pub struct CanvasPainter<'a> {
    pub ctx: &'a CanvasRenderingContext2d,
    pub images: &'a ImageCache,
}

impl CanvasPainter<'_> {
    fn set_dash(&self, dash: &[f64]) {
        let segments = js_sys::Array::new();
        for d in dash {
            segments.push(&JsValue::from_f64(*d));
        }
        let _ = self.ctx.set_line_dash(&segments);
    }
}

impl Painter for CanvasPainter<'_> {
    fn clear(&self) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.clear_rect(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT);
    }

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn vertical_gradient(&self, top: &str, bottom: &str) {
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, LOGICAL_HEIGHT);
        let _ = gradient.add_color_stop(0.0, top);
        let _ = gradient.add_color_stop(1.0, bottom);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT);
    }

    fn fill_circle(&self, x: f64, y: f64, r: f64, color: &str) {
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(color);
        self.ctx.arc(x, y, r, 0.0, PI * 2.0).ok();
        self.ctx.fill();
    }

    fn stroke_circle(&self, x: f64, y: f64, r: f64, color: &str, width: f64, dash: &[f64]) {
        self.set_dash(dash);
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.arc(x, y, r, 0.0, PI * 2.0).ok();
        self.ctx.stroke();
        self.set_dash(&[]);
    }

    fn line(&self, from: (f64, f64), to: (f64, f64), color: &str, width: f64, dash: &[f64]) {
        self.set_dash(dash);
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
        self.set_dash(&[]);
    }

    fn triangle(&self, a: (f64, f64), b: (f64, f64), c: (f64, f64), color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(a.0, a.1);
        self.ctx.line_to(b.0, b.1);
        self.ctx.line_to(c.0, c.1);
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn text(&self, x: f64, y: f64, text: &str, font: &str, color: &str, shadow: bool) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.set_text_align("center");
        if shadow {
            self.ctx.set_shadow_color("rgba(0, 0, 0, 0.8)");
            self.ctx.set_shadow_blur(4.0);
        }
        self.ctx.fill_text(text, x, y).ok();
        if shadow {
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn set_alpha(&self, alpha: f64) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
    }

    fn sprite(&self, key: &str, x: f64, y: f64, w: f64, h: f64) {
        if let Some(img) = self.images.ready(key) {
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
                .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;
    use crate::test_support::{FixedAssets, Op, RecordingPainter};

    fn frame(snapshot: Option<&GameSnapshot>, pending_x: Option<f64>) -> Frame<'_> {
        Frame {
            snapshot,
            pending_x,
            preview_y: 450.0,
            now_ms: 1234.0,
        }
    }

    fn unit(name: &str) -> Unit {
        Unit {
            id: 1,
            name: name.to_string(),
            x: Some(200.0),
            y: Some(450.0),
            current_health: Some(30.0),
            max_health: Some(60.0),
            element: Element::Water,
            ..Default::default()
        }
    }

    fn enemy(id: u64) -> Enemy {
        Enemy {
            id,
            name: "Rattata".into(),
            x: Some(300.0),
            y: Some(120.0),
            current_health: Some(10.0),
            health: Some(40.0),
        }
    }

    #[test]
    fn empty_frame_draws_only_background() {
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::none(), &frame(None, None));
        let ops = p.ops();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[1], Op::Gradient));
    }

    #[test]
    fn ready_background_is_drawn_as_sprite() {
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::with(&[BACKGROUND_KEY]), &frame(None, None));
        assert!(p.ops().contains(&Op::Sprite(BACKGROUND_KEY.to_string())));
    }

    #[test]
    fn missing_art_falls_back_to_element_disk_and_glyph() {
        let snap = GameSnapshot {
            field: vec![unit("Squirtle")],
            ..Default::default()
        };
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::none(), &frame(Some(&snap), None));
        let ops = p.ops();
        assert!(ops.iter().all(|op| !matches!(op, Op::Sprite(_))));
        assert!(ops.contains(&Op::FillCircle(Element::Water.color().to_string())));
        assert!(ops.contains(&Op::Text(Element::Water.glyph().to_string())));
    }

    #[test]
    fn ready_art_is_looked_up_by_lowercase_name() {
        let snap = GameSnapshot {
            field: vec![unit("Squirtle")],
            ..Default::default()
        };
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::with(&["squirtle"]), &frame(Some(&snap), None));
        assert!(p.ops().contains(&Op::Sprite("squirtle".to_string())));
    }

    #[test]
    fn health_bar_fill_is_clipped_with_minimum_sliver() {
        let p = RecordingPainter::default();
        draw_health_bar(&p, 0.0, 0.0, 60.0, 8.0, 0.5, "bg", "fg");
        draw_health_bar(&p, 0.0, 0.0, 60.0, 8.0, 0.0, "bg", "fg");
        draw_health_bar(&p, 0.0, 0.0, 60.0, 8.0, 3.0, "bg", "fg");
        let fills: Vec<f64> = p
            .ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::FillRect { w, color } if color == "fg" => Some(w),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![30.0, MIN_BAR_SLIVER, 60.0]);
    }

    #[test]
    fn target_line_only_when_target_still_present() {
        let mut u = unit("Squirtle");
        u.target = Some(5);
        let with_target = GameSnapshot {
            field: vec![u.clone()],
            enemies: vec![enemy(5)],
            ..Default::default()
        };
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::none(), &frame(Some(&with_target), None));
        assert!(p.ops().contains(&Op::Line("#ff4500".into())));

        let gone = GameSnapshot {
            field: vec![u],
            enemies: vec![enemy(6)],
            ..Default::default()
        };
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::none(), &frame(Some(&gone), None));
        assert!(!p.ops().contains(&Op::Line("#ff4500".into())));
    }

    #[test]
    fn moving_and_base_indicators() {
        let mut walking = unit("Abra");
        walking.is_moving = true;
        let mut arrived = unit("Machop");
        arrived.is_moving = true;
        arrived.reached_enemy_base = true;
        let snap = GameSnapshot {
            field: vec![walking, arrived],
            ..Default::default()
        };
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::none(), &frame(Some(&snap), None));
        let ops = p.ops();
        let gold_markers = ops
            .iter()
            .filter(|op| **op == Op::Triangle("#ffd700".into()))
            .count();
        assert_eq!(gold_markers, 1);
        assert!(ops.contains(&Op::Text("⚔️ Base".into())));
    }

    #[test]
    fn enemies_near_base_have_no_path_indicator() {
        let mut low = enemy(1);
        low.y = Some(ENEMY_PATH_CUTOFF_Y + 10.0);
        let snap = GameSnapshot {
            enemies: vec![enemy(2), low],
            ..Default::default()
        };
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::none(), &frame(Some(&snap), None));
        let paths = p
            .ops()
            .iter()
            .filter(|op| **op == Op::Line("rgba(255, 255, 255, 0.3)".into()))
            .count();
        assert_eq!(paths, 1);
    }

    #[test]
    fn preview_drawn_only_while_pending() {
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::none(), &frame(None, Some(400.0)));
        assert!(p.ops().contains(&Op::Text("Position: 400".into())));
        let p = RecordingPainter::default();
        render_frame(&p, &FixedAssets::none(), &frame(None, None));
        assert!(!p.ops().iter().any(|op| matches!(op, Op::StrokeCircle { .. })));
    }
}

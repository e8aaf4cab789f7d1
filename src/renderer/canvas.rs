//! Particle overlay on a 2D canvas

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::accent_rgba;
use crate::engine::{Sprite, ViewportSize};
use crate::error::{PortfolioError, PortfolioResult};

pub struct ParticleCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: ViewportSize,
}

impl ParticleCanvas {
    pub fn new(canvas: HtmlCanvasElement) -> PortfolioResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| PortfolioError::render(format!("get_context failed: {:?}", e)))?
            .ok_or_else(|| PortfolioError::render("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PortfolioError::render("context is not 2d"))?;
        Ok(Self {
            canvas,
            ctx,
            size: ViewportSize::new(0.0, 0.0),
        })
    }

    /// Match the backing store to the viewport at the device pixel ratio
    pub fn resize(&mut self, size: ViewportSize, dpr: f64) {
        self.size = size;
        self.canvas.set_width((f64::from(size.width) * dpr) as u32);
        self.canvas.set_height((f64::from(size.height) * dpr) as u32);
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
    }

    pub fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.size.width),
            f64::from(self.size.height),
        );
    }

    pub fn draw(&self, sprites: &[Sprite]) {
        self.clear();
        for sprite in sprites {
            if sprite.alpha <= 0.0 {
                continue;
            }
            self.ctx.set_fill_style_str(&accent_rgba(sprite.alpha));
            self.ctx.begin_path();
            self.ctx
                .arc(
                    f64::from(sprite.center.x),
                    f64::from(sprite.center.y),
                    f64::from(sprite.radius),
                    0.0,
                    std::f64::consts::TAU,
                )
                .ok();
            self.ctx.fill();
        }
    }
}

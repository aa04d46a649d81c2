//! Stacked wave layers.
//!
//! Every layer is an open spline across a fixed 1000 x 1000 view box, closed
//! off along the bottom edge so it can be filled. Layer `i` sits `spacing`
//! units above layer `i - 1`; amplitude and frequency grow a little with each
//! layer and a per-layer phase offset keeps them moving out of step.

use glam::Vec2;
use tracing::trace;

use crate::color::{ColorRamp, Rgb};
use crate::params::WaveParams;
use crate::spline::{self, Path};
use crate::time::{Clock, TickContext};

/// Width and height of the wave view box.
pub const VIEW_BOX: f32 = 1000.0;

/// Control points per layer.
pub const POINTS_PER_LAYER: usize = 12;

/// Clock step per tick per unit of motion speed.
pub const SPEED_STEP: f32 = 0.001;

/// Control points for layer `layer` at `time`, left to right.
///
/// `params` is clamped first.
pub fn generate(time: f32, layer: u32, params: &WaveParams) -> Vec<Vec2> {
    let params = params.clamped();
    let i = layer as f32;
    let spacing_x = VIEW_BOX / (POINTS_PER_LAYER - 1) as f32;

    let y_base = VIEW_BOX - i * params.spacing - params.base_height;
    let amplitude = params.height * (0.6 + i * 0.1);
    let frequency = (0.002 + params.frequency / 10_000.0) * (1.0 + i * 0.05);
    let phase = i * (params.phase / 30.0) + time;

    (0..POINTS_PER_LAYER)
        .map(|j| {
            let x = j as f32 * spacing_x;
            let swell = (x * frequency * 3.0 + phase).sin();
            let detail = (x * frequency * 11.0 + phase * 1.5).sin() * (params.roughness / 300.0);
            Vec2::new(x, y_base + (swell + detail) * amplitude)
        })
        .collect()
}

/// Smooth wave line closed along the bottom of the view box.
pub fn silhouette(points: &[Vec2]) -> Path {
    let mut path = spline::build(points, 1.0, false);
    if !path.is_empty() {
        path.line_to(Vec2::new(VIEW_BOX, VIEW_BOX))
            .line_to(Vec2::new(0.0, VIEW_BOX))
            .close();
    }
    path
}

/// One filled wave layer, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveLayer {
    /// Stack index; 0 is the front layer, nearest the bottom edge.
    pub index: u32,
    /// Position in draw order; 0 is drawn first.
    pub draw_order: u32,
    pub path: Path,
    pub color: Rgb,
    pub opacity: f32,
}

/// Animates the wave stack.
#[derive(Debug, Clone, Default)]
pub struct WaveGenerator {
    clock: Clock,
}

impl WaveGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Advance the clock (unless paused) and build every layer, back to front.
    pub fn tick(
        &mut self,
        params: &WaveParams,
        ramp: &ColorRamp,
        ctx: &TickContext,
    ) -> Vec<WaveLayer> {
        let params = params.clamped();
        self.clock.set_paused(ctx.paused);
        let time = self.clock.advance(params.motion_speed * SPEED_STEP);
        trace!(time, layers = params.layers, "wave tick");

        (0..params.layers)
            .rev()
            .enumerate()
            .map(|(draw, index)| WaveLayer {
                index,
                draw_order: draw as u32,
                path: silhouette(&generate(time, index, &params)),
                color: ramp.cycle(draw),
                opacity: 0.8 + (draw as f32 / params.layers as f32) * 0.2,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Viewport;
    use crate::spline::PathCommand;

    fn ctx() -> TickContext {
        TickContext::new(Viewport::new(VIEW_BOX, VIEW_BOX))
    }

    #[test]
    fn test_layer_points_span_view_box() {
        let points = generate(0.0, 0, &WaveParams::default());
        assert_eq!(points.len(), POINTS_PER_LAYER);
        assert_eq!(points[0].x, 0.0);
        assert!((points[POINTS_PER_LAYER - 1].x - VIEW_BOX).abs() < 1e-3);
    }

    #[test]
    fn test_layers_stack_upwards() {
        let params = WaveParams {
            height: 5.0,
            ..Default::default()
        };
        let mean = |layer| {
            let points = generate(0.0, layer, &params);
            points.iter().map(|p| p.y).sum::<f32>() / points.len() as f32
        };
        assert!(mean(1) < mean(0));
        assert!(mean(2) < mean(1));
    }

    #[test]
    fn test_amplitude_bound() {
        let params = WaveParams::default();
        for layer in 0..params.layers {
            let i = layer as f32;
            let y_base = VIEW_BOX - i * params.spacing - params.base_height;
            let bound = params.height * (0.6 + i * 0.1) * (1.0 + params.roughness / 300.0);
            for p in generate(2.5, layer, &params) {
                assert!((p.y - y_base).abs() <= bound + 1e-3);
            }
        }
    }

    #[test]
    fn test_silhouette_closes_along_bottom() {
        let path = silhouette(&generate(0.0, 0, &WaveParams::default()));
        let commands = path.commands();
        let n = commands.len();
        assert_eq!(commands[n - 3], PathCommand::LineTo(Vec2::new(VIEW_BOX, VIEW_BOX)));
        assert_eq!(commands[n - 2], PathCommand::LineTo(Vec2::new(0.0, VIEW_BOX)));
        assert_eq!(commands[n - 1], PathCommand::Close);
        assert!(silhouette(&[]).is_empty());
    }

    #[test]
    fn test_back_to_front_order() {
        let mut waves = WaveGenerator::new();
        let params = WaveParams {
            layers: 5,
            ..Default::default()
        };
        let layers = waves.tick(&params, &ColorRamp::default(), &ctx());
        let indices: Vec<u32> = layers.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![4, 3, 2, 1, 0]);
        assert_eq!(layers[0].opacity, 0.8);
        assert!(layers.windows(2).all(|w| w[0].opacity < w[1].opacity));
        assert_eq!(layers[0].color, ColorRamp::default().start());
        assert_eq!(layers[1].color, ColorRamp::default().end());
    }

    #[test]
    fn test_paused_waves_hold_still() {
        let mut waves = WaveGenerator::new();
        let params = WaveParams::default();
        let ramp = ColorRamp::default();
        let first = waves.tick(&params, &ramp, &ctx());
        let held = waves.tick(&params, &ramp, &ctx().with_paused(true));
        assert_eq!(first, held);
    }
}

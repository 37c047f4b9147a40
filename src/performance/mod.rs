//! # Frame Statistics
//!
//! [`PerformanceMonitor`] keeps a ring buffer of recent frame times and
//! derives FPS and min/avg/max frame time from it. The app shows the result
//! in a small overlay when `show_stats` is enabled.
//!
//! ```rust
//! use orbitview::performance::PerformanceMonitor;
//! use std::time::Duration;
//!
//! let mut monitor = PerformanceMonitor::new();
//! monitor.record_frame(Duration::from_millis(20));
//! assert!((monitor.metrics().fps - 50.0).abs() < 0.1);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    /// Draw calls issued in the last frame, summed over all viewports
    pub draw_calls: u32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            draw_calls: 0,
        }
    }
}

pub struct PerformanceMonitor {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    current_metrics: PerformanceMetrics,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_capacity(120) // ~2 seconds at 60fps
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            frame_start: None,
            current_metrics: PerformanceMetrics::default(),
        }
    }

    /// Mark the beginning of a tick
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a tick and record its duration
    pub fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            self.record_frame(start.elapsed());
        }
    }

    /// Add a frame time sample, dropping the oldest once full
    pub fn record_frame(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
        self.update_metrics();
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_ms = total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;
        self.current_metrics.frame_time_ms = avg_ms;
        self.current_metrics.fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };

        if let (Some(min), Some(max)) = (self.frame_times.iter().min(), self.frame_times.iter().max()) {
            self.current_metrics.min_frame_time_ms = min.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max.as_secs_f32() * 1000.0;
        }
    }

    pub fn set_draw_calls(&mut self, draw_calls: u32) {
        self.current_metrics.draw_calls = draw_calls;
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }

    /// Frame times in milliseconds, oldest first
    pub fn frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.current_metrics = PerformanceMetrics::default();
        self.frame_start = None;
    }

    /// Compact overlay in the top-right corner
    pub fn render_overlay(&self, ui: &imgui::Ui) {
        let display_size = ui.io().display_size;
        let metrics = &self.current_metrics;

        ui.window("Stats")
            .size([150.0, 90.0], imgui::Condition::Always)
            .position([display_size[0] - 160.0, 10.0], imgui::Condition::Always)
            .no_decoration()
            .no_inputs()
            .bg_alpha(0.3)
            .build(|| {
                ui.text(format!("FPS: {:.0}", metrics.fps));
                ui.text(format!("{:.1}ms", metrics.frame_time_ms));
                ui.text(format!(
                    "{:.1} / {:.1}ms",
                    metrics.min_frame_time_ms, metrics.max_frame_time_ms
                ));
                let history = self.frame_time_history();
                if !history.is_empty() {
                    ui.plot_lines("##frame_times", &history)
                        .graph_size([130.0, 20.0])
                        .scale_min(0.0)
                        .scale_max(50.0)
                        .build();
                }
            });
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_from_samples() {
        let mut monitor = PerformanceMonitor::new();
        monitor.record_frame(Duration::from_millis(10));
        monitor.record_frame(Duration::from_millis(30));

        let metrics = monitor.metrics();
        assert!((metrics.frame_time_ms - 20.0).abs() < 1e-3);
        assert!((metrics.fps - 50.0).abs() < 1e-2);
        assert!((metrics.min_frame_time_ms - 10.0).abs() < 1e-3);
        assert!((metrics.max_frame_time_ms - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut monitor = PerformanceMonitor::with_capacity(3);
        for ms in [100, 1, 1, 1] {
            monitor.record_frame(Duration::from_millis(ms));
        }

        assert_eq!(monitor.sample_count(), 3);
        assert!((monitor.metrics().max_frame_time_ms - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_end_frame_without_begin_is_ignored() {
        let mut monitor = PerformanceMonitor::new();
        monitor.end_frame();
        assert_eq!(monitor.sample_count(), 0);

        monitor.begin_frame();
        monitor.end_frame();
        assert_eq!(monitor.sample_count(), 1);
    }
}

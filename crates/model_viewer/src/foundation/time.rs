//! Time management utilities

use std::time::Instant;

/// Frame timer used by the render loop
///
/// Tracks delta time between consecutive frames and derives FPS figures from it.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last_frame: Option<Instant>,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer
    pub const fn new() -> Self {
        Self {
            last_frame: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Record a frame happening now
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Record a frame happening at `now`
    ///
    /// The first recorded frame has a delta of zero.
    pub fn update_at(&mut self, now: Instant) {
        self.delta_time = self
            .last_frame
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.total_time += self.delta_time;
        self.last_frame = Some(now);
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time across recorded frames
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the number of recorded frames
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }

    /// Get the average FPS across recorded frames
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count.saturating_sub(1) as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut timer = FrameTimer::new();
        timer.update_at(Instant::now());
        assert_eq!(timer.delta_time(), 0.0);
        assert_eq!(timer.frame_count(), 1);
        assert_eq!(timer.current_fps(), 0.0);
    }

    #[test]
    fn test_fps_from_fixed_cadence() {
        let mut timer = FrameTimer::new();
        let start = Instant::now();
        for i in 0..5u32 {
            timer.update_at(start + Duration::from_millis(20) * i);
        }
        assert_relative_eq!(timer.current_fps(), 50.0, epsilon = 0.01);
        assert_relative_eq!(timer.average_fps(), 50.0, epsilon = 0.01);
        assert_relative_eq!(timer.total_time(), 0.08, epsilon = 1e-4);
    }
}

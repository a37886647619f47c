//! 性能统计模块
//!
//! PerformanceMetrics 用于跟踪和计算帧率、帧时间等性能指标。

use std::time::{Duration, Instant};

const UPDATE_INTERVAL: Duration = Duration::from_secs(1);

/// 性能统计（帧率、帧时间）
#[derive(Debug)]
pub struct PerformanceMetrics {
    frame_count: u32,
    last_update: Instant,
    fps: f32,
    frame_time_ms: f32,
}

impl PerformanceMetrics {
    /// 创建新的性能统计器
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// 以给定时刻作为统计起点
    pub fn starting_at(start: Instant) -> Self {
        Self {
            frame_count: 0,
            last_update: start,
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// 记录一帧
    pub fn record_frame(&mut self) -> bool {
        self.record_frame_at(Instant::now())
    }

    /// 在 `now` 时刻记录一帧，本次刷新了统计值时返回 `true`
    pub fn record_frame_at(&mut self, now: Instant) -> bool {
        self.frame_count += 1;
        let elapsed = now.saturating_duration_since(self.last_update);

        // 每秒更新一次 FPS
        if elapsed < UPDATE_INTERVAL {
            return false;
        }

        self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
        self.frame_time_ms = 1000.0 / self.fps;
        self.frame_count = 0;
        self.last_update = now;
        true
    }

    /// 获取当前 FPS
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// 获取当前帧时间（毫秒）
    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fps_before_one_second() {
        let start = Instant::now();
        let mut metrics = PerformanceMetrics::starting_at(start);

        for i in 1..=30 {
            assert!(!metrics.record_frame_at(start + Duration::from_millis(i * 16)));
        }
        assert_eq!(metrics.fps(), 0.0);
    }

    #[test]
    fn test_fps_after_one_second() {
        let start = Instant::now();
        let mut metrics = PerformanceMetrics::starting_at(start);

        for i in 1..60 {
            metrics.record_frame_at(start + Duration::from_millis(i * 10));
        }
        assert!(metrics.record_frame_at(start + Duration::from_secs(1)));

        assert!((metrics.fps() - 60.0).abs() < 0.01);
        assert!((metrics.frame_time_ms() - 16.667).abs() < 0.01);
    }

    #[test]
    fn test_counter_resets_after_update() {
        let start = Instant::now();
        let mut metrics = PerformanceMetrics::starting_at(start);

        metrics.record_frame_at(start + Duration::from_secs(1));
        assert!((metrics.fps() - 1.0).abs() < 1e-4);

        // 之后每秒两帧
        for i in 1..=4 {
            metrics.record_frame_at(start + Duration::from_secs(1) + Duration::from_millis(i * 500));
        }
        assert!((metrics.fps() - 2.0).abs() < 1e-4);
    }
}

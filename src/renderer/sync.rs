//! 帧同步记账
//!
//! CPU 和 GPU 之间的帧同步协议：每个在途帧槽位持有一个命令分配器，
//! 以及最后一次为该分配器录制的工作所 signal 的 fence 值。
//!
//! 本模块只负责 fence 值的记账，不接触任何图形 API，
//! 真正的等待（`SetEventOnCompletion` + `WaitForMultipleObjects`）在 `gfx::dx12::renderer` 中完成。
//!
//! # 协议
//!
//! 1. `begin_frame`：推进帧计数器，选出槽位 `counter % frames_in_flight`，
//!    取走该槽位上尚未等待的 fence 值（取走后清零）
//! 2. 调用者等待该值完成后才能 `Reset` 槽位的命令分配器
//! 3. 提交后 `end_frame`：生成下一个 fence 值，记到槽位上并交给队列 signal
//! 4. `flush_value` + `complete_all`：等待最后提交的一帧（调整大小、退出）

/// Fence 值
///
/// 单调递增，0 表示“没有待完成的工作”。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FenceValue(u64);

impl FenceValue {
    /// 未 signal 的值
    pub const NONE: FenceValue = FenceValue(0);

    /// 创建新的Fence值
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// 获取内部值
    pub fn value(&self) -> u64 {
        self.0
    }

    /// 下一个Fence值
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// 是否代表一次已提交的 signal
    pub fn is_pending(&self) -> bool {
        self.0 != 0
    }

    /// GPU 已完成的值是否覆盖了本值
    pub fn is_reached_by(&self, completed: u64) -> bool {
        completed >= self.0
    }
}

/// `begin_frame` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSlot {
    /// 帧资源槽位
    pub index: usize,
    /// 复用该槽位前必须等待的 fence 值
    pub wait_for: Option<FenceValue>,
}

/// 在途帧的 fence 记账
#[derive(Debug)]
pub struct FrameSync {
    /// 每个槽位上一次提交的 fence 值
    slot_fences: Vec<FenceValue>,
    /// 已开始的帧数
    frame_counter: u64,
    /// 最近一次 signal 的值
    last_signaled: FenceValue,
}

impl FrameSync {
    /// 创建记账器
    ///
    /// # Panics
    ///
    /// `frames_in_flight` 为 0 时 panic。
    pub fn new(frames_in_flight: usize) -> Self {
        assert!(frames_in_flight >= 1, "At least one frame slot is required");

        Self {
            slot_fences: vec![FenceValue::NONE; frames_in_flight],
            frame_counter: 0,
            last_signaled: FenceValue::NONE,
        }
    }

    /// 槽位数量
    pub fn frames_in_flight(&self) -> usize {
        self.slot_fences.len()
    }

    /// 已开始的帧数
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// 最近一次 signal 的值
    pub fn last_signaled(&self) -> FenceValue {
        self.last_signaled
    }

    /// 当前帧（最近一次 `begin_frame`）的槽位
    pub fn current_slot(&self) -> usize {
        (self.frame_counter % self.slot_fences.len() as u64) as usize
    }

    /// 开始新的一帧
    ///
    /// 返回的 `wait_for` 只会交出一次：调用者拿到后必须等待它，
    /// 槽位上的值随即清零。
    pub fn begin_frame(&mut self) -> FrameSlot {
        self.frame_counter += 1;
        let index = self.current_slot();

        let pending = std::mem::take(&mut self.slot_fences[index]);
        FrameSlot {
            index,
            wait_for: pending.is_pending().then_some(pending),
        }
    }

    /// 记录一次提交，返回需要 signal 的 fence 值
    pub fn end_frame(&mut self, slot: usize) -> FenceValue {
        let value = self.last_signaled.next();
        self.last_signaled = value;
        self.slot_fences[slot] = value;
        value
    }

    /// 为“等待最后提交的一帧”生成 signal 值
    pub fn flush_value(&mut self) -> FenceValue {
        let value = self.last_signaled.next();
        self.last_signaled = value;
        value
    }

    /// GPU 已经完全空闲后清除所有槽位上的等待
    pub fn complete_all(&mut self) {
        self.slot_fences.fill(FenceValue::NONE);
    }

    /// 仍未被 `completed` 覆盖的槽位数
    pub fn pending_slots(&self, completed: u64) -> usize {
        self.slot_fences
            .iter()
            .filter(|v| v.is_pending() && !v.is_reached_by(completed))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_value() {
        let fence = FenceValue::new(1);
        assert_eq!(fence.value(), 1);
        assert_eq!(fence.next().value(), 2);
        assert!(fence.is_pending());
        assert!(!FenceValue::NONE.is_pending());
        assert!(fence.is_reached_by(1));
        assert!(!fence.is_reached_by(0));
    }

    #[test]
    fn first_frames_do_not_wait() {
        let mut sync = FrameSync::new(3);
        for expected_slot in [1, 2, 0] {
            let slot = sync.begin_frame();
            assert_eq!(slot.index, expected_slot);
            assert_eq!(slot.wait_for, None);
            sync.end_frame(slot.index);
        }
    }

    #[test]
    fn reused_slot_waits_for_its_previous_signal() {
        let mut sync = FrameSync::new(3);
        let mut signaled = Vec::new();

        for _ in 0..3 {
            let slot = sync.begin_frame();
            signaled.push((slot.index, sync.end_frame(slot.index)));
        }

        // 第 4 帧回到第 1 帧用过的槽位
        let slot = sync.begin_frame();
        assert_eq!(slot.index, signaled[0].0);
        assert_eq!(slot.wait_for, Some(signaled[0].1));
    }

    #[test]
    fn wait_is_consumed_once() {
        let mut sync = FrameSync::new(1);
        let slot = sync.begin_frame();
        let value = sync.end_frame(slot.index);

        let slot = sync.begin_frame();
        assert_eq!(slot.wait_for, Some(value));
        assert_eq!(sync.pending_slots(0), 0);
    }

    #[test]
    fn signaled_values_strictly_increase() {
        let mut sync = FrameSync::new(2);
        let mut last = FenceValue::NONE;
        for i in 0..10 {
            let value = if i % 4 == 3 {
                sync.flush_value()
            } else {
                let slot = sync.begin_frame();
                sync.end_frame(slot.index)
            };
            assert!(value > last);
            last = value;
        }
        assert_eq!(sync.last_signaled(), last);
    }

    #[test]
    fn flush_clears_all_waits() {
        let mut sync = FrameSync::new(3);
        for _ in 0..3 {
            let slot = sync.begin_frame();
            sync.end_frame(slot.index);
        }
        assert_eq!(sync.pending_slots(0), 3);
        assert_eq!(sync.pending_slots(2), 1);

        let flush = sync.flush_value();
        assert_eq!(flush.value(), 4);
        sync.complete_all();

        assert_eq!(sync.pending_slots(0), 0);
        for _ in 0..3 {
            assert_eq!(sync.begin_frame().wait_for, None);
        }
    }

    #[test]
    #[should_panic]
    fn zero_slots_rejected() {
        let _ = FrameSync::new(0);
    }
}

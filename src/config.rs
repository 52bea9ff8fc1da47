/// Progress update interval (tick every N pages)
pub const PROGRESS_INTERVAL: u64 = 1000;

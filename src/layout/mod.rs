mod force;

pub use force::{ForceLayout, ForceLayoutState, REHEAT_ALPHA, WARMUP_TICKS};

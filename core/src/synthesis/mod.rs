pub mod buffer_pool;
pub mod renderer;

pub use buffer_pool::BufferPool;
pub use renderer::{PcmOutput, RenderSummary, RenderedTone, ToneRenderer, DEFAULT_SAMPLE_RATE};

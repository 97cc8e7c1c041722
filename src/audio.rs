pub mod audio_stream;
pub mod channel;
pub mod frame_buffer;
pub mod spectrum;

pub use audio_stream::{AudioStream, sample_tap};
pub use channel::BoundedChannel;
pub use frame_buffer::MonoFrameBuffer;
pub use spectrum::{FftOrder, SpectrumGenerator, SpectrumSnapshot};

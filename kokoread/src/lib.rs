pub mod config;
pub mod device;
pub mod error;
pub mod input;
pub mod lang;
pub mod onn;
pub mod playback;
pub mod run;
pub mod synth;
pub mod tts;
pub mod utils;
pub mod voices;

// Re-export key functionality for easy access
pub use config::RunConfig;
pub use device::{select_device, Device, DeviceProbe};
pub use error::Error;
pub use tts::koko::KokoroPipeline;
pub use tts::{AudioChunk, SpeechPipeline};

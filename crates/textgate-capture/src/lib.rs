pub mod feeder;
pub mod watcher;

pub use feeder::FrameFeeder;
pub use watcher::FrameWatcher;

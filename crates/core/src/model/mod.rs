pub mod frame;
pub mod tree;

pub use frame::{Frame, FrameDetails};
pub use tree::{FlameData, FlameTree, TreeError};

// Image-hosting layer

pub mod imgbb;

pub use imgbb::*;

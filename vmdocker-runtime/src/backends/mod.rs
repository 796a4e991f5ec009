// ABOUTME: Backend implementations (reference test runtime, scripted mock).
// ABOUTME: Each backend implements the RuntimeBackend trait.

pub mod mock;
pub mod test;

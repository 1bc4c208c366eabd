mod loader;

pub use loader::SolutionModelLoader;

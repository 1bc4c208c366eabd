mod resolver;

pub use resolver::CompositionResolver;

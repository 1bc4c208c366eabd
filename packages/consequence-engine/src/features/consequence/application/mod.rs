mod analyzer;

pub use analyzer::ConsequenceAnalyzer;

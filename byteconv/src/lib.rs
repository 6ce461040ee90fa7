pub mod config;
pub mod converter;
pub mod decoder;
pub mod error;
pub mod io;
pub mod lock;
pub mod symbol;

// Re-export converter types for convenience
pub use config::ConverterConfig;
pub use converter::Converter;
pub use error::{ConfigError, ConverterError};

// Re-export decoder types for convenience
pub use decoder::{classify, decode, SkipReason, TypeTag};
pub use symbol::Symbol;

// Re-export I/O types for convenience
pub use io::{ByteSource, MemSink, MemSource, SymbolSink, SymbolsReadGuard};
pub use lock::ExclusionToken;

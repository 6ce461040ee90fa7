//! I/O module for byteconv
//!
//! Contains the source/sink capabilities and their in-memory implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Converter (coordination layer)     │
//! │  - owns the exclusion token         │
//! │  - worker drains source into sink   │
//! └─────────────────────────────────────┘
//!          ▲                 ▲
//!          │ ByteSource      │ SymbolSink
//!          ▼                 ▼
//! ┌──────────────────┐ ┌──────────────────┐
//! │  MemSource       │ │  MemSink         │
//! │  - VecDeque<u8>  │ │  - Vec<Symbol>   │
//! │  - push_byte()   │ │  - push()        │
//! │  - extract_byte()│ │  - symbols()     │
//! └──────────────────┘ └──────────────────┘
//! ```

pub mod memsink;
pub mod memsource;
pub mod types;

pub use memsink::{MemSink, SymbolsReadGuard};
pub use memsource::MemSource;
pub use types::{ByteSource, SymbolSink};

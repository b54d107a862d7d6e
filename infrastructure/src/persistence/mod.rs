//! Tool run storage adapters.

mod memory;

pub use memory::InMemoryToolRunRepository;

mod store;

pub use store::MemoryScopedStore;

pub mod clock;

pub use clock::IClock;

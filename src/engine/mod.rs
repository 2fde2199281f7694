pub mod animator;
pub mod progression;

pub mod events;
pub mod roi;
pub mod transform;

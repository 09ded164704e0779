pub mod garden;
pub mod link;
pub mod show;
pub mod water;

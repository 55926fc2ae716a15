pub mod category;
pub mod item;
pub mod renderer;
pub mod store;
pub mod transfer;

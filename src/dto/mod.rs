pub mod cart;
pub mod foods;

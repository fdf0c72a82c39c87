mod cart;
mod status;

pub mod dtos {
    pub use crate::cart::dtos::*;
}

pub use crate::cart::api::*;
pub use crate::status::api::*;

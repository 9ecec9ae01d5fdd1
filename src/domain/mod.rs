pub mod record;
pub mod tariff;

pub use record::*;
pub use tariff::*;

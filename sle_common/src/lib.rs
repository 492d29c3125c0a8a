mod money;
mod secret;

pub use money::{Money, MoneyConversionError};
pub use secret::Secret;

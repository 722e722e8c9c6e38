pub mod balance;
pub mod export;
pub mod method;
pub mod observation;
pub mod result;

pub use balance::*;
pub use export::*;
pub use method::*;
pub use observation::*;
pub use result::*;

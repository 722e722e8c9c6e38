pub mod aggregator;
pub mod arguments;
pub mod dispatcher;
pub mod registry;
pub mod validation;
pub mod water_balance;

pub use arguments::ArgumentBuilder;
pub use dispatcher::{DispatchSettings, FormulaDispatcher};
pub use registry::MethodRegistry;
pub use water_balance::WaterBalanceCalculator;

pub mod models;
pub mod services;
pub mod utils;

pub use models::news::Region;
pub use models::market::Sector;
pub use services::analyzer::GeopoliticalAnalyzer;
pub use services::risk_model::{RiskModel, RiskTables};

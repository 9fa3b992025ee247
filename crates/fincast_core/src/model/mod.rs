mod market;
mod params;
mod results;

pub use market::{MarketContext, MarketRegime};
pub use params::{ParameterBundle, ScenarioKind, ScenarioParameters};
pub use results::{Projection, Scenario, ScenarioAnalytics};

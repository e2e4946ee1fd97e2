mod catalog;
mod engine;
mod export;
mod table;
mod types;

pub use catalog::default_catalog;
pub use engine::{
    SIMULATION_TRIALS, UniformSource, XorShiftRng, effective_rate, invested_principal, project,
};
pub use export::{to_csv_string, write_csv};
pub use table::{SortDirection, SortKey, SortSpec, TableQuery, query_rows};
pub use types::{
    Complexity, InvestmentOption, Liquidity, MAX_PERIOD_YEARS, PercentileBands, Period,
    ProjectionInputs, ProjectionResult, ProjectionRow, Risk,
};

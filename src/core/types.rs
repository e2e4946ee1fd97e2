use serde::{Deserialize, Serialize};

// Domain ceiling on a single contribution period's duration.
pub const MAX_PERIOD_YEARS: u32 = 20;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub years: u32,
    pub monthly: f64,
}

impl Period {
    pub fn new(years: u32, monthly: f64) -> Self {
        Self { years, monthly }
    }

    // A period takes part in computations only with both a positive duration
    // and a positive monthly amount.
    pub fn is_active(self) -> bool {
        self.years > 0 && self.monthly > 0.0
    }

    pub fn months(self) -> u32 {
        self.years * 12
    }

    // Nominal cash put in over the period, ignoring growth.
    pub fn contributed(self) -> f64 {
        self.monthly * f64::from(self.months())
    }
}

// All rate fields are fractional annual rates (0.08 = 8%), not percentages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInputs {
    pub initial: f64,
    pub periods: Vec<Period>,
    pub cap_rate: f64,
    pub inflation_rate: f64,
    pub income_tax_rate: f64,
    pub discount_rate: f64,
    pub roi_cap: f64,
    pub monte_carlo_enabled: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Risk {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Risk {
    pub fn rank(self) -> u8 {
        match self {
            Risk::VeryLow => 1,
            Risk::Low => 2,
            Risk::Medium => 3,
            Risk::High => 4,
            Risk::VeryHigh => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Risk::VeryLow => "very-low",
            Risk::Low => "low",
            Risk::Medium => "medium",
            Risk::High => "high",
            Risk::VeryHigh => "very-high",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Liquidity {
    Low,
    Medium,
    High,
}

impl Liquidity {
    pub fn rank(self) -> u8 {
        match self {
            Liquidity::Low => 1,
            Liquidity::Medium => 2,
            Liquidity::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Liquidity::Low => "low",
            Liquidity::Medium => "medium",
            Liquidity::High => "high",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Complexity {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Complexity {
    pub fn rank(self) -> u8 {
        match self {
            Complexity::VeryLow => 1,
            Complexity::Low => 2,
            Complexity::Medium => 3,
            Complexity::High => 4,
            Complexity::VeryHigh => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Complexity::VeryLow => "very-low",
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
            Complexity::VeryHigh => "very-high",
        }
    }
}

// mu_annual/sigma_annual parameterize the annual log-return and are only
// consulted when Monte Carlo mode is on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentOption {
    pub id: u32,
    pub category: String,
    pub subcategory: String,
    pub name: String,
    pub min_entry: f64,
    pub roi_annual: f64,
    pub risk: Risk,
    pub liquidity: Liquidity,
    pub complexity: Complexity,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu_annual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma_annual: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentileBands {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

// `bands` is present if and only if Monte Carlo executed for the option.
// `cagr` is present only when both the horizon and the invested principal
// are positive; consumers render a placeholder otherwise, never 0%.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub forecast_capital: f64,
    pub real_capital: f64,
    pub npv: f64,
    pub annual_income: f64,
    pub actual_profit: f64,
    pub average_income: f64,
    pub total_invested: f64,
    pub total_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cagr: Option<f64>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub bands: Option<PercentileBands>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProjectionRow {
    pub option: InvestmentOption,
    pub result: ProjectionResult,
}

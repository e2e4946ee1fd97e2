use super::types::{Complexity, InvestmentOption, Liquidity, Risk};

// Simulation parameter defaults applied to rows that do not declare their
// own: mean log-return at 0.9x the nominal ROI, volatility at 0.3x.
const MU_FACTOR: f64 = 0.9;
const SIGMA_FACTOR: f64 = 0.3;

#[allow(clippy::too_many_arguments)]
fn entry(
    id: u32,
    category: &str,
    subcategory: &str,
    name: &str,
    min_entry: f64,
    roi_annual: f64,
    risk: Risk,
    liquidity: Liquidity,
    complexity: Complexity,
    notes: &str,
) -> InvestmentOption {
    InvestmentOption {
        id,
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        name: name.to_string(),
        min_entry,
        roi_annual,
        risk,
        liquidity,
        complexity,
        notes: notes.to_string(),
        mu_annual: Some(roi_annual * MU_FACTOR),
        sigma_annual: Some(roi_annual * SIGMA_FACTOR),
    }
}

pub fn default_catalog() -> Vec<InvestmentOption> {
    vec![
        entry(
            1,
            "Investments",
            "Market",
            "ETF (MSCI World/S&P 500)",
            1_000.0,
            0.08,
            Risk::Low,
            Liquidity::High,
            Complexity::VeryLow,
            "Compounding does the work over long horizons",
        ),
        entry(
            2,
            "Investments",
            "Market",
            "Bonds (IG/treasuries)",
            1_000.0,
            0.04,
            Risk::VeryLow,
            Liquidity::High,
            Complexity::VeryLow,
            "Safest option with a steady coupon",
        ),
        entry(
            3,
            "Investments",
            "Alternative",
            "REITs (global)",
            2_000.0,
            0.07,
            Risk::Medium,
            Liquidity::High,
            Complexity::Low,
            "A share of rental income plus price appreciation",
        ),
        entry(
            4,
            "Investments",
            "Alternative",
            "Gold/silver (ETF)",
            1_000.0,
            0.03,
            Risk::Low,
            Liquidity::High,
            Complexity::VeryLow,
            "Hedge against currency debasement",
        ),
        entry(
            5,
            "Investments",
            "P2P",
            "P2P lending (diversified)",
            2_000.0,
            0.10,
            Risk::High,
            Liquidity::Medium,
            Complexity::Low,
            "Platform risk: the operator can shut down",
        ),
        entry(
            6,
            "Investments",
            "Crypto",
            "BTC/ETH long term",
            1_000.0,
            0.20,
            Risk::VeryHigh,
            Liquidity::High,
            Complexity::Medium,
            "Keep to 5-10% of the total portfolio",
        ),
        entry(
            7,
            "Investments",
            "Market",
            "Dividend stocks",
            1_000.0,
            0.06,
            Risk::Medium,
            Liquidity::High,
            Complexity::Low,
            "Regular dividend payouts from established companies",
        ),
        entry(
            8,
            "Investments",
            "Market",
            "Index funds (VTI, VXUS)",
            1_000.0,
            0.09,
            Risk::Low,
            Liquidity::High,
            Complexity::VeryLow,
            "Broad exposure across thousands of companies",
        ),
        entry(
            9,
            "Investments",
            "Alternative",
            "Real estate funds",
            5_000.0,
            0.11,
            Risk::Medium,
            Liquidity::Medium,
            Complexity::Low,
            "Property income without buying property",
        ),
        entry(
            10,
            "Investments",
            "Alternative",
            "Physical silver",
            2_000.0,
            0.04,
            Risk::Low,
            Liquidity::Medium,
            Complexity::Low,
            "Metal held in physical storage",
        ),
        entry(
            11,
            "Investments",
            "P2P",
            "Platform lending",
            1_000.0,
            0.12,
            Risk::High,
            Liquidity::Low,
            Complexity::Low,
            "Loans issued to private borrowers",
        ),
        entry(
            12,
            "Investments",
            "Crypto",
            "Crypto staking",
            2_000.0,
            0.08,
            Risk::High,
            Liquidity::Medium,
            Complexity::Medium,
            "Lock coins, collect protocol interest",
        ),
        entry(
            13,
            "IP",
            "Licensing",
            "Design/templates/licenses",
            500.0,
            0.80,
            Risk::High,
            Liquidity::High,
            Complexity::Medium,
            "Ships once, earns without further involvement",
        ),
        entry(
            14,
            "IP",
            "Publishing",
            "Book/course (publisher)",
            1_000.0,
            0.50,
            Risk::High,
            Liquidity::High,
            Complexity::Medium,
            "Backlist titles keep selling",
        ),
        entry(
            15,
            "IP",
            "Licensing",
            "Stock photography",
            500.0,
            0.60,
            Risk::Medium,
            Liquidity::High,
            Complexity::Low,
            "Photo sales through stock marketplaces",
        ),
        entry(
            16,
            "IP",
            "Licensing",
            "Music/podcast royalties",
            1_000.0,
            0.55,
            Risk::High,
            Liquidity::High,
            Complexity::Medium,
            "Royalties whenever the work is used",
        ),
        entry(
            17,
            "IP",
            "Publishing",
            "E-book (self-published)",
            500.0,
            0.75,
            Risk::High,
            Liquidity::High,
            Complexity::Low,
            "Sold via Amazon or your own site",
        ),
    ]
}

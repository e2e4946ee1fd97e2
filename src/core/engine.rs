use std::f64::consts::PI;

use super::types::{InvestmentOption, PercentileBands, Period, ProjectionInputs, ProjectionResult};

pub const SIMULATION_TRIALS: usize = 1000;

// Uniform(0,1) source feeding the simulator. Implementations must never
// return a value outside (0, 1); zero draws are re-rolled by the caller.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0xA5A5_A5A5_A5A5_A5A5 } else { seed };
        Self {
            state: splitmix64(seed),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }
}

impl UniformSource for XorShiftRng {
    fn next_uniform(&mut self) -> f64 {
        // 53-bit mantissa, offset by half a step so draws stay inside (0, 1).
        const DENOM: f64 = (1_u64 << 53) as f64;
        let v = self.next_u64() >> 11;
        ((v as f64) + 0.5) / DENOM
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn standard_normal<R: UniformSource + ?Sized>(rng: &mut R) -> f64 {
    let mut u = rng.next_uniform();
    while u <= 0.0 {
        u = rng.next_uniform();
    }
    let mut v = rng.next_uniform();
    while v <= 0.0 {
        v = rng.next_uniform();
    }
    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

// Nominal instrument ROI clipped to the policy ceiling before any use.
pub fn effective_rate(roi_annual: f64, roi_cap: f64) -> f64 {
    roi_annual.min(roi_cap)
}

fn monthly_rate(annual: f64) -> f64 {
    (1.0 + annual).powf(1.0 / 12.0) - 1.0
}

pub fn invested_principal(initial: f64, periods: &[Period]) -> f64 {
    initial
        + periods
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.contributed())
            .sum::<f64>()
}

fn total_active_years(periods: &[Period]) -> u32 {
    periods
        .iter()
        .filter(|p| p.is_active())
        .map(|p| p.years)
        .sum()
}

fn accumulate(initial: f64, periods: &[Period], rm: f64) -> f64 {
    if !periods.iter().any(|p| p.is_active()) {
        return initial;
    }

    let mut capital = initial;
    if rm == 0.0 {
        // Interest-free accumulation; guards the (growth - 1) / rm division.
        for period in periods.iter().filter(|p| p.is_active()) {
            capital += period.contributed();
        }
        return capital;
    }

    for period in periods.iter().filter(|p| p.is_active()) {
        let n = f64::from(period.months());
        let growth = (1.0 + rm).powf(n);
        capital = capital * growth + period.monthly * ((growth - 1.0) / rm);
    }
    capital
}

fn simulate_bands<R: UniformSource + ?Sized>(
    initial: f64,
    periods: &[Period],
    mu_annual: f64,
    sigma_annual: f64,
    rng: &mut R,
) -> PercentileBands {
    let mu_monthly = mu_annual / 12.0;
    // Volatility scales with the square root of time.
    let sigma_monthly = sigma_annual / 12.0_f64.sqrt();

    let mut outcomes = Vec::with_capacity(SIMULATION_TRIALS);
    for _ in 0..SIMULATION_TRIALS {
        let mut capital = initial;
        for period in periods.iter().filter(|p| p.is_active()) {
            for _ in 0..period.months() {
                let log_return = mu_monthly + sigma_monthly * standard_normal(rng);
                // Contribution lands after that month's return has compounded.
                capital = capital * log_return.exp() + period.monthly;
            }
        }
        outcomes.push(capital);
    }

    outcomes.sort_by(|a, b| a.total_cmp(b));
    PercentileBands {
        p10: rank_value(&outcomes, 0.1),
        p50: rank_value(&outcomes, 0.5),
        p90: rank_value(&outcomes, 0.9),
    }
}

fn rank_value(sorted: &[f64], fraction: f64) -> f64 {
    let rank = ((sorted.len() as f64) * fraction).floor() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

pub fn project<R: UniformSource + ?Sized>(
    option: &InvestmentOption,
    inputs: &ProjectionInputs,
    rng: &mut R,
) -> ProjectionResult {
    let effective = effective_rate(option.roi_annual, inputs.roi_cap);
    let deterministic = accumulate(inputs.initial, &inputs.periods, monthly_rate(effective));

    // Options without declared simulation parameters fall back to the
    // deterministic path even when Monte Carlo is globally enabled.
    let bands = match (inputs.monte_carlo_enabled, option.mu_annual, option.sigma_annual) {
        (true, Some(mu), Some(sigma)) => {
            Some(simulate_bands(inputs.initial, &inputs.periods, mu, sigma, rng))
        }
        _ => None,
    };

    // Once the simulation ran, every derived metric works from its median;
    // deterministic and stochastic values are never mixed in one result.
    let forecast = bands.map_or(deterministic, |b| b.p50);

    let total_years = total_active_years(&inputs.periods);
    let years = f64::from(total_years);
    let invested = invested_principal(inputs.initial, &inputs.periods);
    let actual_profit = forecast - invested;
    let annual_income =
        forecast * effective.min(inputs.cap_rate) * (1.0 - inputs.income_tax_rate);
    let average_income = if total_years > 0 {
        actual_profit / years
    } else {
        0.0
    };
    let real_capital = forecast / (1.0 + inputs.inflation_rate).powf(years);
    let npv = if total_years == 0 {
        forecast
    } else {
        forecast / (1.0 + inputs.discount_rate).powf(years)
    };
    let cagr = if total_years > 0 && invested > 0.0 {
        Some(((forecast / invested).powf(1.0 / years) - 1.0) * 100.0)
    } else {
        None
    };

    ProjectionResult {
        forecast_capital: forecast,
        real_capital,
        npv,
        annual_income,
        actual_profit,
        average_income,
        total_invested: invested,
        total_value: forecast,
        cagr,
        bands,
    }
}

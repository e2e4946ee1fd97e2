use std::cmp::Ordering;

use serde::Deserialize;

use super::engine::{UniformSource, project};
use super::types::{
    Complexity, InvestmentOption, Liquidity, ProjectionInputs, ProjectionRow, Risk,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Category,
    Subcategory,
    Name,
    MinEntry,
    RoiAnnual,
    Risk,
    Liquidity,
    Complexity,
    ForecastCapital,
    AnnualIncome,
    ActualProfit,
    AverageIncome,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

#[derive(Copy, Clone, Debug)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

// Per-table view state as a plain request value: each caller owns its own
// query; nothing is kept between calls.
#[derive(Clone, Debug, Default)]
pub struct TableQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub risk: Option<Risk>,
    pub liquidity: Option<Liquidity>,
    pub complexity: Option<Complexity>,
    pub sort: Option<SortSpec>,
}

pub fn query_rows<R: UniformSource + ?Sized>(
    catalog: &[InvestmentOption],
    inputs: &ProjectionInputs,
    query: &TableQuery,
    rng: &mut R,
) -> Vec<ProjectionRow> {
    let needle = query.search.as_deref().map(str::to_lowercase);
    let mut rows: Vec<ProjectionRow> = catalog
        .iter()
        .filter(|option| matches_query(option, query, needle.as_deref()))
        .map(|option| ProjectionRow {
            option: option.clone(),
            result: project(option, inputs, rng),
        })
        .collect();

    if let Some(sort) = query.sort {
        sort_rows(&mut rows, sort);
    }
    rows
}

fn matches_query(option: &InvestmentOption, query: &TableQuery, needle: Option<&str>) -> bool {
    if let Some(category) = &query.category {
        if option.category != *category {
            return false;
        }
    }
    if let Some(subcategory) = &query.subcategory {
        if option.subcategory != *subcategory {
            return false;
        }
    }
    if let Some(risk) = query.risk {
        if option.risk != risk {
            return false;
        }
    }
    if let Some(liquidity) = query.liquidity {
        if option.liquidity != liquidity {
            return false;
        }
    }
    if let Some(complexity) = query.complexity {
        if option.complexity != complexity {
            return false;
        }
    }
    if let Some(needle) = needle {
        // Global search covers the display name and the free-text notes.
        let name = option.name.to_lowercase();
        let notes = option.notes.to_lowercase();
        if !name.contains(needle) && !notes.contains(needle) {
            return false;
        }
    }
    true
}

fn sort_rows(rows: &mut [ProjectionRow], sort: SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = compare_rows(a, b, sort.key);
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_rows(a: &ProjectionRow, b: &ProjectionRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.option.id.cmp(&b.option.id),
        SortKey::Category => a.option.category.cmp(&b.option.category),
        SortKey::Subcategory => a.option.subcategory.cmp(&b.option.subcategory),
        SortKey::Name => a.option.name.cmp(&b.option.name),
        SortKey::MinEntry => a.option.min_entry.total_cmp(&b.option.min_entry),
        SortKey::RoiAnnual => a.option.roi_annual.total_cmp(&b.option.roi_annual),
        SortKey::Risk => a.option.risk.rank().cmp(&b.option.risk.rank()),
        SortKey::Liquidity => a.option.liquidity.rank().cmp(&b.option.liquidity.rank()),
        SortKey::Complexity => a.option.complexity.rank().cmp(&b.option.complexity.rank()),
        SortKey::ForecastCapital => a
            .result
            .forecast_capital
            .total_cmp(&b.result.forecast_capital),
        SortKey::AnnualIncome => a.result.annual_income.total_cmp(&b.result.annual_income),
        SortKey::ActualProfit => a.result.actual_profit.total_cmp(&b.result.actual_profit),
        SortKey::AverageIncome => a.result.average_income.total_cmp(&b.result.average_income),
    }
}

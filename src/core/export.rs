use std::io::Write;

use super::types::ProjectionRow;

const HEADER: [&str; 22] = [
    "id",
    "category",
    "subcategory",
    "name",
    "minEntry",
    "roiAnnual",
    "risk",
    "liquidity",
    "complexity",
    "forecastCapital",
    "realCapital",
    "npv",
    "annualIncome",
    "actualProfit",
    "averageIncome",
    "totalInvested",
    "totalValue",
    "cagr",
    "p10",
    "p50",
    "p90",
    "notes",
];

pub fn write_csv<W: Write>(rows: &[ProjectionRow], writer: W) -> Result<(), String> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HEADER)
        .map_err(|e| format!("CSV write failed: {e}"))?;

    for row in rows {
        let result = &row.result;
        // Undefined metrics stay empty; an empty cell is the placeholder,
        // never a zero.
        let cagr = result.cagr.map(number).unwrap_or_default();
        let (p10, p50, p90) = match result.bands {
            Some(bands) => (number(bands.p10), number(bands.p50), number(bands.p90)),
            None => (String::new(), String::new(), String::new()),
        };

        out.write_record([
            row.option.id.to_string(),
            row.option.category.clone(),
            row.option.subcategory.clone(),
            row.option.name.clone(),
            number(row.option.min_entry),
            number(row.option.roi_annual),
            row.option.risk.label().to_string(),
            row.option.liquidity.label().to_string(),
            row.option.complexity.label().to_string(),
            number(result.forecast_capital),
            number(result.real_capital),
            number(result.npv),
            number(result.annual_income),
            number(result.actual_profit),
            number(result.average_income),
            number(result.total_invested),
            number(result.total_value),
            cagr,
            p10,
            p50,
            p90,
            row.option.notes.clone(),
        ])
        .map_err(|e| format!("CSV write failed: {e}"))?;
    }

    out.flush().map_err(|e| format!("CSV write failed: {e}"))
}

pub fn to_csv_string(rows: &[ProjectionRow]) -> Result<String, String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| format!("CSV produced invalid UTF-8: {e}"))
}

fn number(value: f64) -> String {
    format!("{value}")
}

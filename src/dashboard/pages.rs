//! Server-rendered HTML for the dashboard views.

use crate::core::{Prediction, PredictionRecord, PredictionStats};
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Prediction,
    Visualization,
}

impl Page {
    const ALL: [Page; 3] = [Page::Home, Page::Prediction, Page::Visualization];

    fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Prediction => "Make Prediction",
            Page::Visualization => "Data Visualization",
        }
    }

    fn href(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Prediction => "/predict",
            Page::Visualization => "/visualizations",
        }
    }
}

pub const INDUSTRY_SECTORS: [&str; 5] = ["Construction", "Retail", "Manufacturing", "Services", "Agriculture"];
pub const CREDIT_TYPES: [&str; 4] = ["Overdraft", "Term Loan", "Line of Credit", "Credit Card"];
pub const GUARANTEE_FLAGS: [&str; 2] = ["True", "False"];
pub const GUARANTEE_TYPES: [&str; 4] = ["Collateral", "Personal", "Corporate", "None"];
pub const REPAYMENT_FREQUENCIES: [&str; 4] = ["Monthly", "Quarterly", "Annually", "Bi-weekly"];

/// Numeric form inputs: (field, label, min, max, step, default).
pub const NUMBER_INPUTS: [(&str, &str, f64, Option<f64>, &str, &str); 8] = [
    ("age", "Age", 18.0, Some(100.0), "1", "30"),
    ("income", "Annual Income", 0.0, None, "1", "50000"),
    ("loan_amount", "Loan Amount", 0.0, None, "1", "20000"),
    ("interest_rate", "Interest Rate (%)", 0.0, Some(30.0), "0.01", "5.0"),
    ("turnover", "Business Turnover", 0.0, None, "1", "100000"),
    ("customer_tenure", "Customer Tenure (years)", 0.0, Some(50.0), "1", "2"),
    ("num_late_payments_current", "Number of Late Payments (current)", 0.0, None, "1", "0"),
    ("unpaid_amount", "Unpaid Amount", 0.0, None, "1", "0"),
];

/// Select inputs: (field, label, options).
pub const SELECT_INPUTS: [(&str, &str, &[&str]); 5] = [
    ("industry_sector", "Industry Sector", &INDUSTRY_SECTORS),
    ("credit_type", "Credit Type", &CREDIT_TYPES),
    ("has_guarantee", "Has Guarantee?", &GUARANTEE_FLAGS),
    ("guarantee_type", "Guarantee Type (if applicable)", &GUARANTEE_TYPES),
    ("repayment_frequency", "Repayment Frequency", &REPAYMENT_FREQUENCIES),
];

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; display: flex; color: #262730; }
nav { width: 220px; min-height: 100vh; background: #f0f2f6; padding: 1.5rem 1rem; }
nav a { display: block; padding: .4rem .5rem; color: inherit; text-decoration: none; border-radius: 4px; }
nav a.active { background: #ff4b4b; color: white; }
main { flex: 1; padding: 2rem 3rem; max-width: 900px; }
.metrics { display: flex; gap: 3rem; }
.metric .value { font-size: 2rem; }
.success { background: #d4edda; padding: 1rem; border-radius: 4px; }
.error { background: #f8d7da; padding: 1rem; border-radius: 4px; }
.bar-row { display: flex; align-items: center; margin: .25rem 0; }
.bar-label { width: 220px; }
.bar { background: #ff4b4b; height: 1.2rem; }
form label { display: block; margin-top: .6rem; }
table { border-collapse: collapse; } td, th { padding: .3rem .8rem; border-bottom: 1px solid #ddd; }
"#;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(active: Page, body: &str) -> String {
    let mut nav = String::from("<h2>Navigation</h2><p>Select a page:</p>");
    for page in Page::ALL {
        let class = if page == active { " class=\"active\"" } else { "" };
        let _ = write!(nav, "<a href=\"{}\"{}>{}</a>", page.href(), class, page.title());
    }

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Credit Scoring Application</title>\
         <style>{STYLE}</style></head><body><nav>{nav}</nav><main>\
         <h1>Credit Scoring Application</h1>\
         <p>This application predicts whether a loan applicant is likely to default (status = 1) or not (status = 0).</p>\
         {body}</main></body></html>"
    )
}

/// Horizontal bars scaled to the largest value.
pub fn bar_chart(rows: &[(String, f64)], format_value: impl Fn(f64) -> String) -> String {
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let mut html = String::from("<div class=\"chart\">");
    for (label, value) in rows {
        let width = if max > 0.0 { value / max * 100.0 } else { 0.0 };
        let _ = write!(
            html,
            "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
             <div class=\"bar\" style=\"width:{:.1}%\"></div>&nbsp;{}</div>",
            escape(label),
            width * 0.6,
            format_value(*value)
        );
    }
    html.push_str("</div>");
    html
}

pub fn home(stats: &PredictionStats, recent: &[PredictionRecord]) -> String {
    let mut body = String::from(
        "<h2>Welcome to the Credit Scoring System</h2>\
         <p>This system uses machine learning to assess credit risk based on applicant information.</p>\
         <h3>Key Metrics</h3><div class=\"metrics\">\
         <div class=\"metric\"><div>Model Accuracy</div><div class=\"value\">85%</div></div>\
         <div class=\"metric\"><div>Default Prediction Rate</div><div class=\"value\">12%</div></div>\
         </div>\
         <p>Navigate using the sidebar to make predictions or view data visualizations.</p>",
    );

    let _ = write!(
        body,
        "<h3>This Session</h3><div class=\"metrics\">\
         <div class=\"metric\"><div>Predictions</div><div class=\"value\">{}</div></div>\
         <div class=\"metric\"><div>High Risk</div><div class=\"value\">{} ({:.1}%)</div></div>\
         <div class=\"metric\"><div>Low Risk</div><div class=\"value\">{} ({:.1}%)</div></div>\
         </div><p>Average probability good: {:.2}%, bad: {:.2}%</p>",
        stats.total,
        stats.high_risk,
        stats.high_risk_percentage,
        stats.low_risk,
        stats.low_risk_percentage,
        stats.average_probability_good * 100.0,
        stats.average_probability_bad * 100.0,
    );

    if !recent.is_empty() {
        body.push_str(
            "<h3>Recent Predictions</h3><table><tr><th>Time</th><th>Sector</th>\
             <th>Loan Amount</th><th>Result</th><th>P(default)</th><th></th></tr>",
        );
        for record in recent {
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td>\
                 <td><form method=\"post\" action=\"/history/{}/delete\"><button>Delete</button></form></td></tr>",
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                escape(&record.input.industry_sector),
                record.input.loan_amount,
                escape(&record.result.risk_level),
                record.result.probability_bad * 100.0,
                escape(&record.id),
            );
        }
        body.push_str(
            "</table><form method=\"post\" action=\"/history/clear\"><button>Clear history</button></form><p><a href=\"/history/export\">Export CSV</a></p>",
        );
    }

    layout(Page::Home, &body)
}

fn prediction_form(values: &HashMap<String, String>) -> String {
    let mut form = String::from("<form method=\"post\" action=\"/predict\">");

    for (field, label, min, max, step, default) in NUMBER_INPUTS {
        let value = values.get(field).map(String::as_str).unwrap_or(default);
        let max_attr = max.map(|m| format!(" max=\"{}\"", m)).unwrap_or_default();
        let _ = write!(
            form,
            "<label>{label}<br><input type=\"number\" name=\"{field}\" min=\"{min}\"{max_attr} \
             step=\"{step}\" value=\"{}\" required></label>",
            escape(value)
        );
    }

    for (field, label, options) in SELECT_INPUTS {
        let selected = values.get(field).map(String::as_str);
        let _ = write!(form, "<label>{label}<br><select name=\"{field}\">");
        for (i, option) in options.iter().enumerate() {
            let is_selected = selected.map_or(i == 0, |s| s == *option);
            let attr = if is_selected { " selected" } else { "" };
            let _ = write!(form, "<option{attr}>{}</option>", escape(option));
        }
        form.push_str("</select></label>");
    }

    form.push_str("<p><button type=\"submit\">Assess Credit Risk</button></p></form>");
    form
}

pub fn prediction_page(
    values: &HashMap<String, String>,
    outcome: Option<Result<&Prediction, String>>,
) -> String {
    let mut body = String::from(
        "<h2>Loan Applicant Assessment</h2><p>Please enter the applicant details:</p>",
    );
    body.push_str(&prediction_form(values));

    match outcome {
        Some(Ok(prediction)) => {
            body.push_str("<h3>Credit Risk Assessment Result</h3>");
            if prediction.prediction == 1 {
                let _ = write!(
                    body,
                    "<div class=\"error\">High Risk: Potential default (Probability: {:.2}%)</div>",
                    prediction.probability_bad * 100.0
                );
            } else {
                let _ = write!(
                    body,
                    "<div class=\"success\">Low Risk: Likely to repay (Probability: {:.2}%)</div>",
                    prediction.probability_good * 100.0
                );
            }
            body.push_str("<p>Probability Breakdown:</p>");
            body.push_str(&bar_chart(
                &[
                    ("Good (Will repay)".to_string(), prediction.probability_good),
                    ("Bad (Likely to default)".to_string(), prediction.probability_bad),
                ],
                |v| format!("{:.4}", v),
            ));
        }
        Some(Err(message)) => {
            let _ = write!(
                body,
                "<div class=\"error\">Could not assess applicant: {}</div>",
                escape(&message)
            );
        }
        None => {}
    }

    layout(Page::Prediction, &body)
}

pub fn visualizations() -> String {
    let loan_amounts: Vec<(String, f64)> = [
        (10000, 120.0),
        (15000, 180.0),
        (20000, 220.0),
        (25000, 150.0),
        (30000, 100.0),
        (35000, 50.0),
        (40000, 30.0),
    ]
    .iter()
    .map(|(amount, count)| (amount.to_string(), *count))
    .collect();

    let default_rates: Vec<(String, f64)> = INDUSTRY_SECTORS
        .iter()
        .zip([0.15, 0.08, 0.10, 0.07, 0.12])
        .map(|(industry, rate)| (industry.to_string(), rate))
        .collect();

    let body = format!(
        "<h2>Data Visualizations</h2><p>Here are some insights from the credit data:</p>\
         <h3>Loan Amount Distribution</h3>{}\
         <h3>Default Rate by Industry</h3>{}",
        bar_chart(&loan_amounts, |v| format!("{}", v)),
        bar_chart(&default_rates, |v| format!("{:.2}", v)),
    );
    layout(Page::Visualization, &body)
}

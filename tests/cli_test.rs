mod common;

use serde_json::Value;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_credit-scoring"));
    let config = common::config();
    cmd.arg("--model-path")
        .arg(&config.artifacts.model_path)
        .arg("--columns-path")
        .arg(&config.artifacts.columns_path)
        .env_remove("CREDIT_SCORING_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_single_applicant_prints_assessment() {
    let output = cli()
        .arg(common::high_risk_applicant().to_string())
        .output()
        .unwrap();
    assert!(output.status.success());

    let result = stdout_json(&output);
    assert_eq!(result["prediction"], 1);
    assert_eq!(result["risk_level"], "High");
    assert_eq!(result["status"], "Rejected");
    assert_eq!(result["credit_score"], 300);
    let good = result["probability_good"].as_f64().unwrap();
    let bad = result["probability_bad"].as_f64().unwrap();
    assert!((good + bad - 1.0).abs() < 1e-9);
    assert!(!result["recommendations"].as_array().unwrap().is_empty());
}

#[test]
fn test_low_risk_applicant_is_approved() {
    let output = cli()
        .arg(common::low_risk_applicant().to_string())
        .output()
        .unwrap();
    assert!(output.status.success());

    let result = stdout_json(&output);
    assert_eq!(result["prediction"], 0);
    assert_eq!(result["status"], "Approved");
    assert!(result["recommendations"].as_array().unwrap().is_empty());
}

#[test]
fn test_missing_field_exits_with_error_json() {
    let mut payload = common::low_risk_applicant();
    payload.as_object_mut().unwrap().remove("guarantee_type");

    let output = cli().arg(payload.to_string()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output)["error"],
        "Missing required field: guarantee_type"
    );
}

#[test]
fn test_wrong_argument_count() {
    let output = cli().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["error"], "Invalid arguments");

    let output = cli().arg("{}").arg("{}").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["error"], "Invalid arguments");
}

#[test]
fn test_malformed_json_and_missing_artifact() {
    let output = cli().arg("{oops").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["error"].is_string());

    let output = Command::new(env!("CARGO_BIN_EXE_credit-scoring"))
        .args(["--model-path", "/nonexistent/model.json"])
        .arg(common::low_risk_applicant().to_string())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["error"]
        .as_str()
        .unwrap()
        .contains("Failed to load artifact"));
}

#[test]
fn test_batch_scores_csv_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("applicants.csv");
    let output_path = dir.path().join("scored.csv");
    std::fs::write(
        &input,
        "age,income,loan_amount,interest_rate,turnover,customer_tenure,num_late_payments_current,unpaid_amount,industry_sector,credit_type,has_guarantee,guarantee_type,repayment_frequency\n\
         45,90000,10000,4.5,250000,12,0,0,Services,Term Loan,True,Collateral,Monthly\n\
         22,18000,60000,19.5,20000,0,6,15000,Construction,Credit Card,False,None,Annually\n",
    )
    .unwrap();

    let output = cli()
        .arg("--batch")
        .arg(&input)
        .arg("--output")
        .arg(&output_path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));

    let summary = stdout_json(&output);
    assert_eq!(summary["rows"], 2);
    assert_eq!(summary["high_risk"], 1);

    let mut reader = csv::Reader::from_path(&output_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 18);
    assert_eq!(&headers[13], "prediction");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&rows[0][13], "0");
    assert_eq!(&rows[1][13], "1");
    assert_eq!(&rows[1][16], "High Risk");
}

#[test]
fn test_batch_reports_failing_row() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("applicants.csv");
    std::fs::write(&input, "age,income\n30,50000\n").unwrap();

    let output = cli()
        .arg("--batch")
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("out.csv"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let error = stdout_json(&output)["error"].as_str().unwrap().to_string();
    assert_eq!(error, "row 1: Missing required field: loan_amount");
}

const CSV_HEADER: &str = "age,income,loan_amount,interest_rate,turnover,customer_tenure,num_late_payments_current,unpaid_amount,industry_sector,credit_type,has_guarantee,guarantee_type,repayment_frequency";

#[test]
fn test_batch_writes_csv_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("applicants.csv");
    std::fs::write(
        &input,
        format!("{CSV_HEADER}\n45,90000,10000,4.5,250000,12,0,0,Services,Term Loan,True,Collateral,Monthly\n"),
    )
    .unwrap();

    let output = cli().arg("--batch").arg(&input).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));

    let mut reader = csv::Reader::from_reader(output.stdout.as_slice());
    assert_eq!(reader.headers().unwrap().len(), 18);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][13], "0");
}

#[test]
fn test_batch_failure_on_stdout_prints_only_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("applicants.csv");
    std::fs::write(
        &input,
        format!(
            "{CSV_HEADER}\n\
             45,90000,10000,4.5,250000,12,0,0,Services,Term Loan,True,Collateral,Monthly\n\
             45,abc,10000,4.5,250000,12,0,0,Services,Term Loan,True,Collateral,Monthly\n"
        ),
    )
    .unwrap();

    let output = cli().arg("--batch").arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    // stdout 只能有一個錯誤 JSON，不能夾帶已評分的列
    let error = stdout_json(&output)["error"].as_str().unwrap().to_string();
    assert_eq!(
        error,
        "row 2: Invalid input data: field 'income' must be numeric, got 'abc'"
    );
}

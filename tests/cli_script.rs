use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn script(home: &TempDir, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("budget_dashboard_cli").unwrap();
    cmd.env("BUDGET_DASHBOARD_CLI_SCRIPT", "1")
        .env("BUDGET_DASHBOARD_HOME", home.path())
        .env("NO_COLOR", "1")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "\
# January
income 1000 Salário NuBank --date 2024-01-05
expense 200 fixed-costs NuBank --sub Aluguel --date 2024-01-10
transfer 300 NuBank Caixa --date 2024-01-12
summary --year 2024 --months 1
exit
";
    script(&home, input)
        .success()
        .stdout(contains("SUCCESS"))
        .stdout(contains("R$ 1,000.00"))
        .stdout(contains("20.00%"))
        .stdout(contains("Caixa"));

    assert!(home.path().join("budget.db").exists());
}

#[test]
fn rejected_entries_do_not_stop_the_script() {
    let home = TempDir::new().unwrap();
    let input = "\
transfer 50 Vazio Caixa --date 2024-03-01
expense -5 leisure Caixa
balances
";
    script(&home, input)
        .success()
        .stdout(contains("insufficient funds in Vazio"))
        .stdout(contains("ERROR"))
        .stdout(contains("No rows with an account yet."));
}

#[test]
fn export_and_targets_from_the_shell() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("out.csv");
    let input = format!(
        "income 10 Outros Caixa --date 2024-05-01\ntargets set fixed-costs=45\nexport {}\n",
        out.display()
    );
    script(&home, &input)
        .success()
        .stdout(contains("targets must total exactly 100%"))
        .stdout(contains("Exported 1 row(s)"));

    let csv = std::fs::read_to_string(out).unwrap();
    assert!(csv.starts_with("id,date,type,category,amount"));
    assert!(!home.path().join("targets.json").exists());
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    script(&home, "sumary\n")
        .success()
        .stdout(contains("Unknown command `sumary`"))
        .stdout(contains("Suggestion: `summary`?"));
}

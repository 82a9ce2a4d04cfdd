use crate::utils::{DatasetFixture, PostingRow};
use jobmarket::algorithm::integration::default_macro_resolver;
use jobmarket::{Country, describe, run_all};

/// 100 postings across four countries, ten of them with garbage descriptions,
/// economics only for Spain and the United States
fn scenario() -> DatasetFixture {
    let countries = ["ES", "US", "DE", "FR"];
    let locations = [
        "Remote, Madrid 28080",
        "Hybrid - Berlin",
        "New York, NY 10001",
        "Teletrabajo en Barcelona",
        "Paris (75)",
    ];
    let rows: Vec<PostingRow> = (0..100)
        .map(|i| {
            let length = if i % 10 == 3 {
                "5".to_string()
            } else {
                (50 + i * 37 % 900).to_string()
            };
            let mut row = PostingRow::new(countries[i % 4], locations[i % 5], &length);
            row.url = format!("https://jobs.example.org/{i}");
            row
        })
        .collect();

    DatasetFixture::new()
        .with_postings(&rows)
        .with_macro(&[("ESP", "41234"), ("USA", "80000"), ("ITA", "38000")])
        .with_cost_of_living(&[("ES", 48.7, 18.2), ("US", 72.9, 43.1)])
}

#[test]
fn test_end_to_end_scenario() -> jobmarket::Result<()> {
    let fixture = scenario();
    let resolver = default_macro_resolver(&fixture.config);
    let report = run_all(&fixture.config, &resolver)?;

    assert_eq!(report.integration.postings_read, 100);
    assert_eq!(report.integration.output_rows, 100);
    assert!(!report.integration.macro_countries.contains(&Country::France));

    let summary = describe(&fixture.config.cleaned_path(), &fixture.config)?;
    assert!(summary.total_postings <= 90);
    assert_eq!(summary.total_postings, report.cleaning.output_rows);
    assert!(
        summary
            .by_country
            .keys()
            .all(|c| matches!(c, Country::Spain | Country::UnitedStates))
    );
    let desc = summary.desc_length.expect("rows remain");
    assert!(desc.min >= 20.0);

    // Germany and France have no salary and are dropped before the length filter
    assert_eq!(report.cleaning.missing_economics, 50);
    assert_eq!(report.cleaning.short_descriptions, 5);
    assert_eq!(report.cleaning.output_rows, 45);
    Ok(())
}

#[test]
fn test_summary_output() -> jobmarket::Result<()> {
    let fixture = scenario();
    let resolver = default_macro_resolver(&fixture.config);
    let report = run_all(&fixture.config, &resolver)?;

    let text = report.summary.to_string();
    assert!(text.starts_with("Job Market Summary:"));
    assert!(text.contains("ES: "));
    assert!(text.contains("US: "));
    assert!(!text.contains("DE: "));

    let json = serde_json::to_value(&report).map_err(jobmarket::PipelineError::Json)?;
    assert_eq!(json["cleaning"]["output_rows"], 45);
    assert_eq!(json["integration"]["macro_countries"], serde_json::json!(["ES", "US"]));
    Ok(())
}

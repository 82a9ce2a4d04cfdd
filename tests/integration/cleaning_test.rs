use crate::utils::{DatasetFixture, PostingRow};
use jobmarket::algorithm::integration::{IntegrationInputs, default_macro_resolver, integrate};
use jobmarket::algorithm::salary::adjusted_salary;
use jobmarket::common::traits::BatchAdapter;
use jobmarket::reader::{CsvReadOptions, read_csv};
use jobmarket::{CleanPosting, Country, PipelineError, clean, run_cleaning};

fn fixture_with_lengths(lengths: &[&str]) -> DatasetFixture {
    let rows: Vec<PostingRow> = lengths
        .iter()
        .enumerate()
        .map(|(i, len)| {
            let country = if i % 2 == 0 { "ES" } else { "UK" };
            PostingRow::new(country, "Teletrabajo en Madrid, España", len)
        })
        .collect();
    DatasetFixture::new()
        .with_postings(&rows)
        .with_macro(&[("ESP", "45678.91"), ("GBR", "52345.5")])
}

/// Integration and cleaning compute the same adjusted salary
#[test]
fn test_salary_agrees_between_stages() -> jobmarket::Result<()> {
    let fixture = fixture_with_lengths(&["120", "340", "560", "780"]);
    let resolver = default_macro_resolver(&fixture.config);
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    let (merged, _) = integrate(&inputs, &fixture.config)?;

    let merged_salaries: Vec<u64> = merged
        .rows
        .iter()
        .map(|r| r.adjusted_salary.expect("economics present").to_bits())
        .collect();

    let (cleaned, _) = clean(merged, &fixture.config)?;
    let cleaned_salaries: Vec<u64> = cleaned.rows.iter().map(|r| r.adjusted_salary.to_bits()).collect();
    assert_eq!(merged_salaries, cleaned_salaries);

    for row in &cleaned.rows {
        let again = adjusted_salary(Some(row.nominal_salary), Some(row.cost_of_living_index));
        assert_eq!(again.map(f64::to_bits), Some(row.adjusted_salary.to_bits()));
    }
    Ok(())
}

/// Every cleaned description length lies between the minimum and the upper bound
#[test]
fn test_description_length_bounds() -> jobmarket::Result<()> {
    let lengths = [
        "5", "12", "", "abc", "150", "220", "310", "400", "480", "520", "610", "700", "25000",
        "40000",
    ];
    let fixture = fixture_with_lengths(&lengths);
    let resolver = default_macro_resolver(&fixture.config);
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    let (merged, _) = integrate(&inputs, &fixture.config)?;

    let (cleaned, report) = clean(merged, &fixture.config)?;
    let fence = report.fence.expect("population is not empty");

    assert_eq!(report.short_descriptions, 4);
    assert_eq!(report.capped_descriptions, 2);
    assert_eq!(cleaned.len(), 10);
    for row in &cleaned.rows {
        assert!(row.desc_length >= 20.0);
        assert!(row.desc_length <= fence.upper_bound);
        assert!(row.cost_of_living_index > 0.0);
    }
    Ok(())
}

/// The cleaned file is written with the cleaning word list applied to cities
#[test]
fn test_run_cleaning_writes_file() -> jobmarket::Result<()> {
    let fixture = fixture_with_lengths(&["200", "300"]);
    let merged_path = fixture.config.merged_path();
    let resolver = default_macro_resolver(&fixture.config);
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    jobmarket::run_integration(&inputs, &fixture.config, &merged_path)?;

    let output = fixture.config.cleaned_path();
    let (_, report) = run_cleaning(&merged_path, &output, &fixture.config)?;
    assert_eq!(report.output_rows, 2);

    let text = fixture.read_output(&output);
    assert!(text.lines().next().expect("header").starts_with("titulo;empresa;pais;ciudad_limpia"));

    let batch = read_csv(&output, &CsvReadOptions::new(b';'))?;
    let rows = CleanPosting::from_record_batch(&batch)?;
    assert_eq!(rows[0].city, "Madrid");
    assert_eq!(rows[0].country, Country::Spain);
    assert_eq!(rows[1].country, Country::UnitedKingdom);
    assert!(rows.iter().all(|r| r.remote));
    Ok(())
}

/// A merged file lacking a required column is rejected
#[test]
fn test_missing_required_column_is_fatal() {
    let fixture = DatasetFixture::new();
    let input = fixture.write("merged.csv", "titulo;pais;desc_longitud\nAnalyst;ES;300\n");
    let output = fixture.path().join("clean.csv");

    let result = run_cleaning(&input, &output, &fixture.config);
    assert!(matches!(result, Err(PipelineError::ColumnNotFound { .. })));
    assert!(!output.exists());
}

use crate::utils::{DatasetFixture, POSTINGS_HEADER, PostingRow};
use jobmarket::algorithm::integration::{
    CostOfLivingSource, FixedPathResolver, IntegrationInputs, default_macro_resolver, integrate,
    run_integration,
};
use jobmarket::models::{CostOfLivingRecord, FALLBACK_COST_OF_LIVING};
use jobmarket::{Country, Modality, PipelineError, PostingTable};
use jobmarket::reader::{CsvReadOptions, read_csv};

/// Macro rows outside the five countries never reach the merged table
#[test]
fn test_macro_rows_outside_vocabulary_are_excluded() -> jobmarket::Result<()> {
    let fixture = DatasetFixture::new()
        .with_postings(&[
            PostingRow::new("ES", "Madrid", "300"),
            PostingRow::new("IT", "Roma", "300"),
        ])
        .with_macro(&[("ESP", "41234"), ("ITA", "38000")]);

    let resolver = default_macro_resolver(&fixture.config);
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    let (table, report) = integrate(&inputs, &fixture.config)?;

    assert_eq!(table.len(), 1);
    assert!(table.rows.iter().all(|r| r.country.is_some()));
    assert_eq!(report.macro_countries, vec![Country::Spain]);
    assert_eq!(report.macro_rows_out_of_scope, 1);
    assert_eq!(report.out_of_scope_postings, 1);
    Ok(())
}

/// Without a cost-of-living file every country gets the built-in indices
#[test]
fn test_fallback_cost_of_living_is_deterministic() -> jobmarket::Result<()> {
    let rows: Vec<PostingRow> = Country::ALL
        .iter()
        .map(|c| PostingRow::new(c.code(), "Somewhere", "100"))
        .collect();
    let fixture = DatasetFixture::new().with_postings(&rows);

    let resolver = default_macro_resolver(&fixture.config);
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    let (table, report) = integrate(&inputs, &fixture.config)?;

    assert_eq!(report.cost_of_living_source, CostOfLivingSource::Fallback);
    for (country, cost, rent) in FALLBACK_COST_OF_LIVING {
        let row = table
            .rows
            .iter()
            .find(|r| r.country == Some(country))
            .expect("one row per country");
        assert_eq!(row.cost_of_living_index, Some(cost));
        assert_eq!(row.rent_index, Some(rent));
        // No macro source, so no salary
        assert_eq!(row.nominal_salary, None);
        assert_eq!(row.adjusted_salary, None);
    }
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(CostOfLivingRecord::fallback_table().len(), 5);
    Ok(())
}

/// The merged file carries the remote example and the fixed column order
#[test]
fn test_merged_file_layout() -> jobmarket::Result<()> {
    let mut berlin = PostingRow::new("DE", "Hybrid - Berlin", "1200");
    berlin.modality = "Presencial".to_string();
    let mut madrid = PostingRow::new(" ES ", "Remote, Madrid 28080", "not a number");
    madrid.title = String::new();

    let fixture = DatasetFixture::new()
        .with_postings(&[berlin, madrid])
        .with_macro(&[("DEU", "58000"), ("ESP", "41234")])
        .with_cost_of_living(&[("ES", 48.7, 18.2), ("DE", 63.5, 22.8)]);

    let resolver = default_macro_resolver(&fixture.config);
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    let output = fixture.config.merged_path();
    run_integration(&inputs, &fixture.config, &output)?;

    let text = fixture.read_output(&output);
    let header = text.lines().next().expect("header");
    assert_eq!(
        header,
        "titulo;empresa;pais;ciudad_limpia;ubicacion_raw;salario_medio_ppp_2024;\
         indice_coste_vida_2024;indice_alquiler_2024;salario_real_ajustado;modalidad;\
         es_teletrabajo;desc_longitud;url"
    );
    assert!(std::fs::read(&output).map_err(PipelineError::Io)?.starts_with(b"\xEF\xBB\xBF"));

    let batch = read_csv(&output, &CsvReadOptions::new(b';'))?;
    let table = PostingTable::from_record_batch(&batch)?;

    let berlin = &table.rows[0];
    assert_eq!(berlin.remote, Some(true));
    assert_eq!(berlin.modality, Some(Modality::RemoteHybrid));
    assert_eq!(berlin.city.as_deref(), Some("Berlin"));
    assert_eq!(berlin.adjusted_salary, Some(91_338.58));

    let madrid = &table.rows[1];
    assert_eq!(madrid.country, Some(Country::Spain));
    assert_eq!(madrid.city.as_deref(), Some("Madrid"));
    assert_eq!(madrid.title.as_deref(), Some("Sin Título"));
    assert_eq!(madrid.desc_length, Some(0.0));
    assert_eq!(madrid.adjusted_salary, Some(84_669.4));
    Ok(())
}

/// Tests can hand the stage a macro file outside the dataset directory
#[test]
fn test_injected_macro_resolver() -> jobmarket::Result<()> {
    let fixture = DatasetFixture::new().with_postings(&[PostingRow::new("US", "New York, NY", "500")]);
    let elsewhere = tempfile::tempdir().map_err(PipelineError::Io)?;
    let macro_path = elsewhere.path().join("wages.csv");
    std::fs::write(&macro_path, "LOCATION,Value\nUSA,80000\n").map_err(PipelineError::Io)?;

    let resolver = FixedPathResolver(macro_path.clone());
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    let (table, report) = integrate(&inputs, &fixture.config)?;

    assert_eq!(report.macro_source, Some(macro_path));
    assert_eq!(table.rows[0].nominal_salary, Some(80_000.0));
    assert_eq!(table.rows[0].adjusted_salary, Some(109_739.37));
    assert_eq!(table.rows[0].city.as_deref(), Some("New York"));
    Ok(())
}

/// A missing postings file stops the stage and writes nothing
#[test]
fn test_missing_postings_is_fatal() {
    let fixture = DatasetFixture::new();
    let resolver = default_macro_resolver(&fixture.config);
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    let output = fixture.config.merged_path();

    let result = run_integration(&inputs, &fixture.config, &output);
    assert!(matches!(result, Err(PipelineError::File { .. })));
    assert!(!output.exists());
    assert_eq!(fixture.path().read_dir().map(|d| d.count()).unwrap_or(0), 0);
}

/// Scraper lines with too many or too few fields are skipped, not fatal
#[test]
fn test_malformed_posting_lines_are_skipped() -> jobmarket::Result<()> {
    let fixture = DatasetFixture::new().with_macro(&[("ESP", "41234"), ("USA", "80000")]);
    let postings = format!(
        "{POSTINGS_HEADER}\n\
         Data Analyst,Acme,ES,Madrid,Presencial,300,https://jobs.example.org/1\n\
         Data Analyst,Acme,ES,Madrid,Presencial,300,https://jobs.example.org/2,stray\n\
         BI Analyst,Globex,US,Austin,Remoto,450,https://jobs.example.org/3\n\
         Data Analyst,Acme,US\n"
    );
    fixture.write(&fixture.config.postings_file, &postings);

    let resolver = default_macro_resolver(&fixture.config);
    let inputs = IntegrationInputs::from_config(&fixture.config, &resolver);
    let output = fixture.config.merged_path();
    let (table, report) = run_integration(&inputs, &fixture.config, &output)?;

    assert_eq!(report.malformed_postings, 2);
    assert_eq!(report.postings_read, 2);
    assert_eq!(report.output_rows, 2);
    assert!(report.warnings.iter().any(|w| w.contains("2 malformed lines")));
    assert_eq!(table.rows[1].url.as_deref(), Some("https://jobs.example.org/3"));

    let text = fixture.read_output(&output);
    assert_eq!(text.lines().count(), 3);
    assert!(!text.contains("stray"));
    Ok(())
}

use anyhow::Result;
use tempfile::TempDir;
use top_times::app::{leaderboard, presenter};
use top_times::{Course, FileSource, TomlConfig, TopTimesEngine};

const EXPORT: &str = r#"{
  "Table1": {
    "Detail_Collection": [
      {"Event": "50 BA SCY", "Competition Category": "Boys", "Age Group": "8 and Under", "Time": "45.10", "Swim Date": "2024-05-04", "First": "Kai", "Last": "Moss"},
      {"Event": "50 BK SCY", "Competition Category": "Boys", "Age Group": "8 & Under", "Time": "44.20", "Swim Date": "2024-06-01", "First": "Eli", "Last": "Ford"},
      {"Event": "50 BK SCY", "Competition Category": "Boys", "Age Group": "8 & under", "Time": "NT", "First": "Ray"},
      {"Event": "400 Individual Medley SCY", "Competition Category": "Men", "Age Group": "Open", "Time": "4:10.55", "Swim Date": "2023-12-09", "First": "Tom", "Last": "Hale"},
      {"Event": "100 FR SCY", "Competition Category": "Men", "Age Group": "15 & Over", "Time": "49.90", "First": "Ian", "Last": "Cole"},
      {"Event": "100 FL SCY", "Competition Category": "Men", "Age Group": "13-14", "Time": "58.01", "First": "Jon"}
    ]
  }
}"#;

fn write_fixture(dir: &TempDir, config: &str) -> Result<TomlConfig> {
    let export_path = dir.path().join("top10.json");
    std::fs::write(&export_path, EXPORT)?;
    let normalized_path = export_path.to_str().unwrap().replace('\\', "/");

    let config_path = dir.path().join("top-times.toml");
    std::fs::write(
        &config_path,
        format!("[source]\nlocation = \"{}\"\n{}", normalized_path, config),
    )?;
    Ok(TomlConfig::from_file(&config_path)?)
}

/// With `BA = "BK"` configured, both backstroke dialects land in one event.
#[tokio::test]
async fn test_configured_backstroke_synonym() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = write_fixture(
        &temp_dir,
        r#"
[extract]
record_paths = ["Table2.Detail_Collection", "Table1.Detail_Collection"]

[normalizer.synonyms]
BA = "BK"
"#,
    )?;

    let engine = TopTimesEngine::with_options(config.build_source()?, config.load_options()?);
    let snapshot = engine.load().await?;
    assert_eq!(snapshot.record_path(), "Table1.Detail_Collection");

    let selection = snapshot.selection("SCY", "50 Backstroke", "M", "8 & Under")?;
    let state = leaderboard(&snapshot, &selection);
    let names: Vec<&str> = state.rows().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Eli Ford", "Kai Moss", "Ray"]);
    assert_eq!(state.rows()[2].date, presenter::PLACEHOLDER);
    Ok(())
}

/// Without the synonym, `50 BA` stays a separate event.
#[tokio::test]
async fn test_backstroke_dialects_stay_apart_by_default() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = write_fixture(&temp_dir, "")?;

    let engine = TopTimesEngine::with_options(config.build_source()?, config.load_options()?);
    let snapshot = engine.load().await?;

    assert_eq!(
        snapshot.catalog().events_for(Course::Scy),
        ["100 FL", "100 FR", "400 IM", "50 BA", "50 BK"]
    );
    let selection = snapshot.selection("SCY", "50 BK", "M", "8 & Under")?;
    assert_eq!(leaderboard(&snapshot, &selection).rows().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_program_order_catalog() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = write_fixture(&temp_dir, "[catalog]\norder = \"program\"\n")?;

    let engine = TopTimesEngine::with_options(config.build_source()?, config.load_options()?);
    let snapshot = engine.load().await?;

    assert_eq!(
        snapshot.catalog().events_for(Course::Scy),
        ["100 FR", "50 BK", "100 FL", "400 IM", "50 BA"]
    );
    assert_eq!(
        snapshot.catalog().age_groups(),
        ["8 & UNDER", "13-14", "15 & OVER", "OPEN"]
    );
    Ok(())
}

#[tokio::test]
async fn test_default_selection_renders_first_record() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = write_fixture(&temp_dir, "")?;

    let engine = TopTimesEngine::with_options(config.build_source()?, config.load_options()?);
    let snapshot = engine.load().await?;

    let selection = snapshot
        .complete_selection(None, None, None, None)
        .expect("first record is usable");
    assert_eq!(selection.stroke_distance, "50 BA");

    let mut out = Vec::new();
    presenter::render(
        &leaderboard(&snapshot, &selection),
        Some(&selection),
        presenter::OutputFormat::Csv,
        &mut out,
    )?;
    assert_eq!(
        String::from_utf8(out)?,
        "rank,name,time,date\n1,Kai Moss,45.10,2024-05-04\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_load_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let engine = TopTimesEngine::new(FileSource::new(temp_dir.path().join("absent.json")));

    let err = engine.load().await.unwrap_err();
    assert_eq!(err.user_friendly_message(), presenter::LOAD_FAILED_MESSAGE);
    Ok(())
}

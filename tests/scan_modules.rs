mod support;

use anyhow::Result;
use modgrep::{
    DecodeError, DecodedModule, KeywordSet, ModuleDecoder, ModuleFormat, NativeDecoder, ScanConfig,
    ScanError, Scanner,
};

fn scan(bytes: &[u8], keywords: &[&str]) -> (modgrep::Result<modgrep::ScanSummary>, Vec<String>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = support::write_file(dir.path(), "song", bytes);
    let keywords = KeywordSet::new(keywords.iter().copied()).expect("keywords");
    let scanner = Scanner::new(NativeDecoder::default(), ScanConfig::default());

    let mut out = Vec::new();
    let result = scanner.scan_file(&path, &keywords, &mut out);
    let prefix = format!("{}: ", path.display());
    let lines = String::from_utf8(out)
        .expect("utf-8 report")
        .lines()
        .map(|line| line.strip_prefix(&prefix).unwrap_or(line).to_string())
        .collect();
    (result, lines)
}

#[test]
fn reference_scenario_reports_two_lines() -> Result<()> {
    let data = support::impulse("demo", Some("Greetings Earth"), &["kick_DRUM"], &["Lead Synth"]);
    let (result, lines) = scan(&data, &["drum", "synth", "xyz"]);

    let summary = result?;
    assert_eq!(summary.fields, 3);
    assert_eq!(summary.matches, 2);
    assert_eq!(
        lines,
        vec![
            "found 'drum' in sample 1: kick_DRUM",
            "found 'synth' in instrument 1: Lead Synth",
        ]
    );
    Ok(())
}

#[test]
fn message_matches_come_first() -> Result<()> {
    let data = support::impulse("demo", Some("Thanks to\nthe Drum crew"), &["Drum loop"], &["drums"]);
    let (result, lines) = scan(&data, &["DRUM"]);

    result?;
    assert_eq!(
        lines,
        vec![
            "found 'DRUM' in message",
            "found 'DRUM' in sample 1: Drum loop",
            "found 'DRUM' in instrument 1: drums",
        ]
    );
    Ok(())
}

#[test]
fn protracker_sample_names() -> Result<()> {
    let data = support::protracker("mod title", &["bass", "", "BassDrum"]);
    let (result, lines) = scan(&data, &["bass"]);

    assert_eq!(result?.fields, 31);
    assert_eq!(
        lines,
        vec!["found 'bass' in sample 1: bass", "found 'bass' in sample 3: BassDrum"]
    );
    Ok(())
}

#[test]
fn soundtracker_sample_names() -> Result<()> {
    let data = support::soundtracker("old school", &["st-01:strings", "st-02:bassdrum"]);
    let (result, lines) = scan(&data, &["drum"]);

    assert_eq!(result?.fields, 15);
    assert_eq!(lines, vec!["found 'drum' in sample 2: st-02:bassdrum"]);
    Ok(())
}

#[test]
fn title_resembling_lha_method_is_scanned_as_module() -> Result<()> {
    let data = support::protracker("x-lh5-remix", &["kick"]);
    assert!(!modgrep::is_lha_compressed(&data));

    let (result, lines) = scan(&data, &["kick"]);
    result?;
    assert_eq!(lines, vec!["found 'kick' in sample 1: kick"]);
    Ok(())
}

#[test]
fn scream_tracker_sample_names() -> Result<()> {
    let data = support::scream3("s3m", &["Piano", "e-piano", "strings"]);
    let (result, lines) = scan(&data, &["piano", "string"]);

    result?;
    assert_eq!(
        lines,
        vec![
            "found 'piano' in sample 1: Piano",
            "found 'piano' in sample 2: e-piano",
            "found 'string' in sample 3: strings",
        ]
    );
    Ok(())
}

#[test]
fn fasttracker_numbers_samples_across_instruments() -> Result<()> {
    let data = support::fasttracker(
        "xm",
        &[("Lead", &["lead saw", "lead sq"]), ("Drums", &["kick", "snare"])],
    );
    let (result, lines) = scan(&data, &["sn", "lead"]);

    let summary = result?;
    assert_eq!(summary.fields, 6);
    assert_eq!(
        lines,
        vec![
            "found 'lead' in sample 1: lead saw",
            "found 'lead' in sample 2: lead sq",
            "found 'sn' in sample 4: snare",
            "found 'lead' in instrument 1: Lead",
        ]
    );
    Ok(())
}

#[test]
fn duplicate_keywords_are_reported_each_time() -> Result<()> {
    let data = support::protracker("t", &["Vox"]);
    let (result, lines) = scan(&data, &["vox", "VOX"]);

    result?;
    assert_eq!(
        lines,
        vec!["found 'vox' in sample 1: Vox", "found 'VOX' in sample 1: Vox"]
    );
    Ok(())
}

#[test]
fn lha_archived_module_is_unpacked() -> Result<()> {
    let module = support::protracker("packed", &["archived kick"]);
    let archive = support::lha_stored("packed.mod", &module);
    assert!(modgrep::is_lha_compressed(&archive));

    let decoded = NativeDecoder::default().decode(&archive)?;
    assert_eq!(decoded.format, ModuleFormat::ProTracker);
    assert_eq!(decoded.sample_name(0).as_deref(), Some("archived kick"));

    let (result, lines) = scan(&archive, &["kick"]);
    result?;
    assert_eq!(lines, vec!["found 'kick' in sample 1: archived kick"]);
    Ok(())
}

#[test]
fn truncated_module_is_a_decode_failure() {
    let data = support::impulse("demo", None, &["a", "b"], &["c"]);
    let (result, lines) = scan(&data[..data.len() - 60], &["a"]);

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Decode {
            source: DecodeError::Truncated { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("could not initialize: truncated module"));
    assert!(lines.is_empty());
}

#[test]
fn unknown_data_is_a_decode_failure() {
    let (result, lines) = scan(b"just some text, not a module", &["text"]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), modgrep::EXIT_DECODE);
    assert!(err.to_string().ends_with("could not initialize: unrecognized module format"));
    assert!(lines.is_empty());
}

#[test]
fn file_size_cap_applies_before_decoding() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = support::write_file(dir.path(), "big.mod", &support::protracker("t", &["x"]));
    let scanner = Scanner::new(
        NativeDecoder::default(),
        ScanConfig::default().with_max_file_size(100),
    );
    let keywords = KeywordSet::new(["x"]).expect("keywords");

    let err = scanner
        .scan_file(&path, &keywords, std::io::sink())
        .unwrap_err();
    assert!(matches!(err, ScanError::TooLarge { .. }));
    assert_eq!(err.exit_code(), modgrep::EXIT_SIZE);
}

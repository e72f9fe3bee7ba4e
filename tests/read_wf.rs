use std::io::Write;
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};

use wf_reader::{Feature, SyntaxError, WfDataset, WfError, WfReader, WfWriter, Window};

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

fn read(content: &str) -> Result<WfDataset, WfError> {
    let file = write_temp(content);
    WfReader::default().read_wf_file(file.path())
}

fn scalars(values: &[f64]) -> Window {
    values.iter().map(|&v| Feature::Scalar(v)).collect::<Vec<_>>().into()
}

#[test]
fn reads_basic_file() -> Result<(), WfError> {
    let ds = read(
        "attributeCount: 2\nmean\nstdev\nclassName: A\nexampleCount: 1\n1.5 2.5\n",
    )?;
    assert_eq!(ds.attribute_names, vec!["mean", "stdev"]);
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.windows("A").unwrap(), &[scalars(&[1.5, 2.5])]);
    Ok(())
}

#[test]
fn reads_vector_feature() -> Result<(), WfError> {
    let ds = read("attributeCount: 0\nclassName: A\nexampleCount: 1\n1.0 [ 2.0 3.0 4.0 ] 5.0\n")?;
    assert_eq!(
        ds.windows("A").unwrap()[0].features,
        vec![
            Feature::Scalar(1.0),
            Feature::Vector(vec![2.0, 3.0, 4.0]),
            Feature::Scalar(5.0),
        ]
    );
    Ok(())
}

#[test]
fn nan_tokens_read_as_zero() -> Result<(), WfError> {
    let ds = read(
        "attributeCount: 0\nclassName: A\nexampleCount: 2\nnan 1.0\n-inf [ Inf NaN -nan 2 ] inf\n",
    )?;
    let windows = ds.windows("A").unwrap();
    assert_eq!(windows[0], scalars(&[0.0, 1.0]));
    assert_eq!(
        windows[1].features,
        vec![
            Feature::Scalar(0.0),
            Feature::Vector(vec![0.0, 0.0, 0.0, 2.0]),
            Feature::Scalar(0.0),
        ]
    );
    Ok(())
}

#[test]
fn repeated_labels_concatenate_in_file_order() -> Result<(), WfError> {
    let ds = read(
        "attributeCount: 1\nx\n\
         className: A\nexampleCount: 1\n1\n\
         className: B\nexampleCount: 1\n9\n\
         className: A\nexampleCount: 1\n2\n",
    )?;
    assert_eq!(ds.class_labels().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(ds.windows("A").unwrap(), &[scalars(&[1.0]), scalars(&[2.0])]);
    Ok(())
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.wf");
    let err = WfReader::default().read_wf_file(&path).unwrap_err();
    match err {
        WfError::NotFound { path: reported } => assert_eq!(reported, path),
        other => panic!("expected NotFound, got {other}"),
    }
    assert!(!path.exists());
}

#[test]
fn directory_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let err = WfReader::default().read_wf_file(dir.path()).unwrap_err();
    assert!(matches!(err, WfError::NotFound { .. }));
}

#[test]
fn bad_token_reports_line_number() {
    let err = read("attributeCount: 1\nx\nclassName: A\nexampleCount: 2\n1\n1 abc\n").unwrap_err();
    assert_eq!(err.line(), Some(6));
    assert!(matches!(
        err,
        WfError::Malformed { source: SyntaxError::InvalidNumber(ref t), .. } if t == "abc"
    ));
}

#[test]
fn unterminated_vector_is_malformed() {
    let err = read("attributeCount: 0\nclassName: A\nexampleCount: 1\n1 [ 2 3\n").unwrap_err();
    assert!(matches!(
        err,
        WfError::Malformed { line: 4, source: SyntaxError::UnterminatedVector }
    ));
}

#[test]
fn missing_separator_on_label_is_malformed() {
    let err = read("attributeCount: 0\nA\nexampleCount: 1\n1\n").unwrap_err();
    assert!(matches!(
        err,
        WfError::Malformed { line: 2, source: SyntaxError::MissingSeparator(':') }
    ));
}

#[test]
fn short_attribute_list_is_premature_end() {
    let err = read("attributeCount: 3\nmean\nstdev\n").unwrap_err();
    assert!(matches!(err, WfError::PrematureEnd { line: 3, .. }), "{err}");
}

#[test]
fn missing_example_count_is_premature_end() {
    let err = read("attributeCount: 0\nclassName: A\n").unwrap_err();
    assert!(matches!(err, WfError::PrematureEnd { line: 2, .. }), "{err}");
}

#[test]
fn window_width_is_not_checked_against_header() -> Result<(), WfError> {
    let ds = read("attributeCount: 2\na\nb\nclassName: A\nexampleCount: 2\n1 2 3\n[ 4 5 ]\n")?;
    let windows = ds.windows("A").unwrap();
    assert_eq!(windows[0].len(), 3);
    assert_eq!(windows[1].len(), 1);
    Ok(())
}

#[test]
fn written_file_reads_back_equal() -> Result<(), Box<dyn std::error::Error>> {
    let original = read(
        "attributeCount: 3\nmean\nstdev\ntrace\n\
         className: walk\nexampleCount: 2\n0.25 1e-3 [ 1 2 3 ]\n-4 0 [ ]\n\
         className: idle\nexampleCount: 0\n\
         className: walk\nexampleCount: 1\n7 8 [ 9 ]\n",
    )?;

    let dir = TempDir::new()?;
    let path = dir.path().join("copy.wf");
    WfWriter::default().write_file(&original, &path)?;
    let copy = read_path(&path)?;

    assert_eq!(copy, original);
    assert_eq!(copy.windows("walk").map(<[Window]>::len), Some(3));
    assert_eq!(copy.windows("idle").map(<[Window]>::len), Some(0));
    Ok(())
}

fn read_path(path: &Path) -> Result<WfDataset, WfError> {
    WfReader::default().read_wf_file(path)
}

#[test]
fn read_file_matches_read_wf_file() -> Result<(), WfError> {
    let file = write_temp("attributeCount: 1\nx\nclassName: A\nexampleCount: 1\n[ 1 2 ]\n");
    let reader = WfReader::default();
    assert_eq!(reader.read_file(file.path())?, reader.read_wf_file(file.path())?);

    let missing = file.path().with_extension("absent");
    assert!(matches!(reader.read_file(&missing), Err(WfError::NotFound { .. })));
    Ok(())
}

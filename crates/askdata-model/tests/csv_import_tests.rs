use askdata_model::{
    import_csv, ColumnType, CsvImportError, CsvOptions, Dataset, TextEncoding, Value,
};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn import(text: &str) -> Dataset {
    import_csv(Cursor::new(text.as_bytes().to_vec()), CsvOptions::default()).unwrap()
}

fn types(ds: &Dataset) -> Vec<ColumnType> {
    ds.columns().iter().map(|c| c.column_type).collect()
}

#[test]
fn infers_number_text_and_boolean_columns() {
    let ds = import(
        "channel,resume_score,hired\n\
         LinkedIn,82,True\n\
         Referral,91.5,False\n\
         Indeed,,True\n",
    );

    assert_eq!(
        ds.column_names(),
        vec!["channel", "resume_score", "hired"]
    );
    assert_eq!(
        types(&ds),
        vec![ColumnType::Text, ColumnType::Number, ColumnType::Boolean]
    );
    assert_eq!(ds.row_count(), 3);
    assert_eq!(ds.value(1, "resume_score"), Some(&Value::from(91.5)));
    assert_eq!(ds.value(2, "resume_score"), Some(&Value::Blank));
    assert_eq!(ds.value(0, "hired"), Some(&Value::from(true)));
    assert_eq!(ds.value(0, "channel"), Some(&Value::from("LinkedIn")));
}

#[test]
fn one_bad_number_makes_a_column_text() {
    let ds = import("code\n10\n20\nA7\n");
    assert_eq!(types(&ds), vec![ColumnType::Text]);
    assert_eq!(ds.value(0, "code"), Some(&Value::from("10")));
}

#[test]
fn a_late_non_number_keeps_the_column_text() {
    let mut text = String::from("code\n");
    for i in 0..100 {
        text.push_str(&format!("{i}\n"));
    }
    text.push_str("X7\n");
    let ds = import(&text);
    assert_eq!(types(&ds), vec![ColumnType::Text]);
    assert_eq!(ds.row_count(), 101);
    assert_eq!(ds.value(100, "code"), Some(&Value::from("X7")));
}

#[test]
fn missing_value_tokens_are_blank() {
    let ds = import("sales,note\n10,NA\nNA,null\n30,N/A\n");
    assert_eq!(types(&ds), vec![ColumnType::Number, ColumnType::Text]);
    assert_eq!(ds.value(1, "sales"), Some(&Value::Blank));
    assert_eq!(ds.value(0, "note"), Some(&Value::Blank));

    let options = CsvOptions {
        missing_values: vec!["-".into()],
        ..CsvOptions::default()
    };
    let ds = import_csv(Cursor::new(b"n\n1\n-\nNA\n".to_vec()), options).unwrap();
    assert_eq!(types(&ds), vec![ColumnType::Text]);
    assert_eq!(ds.value(1, "n"), Some(&Value::Blank));
    assert_eq!(ds.value(2, "n"), Some(&Value::from("NA")));
}

#[test]
fn yes_no_columns_stay_text() {
    let ds = import("member\nyes\nno\nyes\n");
    assert_eq!(types(&ds), vec![ColumnType::Text]);
    assert_eq!(ds.value(0, "member"), Some(&Value::from("yes")));
}

#[test]
fn ragged_rows_are_padded_and_missing_headers_named() {
    let ds = import("a,b\n1,2,3\n4\n");
    assert_eq!(ds.column_names(), vec!["a", "b", "Column3"]);
    assert_eq!(ds.value(1, "b"), Some(&Value::Blank));
    assert_eq!(ds.value(0, "Column3"), Some(&Value::from(3)));
}

#[test]
fn headerless_input_uses_generated_names() {
    let options = CsvOptions {
        has_header: false,
        ..CsvOptions::default()
    };
    let ds = import_csv(Cursor::new(b"east,10\nwest,20\n".to_vec()), options).unwrap();
    assert_eq!(ds.column_names(), vec!["Column1", "Column2"]);
    assert_eq!(ds.row_count(), 2);
}

#[test]
fn semicolon_delimiter_and_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"region;sales\neast;10\n");
    let options = CsvOptions {
        delimiter: b';',
        ..CsvOptions::default()
    };
    let ds = import_csv(Cursor::new(bytes), options).unwrap();
    assert_eq!(ds.column_names(), vec!["region", "sales"]);
    assert_eq!(types(&ds), vec![ColumnType::Text, ColumnType::Number]);
}

#[test]
fn auto_encoding_falls_back_to_windows_1252() {
    // 0xE9 is `é` in Windows-1252 and invalid on its own in UTF-8.
    let bytes = b"city\nCaf\xE9\n".to_vec();
    let ds = import_csv(Cursor::new(bytes), CsvOptions::default()).unwrap();
    assert_eq!(ds.value(0, "city"), Some(&Value::from("Café")));
}

#[test]
fn strict_utf8_reports_location() {
    let options = CsvOptions {
        encoding: TextEncoding::Utf8,
        ..CsvOptions::default()
    };
    let err = import_csv(Cursor::new(b"city\nCaf\xE9\n".to_vec()), options).unwrap_err();
    match err {
        CsvImportError::InvalidUtf8 { record, field } => {
            assert_eq!((record, field), (2, 1));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_input_is_rejected() {
    let err = import_csv(Cursor::new(Vec::new()), CsvOptions::default()).unwrap_err();
    assert!(matches!(err, CsvImportError::EmptyInput));
}

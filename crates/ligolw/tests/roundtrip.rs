// ligolw - LIGO_LW tabular data interchange
//
// Copyright (c) 2025 The ligolw developers.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end file round trips through the public API.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use ligolw::{
    compare_cells, find_column, Cell, ColumnType, ElementOrder, TableReader, TableWriter, Value,
};

/// Write a three-column table with two rows, returning the file path.
fn write_sample(path: &std::path::Path) {
    let mut w = TableWriter::create(path).unwrap();
    w.set_table_name("proc:process:table").unwrap();
    w.set_comment("generated by the test suite").unwrap();
    w.push_column("proc:process:program", ColumnType::Lstring)
        .unwrap();
    w.push_column("proc:process:jobid", ColumnType::Int4S).unwrap();
    w.push_column("proc:process:snr", ColumnType::Real8).unwrap();

    w.set_cell(0, Cell::new(Value::Lstring("lalapps_inspiral".into())))
        .unwrap();
    w.set_cell(1, Cell::new(Value::Int4S(1001))).unwrap();
    w.set_cell(2, Cell::new(Value::Real8(7.125))).unwrap();
    w.put_row().unwrap();

    w.set_cell(0, Cell::new(Value::Lstring("lalapps_burst".into())))
        .unwrap();
    w.set_cell(1, Cell::null(ColumnType::Int4S)).unwrap();
    w.set_cell(2, Cell::new(Value::Real8(-0.5))).unwrap();
    w.put_row().unwrap();
    w.close().unwrap();
}

// ==================== File round-trip tests ====================

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("process.xml");
    write_sample(&path);

    let mut r = TableReader::open(&path).unwrap();
    r.open_table(Some("process")).unwrap();
    assert_eq!(r.table().name, "proc:process:table");
    assert_eq!(
        r.table().comment.as_deref(),
        Some("generated by the test suite")
    );

    let program = r.find_column("program").unwrap();
    let jobid = find_column(r.table(), "JOBID").unwrap();
    let snr = r.find_column("snr").unwrap();
    assert_eq!(r.column_name(program), Some("program"));

    assert!(r.next_row().unwrap());
    assert_eq!(
        r.table().cells[program].value,
        Value::Lstring("lalapps_inspiral".into())
    );
    assert_eq!(r.table().cells[jobid].value, Value::Int4S(1001));
    assert_eq!(r.table().cells[snr].value, Value::Real8(7.125));

    assert!(r.next_row().unwrap());
    assert!(r.table().cells[jobid].is_null());
    assert_eq!(r.table().cells[snr].value, Value::Real8(-0.5));

    assert!(!r.next_row().unwrap());
    assert_eq!(r.rows_read(), 2);
    r.close().unwrap();
}

#[test]
fn test_gzip_transparency() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("data.xml");
    write_sample(&plain);

    // Recompress the same bytes and read through the gzip path.
    let gz = dir.path().join("data.xml.gz");
    let bytes = std::fs::read(&plain).unwrap();
    let mut enc = GzEncoder::new(std::fs::File::create(&gz).unwrap(), Compression::default());
    enc.write_all(&bytes).unwrap();
    enc.finish().unwrap();

    let mut r = TableReader::open(&gz).unwrap();
    r.open_table(None).unwrap();
    let mut rows = 0;
    while r.next_row().unwrap() {
        rows += 1;
    }
    assert_eq!(rows, 2);
    r.close().unwrap();
}

#[test]
fn test_every_column_type_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.xml");

    let values = vec![
        (ColumnType::Int2S, Value::Int2S(-32768)),
        (ColumnType::Int2U, Value::Int2U(65535)),
        (ColumnType::Int4S, Value::Int4S(-7)),
        (ColumnType::Int4U, Value::Int4U(4_000_000_000)),
        (ColumnType::Int8S, Value::Int8S(i64::MIN)),
        (ColumnType::Int8U, Value::Int8U(u64::MAX)),
        (ColumnType::Real4, Value::Real4(0.1)),
        (ColumnType::Real8, Value::Real8(std::f64::consts::PI)),
        (ColumnType::Complex8, Value::Complex8(1.5, -0.25)),
        (ColumnType::Complex16, Value::Complex16(-3.0, 4.0)),
        (ColumnType::Lstring, Value::Lstring("a,b\\c\"d<e>".into())),
        (ColumnType::IlwdChar, Value::Lstring("sngl_burst:event_id:0".into())),
        (ColumnType::CharS, Value::Lstring("H1".into())),
        (ColumnType::CharV, Value::Lstring("variable length".into())),
        (ColumnType::IlwdCharU, Value::Blob(vec![0, 1, 2, 0xff, b'"'])),
        (ColumnType::Blob, Value::Blob(b"arbitrary bytes \x00\x01".to_vec())),
    ];

    let mut w = TableWriter::create(&path).unwrap();
    w.set_table_name("alltypes:table").unwrap();
    for (i, (ty, _)) in values.iter().enumerate() {
        w.push_column(format!("c{i}"), *ty).unwrap();
    }
    for (i, (_, v)) in values.iter().enumerate() {
        w.set_cell(i, Cell::new(v.clone())).unwrap();
    }
    w.put_row().unwrap();
    w.close().unwrap();

    let mut r = TableReader::open(&path).unwrap();
    r.open_table(Some("alltypes")).unwrap();
    assert!(r.next_row().unwrap());
    for (i, (_, expected)) in values.iter().enumerate() {
        assert_eq!(&r.table().cells[i].value, expected, "column {i}");
    }
    assert!(!r.next_row().unwrap());
    r.close().unwrap();
}

#[test]
fn test_custom_delimiter_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("semicolons.xml");

    let mut w = TableWriter::create(&path).unwrap();
    w.set_table_name("t").unwrap();
    w.set_delimiter(b';').unwrap();
    w.push_column("text", ColumnType::Lstring).unwrap();
    w.push_column("n", ColumnType::Int4S).unwrap();
    w.set_cell(0, Cell::new(Value::Lstring("a;b,c".into()))).unwrap();
    w.set_cell(1, Cell::new(Value::Int4S(1))).unwrap();
    w.put_row().unwrap();
    w.close().unwrap();

    let mut r = TableReader::open(&path).unwrap();
    r.open_table(None).unwrap();
    assert_eq!(r.table().stream.delimiter, b';');
    assert!(r.next_row().unwrap());
    assert_eq!(r.table().cells[0].value, Value::Lstring("a;b,c".into()));
}

// ==================== Table selection tests ====================

#[test]
fn test_select_table_by_name_in_handwritten_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.xml");
    std::fs::write(
        &path,
        "<?xml version='1.0' encoding='utf-8'?>\n\
         <LIGO_LW>\n\
         \t<Table Name=\"grp:sngl_inspiral:table\">\n\
         \t\t<Column Name=\"grp:sngl_inspiral:mass\" Type=\"real_4\"/>\n\
         \t\t<Stream Name=\"grp:sngl_inspiral:table\" Type=\"Local\" Delimiter=\",\">\n\
         \t\t\t1.4,\n\t\t\t2.6\n\t\t</Stream>\n\t</Table>\n\
         \t<Table Name=\"grp:sngl_burst:table\">\n\
         \t\t<Column Name=\"grp:sngl_burst:snr\" Type=\"real_8\"/>\n\
         \t\t<Stream Name=\"grp:sngl_burst:table\" Type=\"Local\" Delimiter=\",\">\n\
         \t\t\t9.5\n\t\t</Stream>\n\t</Table>\n\
         </LIGO_LW>\n",
    )
    .unwrap();

    let mut r = TableReader::open(&path).unwrap();
    r.open_table(Some("sngl_burst")).unwrap();
    assert_eq!(r.table().name, "grp:sngl_burst:table");
    assert!(r.next_row().unwrap());
    assert_eq!(r.table().cells[0].value, Value::Real8(9.5));
    assert!(!r.next_row().unwrap());
    r.close().unwrap();
}

#[test]
fn test_missing_table_is_semantic_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.xml");
    write_sample(&path);

    let mut r = TableReader::open(&path).unwrap();
    let err = r.open_table(Some("sim_inspiral")).unwrap_err();
    assert_eq!(err.kind, ligolw::LigolwErrorKind::Semantic);
    assert!(err.message.contains("sim_inspiral"));
}

// ==================== Session lifecycle tests ====================

#[test]
fn test_close_and_abort_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("life.xml");
    write_sample(&path);

    let mut r = TableReader::open(&path).unwrap();
    r.open_table(None).unwrap();
    assert!(r.next_row().unwrap());
    r.close().unwrap();
    r.close().unwrap();

    let mut r = TableReader::open(&path).unwrap();
    r.abort();
    r.abort();
}

// ==================== Comparison tests ====================

#[test]
fn test_compare_rows_across_width() {
    let dir = tempfile::tempdir().unwrap();
    let narrow = dir.path().join("narrow.xml");
    let wide = dir.path().join("wide.xml");

    let mut w = TableWriter::create(&narrow).unwrap();
    w.push_column("v", ColumnType::Int2S).unwrap();
    w.set_cell(0, Cell::new(Value::Int2S(42))).unwrap();
    w.put_row().unwrap();
    w.close().unwrap();

    let mut w = TableWriter::create(&wide).unwrap();
    w.push_column("v", ColumnType::Int8S).unwrap();
    w.set_cell(0, Cell::new(Value::Int8S(42))).unwrap();
    w.put_row().unwrap();
    w.close().unwrap();

    let mut a = TableReader::open(&narrow).unwrap();
    a.open_table(None).unwrap();
    assert!(a.next_row().unwrap());
    let mut b = TableReader::open(&wide).unwrap();
    b.open_table(None).unwrap();
    assert!(b.next_row().unwrap());

    assert_eq!(
        compare_cells(&a.table().cells[0], &b.table().cells[0]),
        ElementOrder::Equal
    );
}

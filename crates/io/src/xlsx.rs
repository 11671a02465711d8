// Excel import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: first worksheet, row 0 = headers. Cell values are decoded as
// calamine extracted them - date-formatted cells arrive as serials and are
// resolved here, not downstream.
// Export: presentation snapshot for sharing. Not a round-trip format.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};

use cartera_core::classify::{PolicyStatus, ReceivableStatus};
use cartera_core::dates::{format_ymd, resolve_date_str, resolve_serial};
use cartera_core::row::{RawRow, RawValue};
use cartera_core::summary::InsurerSummary;
use cartera_core::{Policy, Receivable};

/// Read the first worksheet into raw rows. Fully blank rows are dropped.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| e.to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no sheets".to_string())?
        .map_err(|e| e.to_string())?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_cells) => header_cells.iter().map(|c| decode_cell(c).as_text()).collect(),
        None => return Ok(Vec::new()),
    };

    let mut out = Vec::new();
    for cells in rows {
        let mut row = RawRow::new();
        for (i, cell) in cells.iter().enumerate() {
            let Some(header) = headers.get(i) else { break };
            row.insert(header, decode_cell(cell));
        }
        if !row.is_empty() {
            out.push(row);
        }
    }
    Ok(out)
}

fn decode_cell(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Empty,
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(dt) => match resolve_serial(dt.as_f64()) {
            Some(d) => RawValue::Date(d),
            None => RawValue::Empty,
        },
        Data::DateTimeIso(s) => match resolve_date_str(s) {
            Some(d) => RawValue::Date(d),
            None => RawValue::Text(s.clone()),
        },
        Data::DurationIso(s) => RawValue::Text(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

// Headers stay in the staff's working language; the import alias tables
// accept them back.
const RECEIVABLE_HEADERS: &[&str] = &[
    "Aseguradora",
    "Nombre",
    "Documento",
    "Asesor",
    "Placa",
    "Ramo",
    "Poliza",
    "Valor",
    "Fecha Emision",
    "Fecha Vencimiento",
    "Recaudada",
    "Observacion",
    "Gestion",
    "Estado",
];

/// Write the classified receivable view.
pub fn write_receivables(
    path: &Path,
    rows: &[(&Receivable, ReceivableStatus)],
) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Cartera").map_err(|e| e.to_string())?;

    write_header_row(sheet, RECEIVABLE_HEADERS)?;

    for (i, (r, status)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        let texts = [
            &r.insurer,
            &r.client,
            &r.document,
            &r.advisor,
            &r.plate,
            &r.line,
            &r.policy,
        ];
        for (col, value) in texts.iter().enumerate() {
            write_text(sheet, row, col as u16, value)?;
        }
        sheet
            .write_number(row, 7, r.amount_value())
            .map_err(|e| e.to_string())?;
        write_text(sheet, row, 8, &format_ymd(r.issue_date))?;
        write_text(sheet, row, 9, &format_ymd(r.due_date))?;
        write_text(sheet, row, 10, &r.collected.to_string())?;
        write_text(sheet, row, 11, &r.observation)?;
        write_text(sheet, row, 12, &r.notes)?;
        write_text(sheet, row, 13, &status.to_string())?;
    }

    workbook.save(path).map_err(|e| e.to_string())
}

const POLICY_HEADERS: &[&str] = &[
    "Aseguradora",
    "Poliza",
    "Ramo",
    "Placa",
    "Asegurado",
    "IdAsegurado",
    "Beneficiario",
    "IdBeneficiario",
    "Tomador",
    "IdTomador",
    "FechaExpedicion",
    "FechaInicio",
    "FechaFin",
    "Prima",
    "GastosExpedicion",
    "Iva",
    "Total",
    "Asesor",
    "Renovacion",
    "Comision",
    "Telefono",
    "Anulada",
    "Gestion",
    "Estado",
];

/// Write the classified policy view.
pub fn write_policies(path: &Path, rows: &[(&Policy, PolicyStatus)]) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Polizas").map_err(|e| e.to_string())?;

    write_header_row(sheet, POLICY_HEADERS)?;

    for (i, (p, status)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        let texts = [
            &p.insurer,
            &p.policy,
            &p.line,
            &p.plate,
            &p.insured,
            &p.insured_id,
            &p.beneficiary,
            &p.beneficiary_id,
            &p.holder,
            &p.holder_id,
        ];
        for (col, value) in texts.iter().enumerate() {
            write_text(sheet, row, col as u16, value)?;
        }
        write_text(sheet, row, 10, &format_ymd(p.issued_on))?;
        write_text(sheet, row, 11, &format_ymd(p.starts_on))?;
        write_text(sheet, row, 12, &format_ymd(p.ends_on))?;
        for (col, value) in [
            (13, p.premium),
            (14, p.issue_costs),
            (15, p.vat),
            (16, p.total),
        ] {
            sheet
                .write_number(row, col as u16, value)
                .map_err(|e| e.to_string())?;
        }
        write_text(sheet, row, 17, &p.advisor)?;
        write_text(sheet, row, 18, &p.renewal.to_string())?;
        sheet
            .write_number(row, 19, p.commission)
            .map_err(|e| e.to_string())?;
        write_text(sheet, row, 20, &p.phone)?;
        write_text(sheet, row, 21, &p.voided.to_string())?;
        write_text(sheet, row, 22, &p.notes)?;
        write_text(sheet, row, 23, &status.to_string())?;
    }

    workbook.save(path).map_err(|e| e.to_string())
}

const SUMMARY_HEADERS: &[&str] = &[
    "Aseguradora",
    "TotalPolizas",
    "Vigentes",
    "Proximas",
    "Vencidas",
    "Anuladas",
    "SumaPrima",
    "SumaTotal",
];

/// Write the per-insurer rollup.
pub fn write_insurer_summary(path: &Path, rows: &[InsurerSummary]) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Resumen").map_err(|e| e.to_string())?;

    write_header_row(sheet, SUMMARY_HEADERS)?;

    for (i, s) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        write_text(sheet, row, 0, &s.insurer)?;
        for (col, value) in [
            (1, s.records as f64),
            (2, s.current as f64),
            (3, s.upcoming as f64),
            (4, s.expired as f64),
            (5, s.voided as f64),
            (6, s.premium_total),
            (7, s.grand_total),
        ] {
            sheet
                .write_number(row, col as u16, value)
                .map_err(|e| e.to_string())?;
        }
    }

    workbook.save(path).map_err(|e| e.to_string())
}

fn write_header_row(
    sheet: &mut rust_xlsxwriter::Worksheet,
    headers: &[&str],
) -> Result<(), String> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn write_text(
    sheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: &str,
) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    sheet
        .write_string(row, col, value)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartera_core::classify::{receivable_status, AgingThresholds};
    use cartera_core::YesNo;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn export_then_reimport_keeps_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cartera.xlsx");

        let r = Receivable {
            insurer: "Sura".into(),
            client: "Juan Perez".into(),
            policy: "100".into(),
            amount: "1.200.000".into(),
            issue_date: Some(ymd(2026, 7, 1)),
            collected: YesNo::Yes,
            notes: "called client".into(),
            ..Receivable::default()
        };
        let today = ymd(2026, 8, 6);
        let status = receivable_status(&r, today, &AgingThresholds::default());
        write_receivables(&path, &[(&r, status)]).unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.text(&["aseguradora"]), "Sura");
        assert_eq!(row.text(&["poliza"]), "100");
        assert_eq!(row.text(&["valor"]), "1200000");
        assert_eq!(row.text(&["fechaemision"]), "2026-07-01");
        assert_eq!(row.text(&["recaudada"]), "SI");
        assert_eq!(row.text(&["estado"]), "collected");
    }

    #[test]
    fn blank_rows_are_dropped_on_import() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sparse.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Aseguradora").unwrap();
        sheet.write_string(0, 1, "Poliza").unwrap();
        sheet.write_string(1, 0, "Sura").unwrap();
        sheet.write_string(1, 1, "100").unwrap();
        // row 2 left entirely empty
        sheet.write_string(3, 0, "Mapfre").unwrap();
        sheet.write_string(3, 1, "200").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn summary_export_writes_counts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resumen.xlsx");

        let summary = InsurerSummary {
            insurer: "Sura".into(),
            records: 3,
            current: 1,
            upcoming: 1,
            expired: 1,
            voided: 0,
            premium_total: 350.0,
            grand_total: 420.0,
        };
        write_insurer_summary(&path, &[summary]).unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].text(&["aseguradora"]), "Sura");
        assert_eq!(rows[0].text(&["totalpolizas"]), "3");
        assert_eq!(rows[0].text(&["sumatotal"]), "420");
    }
}

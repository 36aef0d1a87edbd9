use std::fs;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use suivi_tools::dates::DateParser;
use suivi_tools::inspect::SheetKind;
use suivi_tools::normalize::NormalizeOptions;
use suivi_tools::roster::Roster;
use suivi_tools::{ToolError, pipeline};
use tempfile::tempdir;

/// Writes a dossier row the way the designer and archive sheets lay it out:
/// A initials, B name, C date, G status, H comments, I completed flag.
fn write_dossier(
    sheet: &mut Worksheet,
    row: u32,
    initials: &str,
    name: &str,
    status: &str,
    completed: bool,
) {
    sheet.write_string(row, 0, initials).expect("initials");
    sheet.write_string(row, 1, name).expect("name");
    sheet.write_number(row, 2, 45000.0).expect("date");
    sheet.write_string(row, 6, status).expect("status");
    sheet.write_string(row, 7, " à relire ").expect("comments");
    sheet.write_boolean(row, 8, completed).expect("completed");
}

fn write_headers(sheet: &mut Worksheet) {
    sheet.write_string(0, 1, "SUIVI").expect("title");
    sheet.write_string(1, 1, "DOSSIER").expect("header");
}

fn build_source(path: &Path) {
    let mut workbook = Workbook::new();

    let jordan = workbook.add_worksheet();
    jordan.set_name("JORDAN").expect("sheet name");
    write_headers(jordan);
    write_dossier(jordan, 2, "", "Boulangerie Martin", "En cours", false);
    write_dossier(jordan, 3, "", "Garage Dupont", "Terminé", true);
    write_dossier(jordan, 4, "", "FAUX", "", false);
    write_dossier(jordan, 5, "", "ab", "", false);

    let carole = workbook.add_worksheet();
    carole.set_name("CAROLE").expect("sheet name");
    write_headers(carole);
    write_dossier(carole, 2, "", "Fleuriste Rose", "standby", false);
    carole.write_string(3, 1, "Pharmacie").expect("name");
    carole.write_string(3, 2, "07/02/2023").expect("text date");

    let archive = workbook.add_worksheet();
    archive.set_name("ARCHIVE").expect("sheet name");
    write_headers(archive);
    write_dossier(archive, 2, "JU", "Cave à vins", "", false);
    write_dossier(archive, 3, "ZZ", "Cordonnerie", "", false);
    write_dossier(archive, 4, "Q", "Archive 2022", "", false);

    let franchises = workbook.add_worksheet();
    franchises.set_name("FRANCHISES").expect("sheet name");
    franchises.write_string(0, 0, "Franchise").expect("header");
    franchises.write_string(1, 0, "Carrefour").expect("name");
    franchises.write_string(1, 1, "x").expect("jordan");
    franchises.write_string(1, 4, "x").expect("quentin");
    franchises.write_string(2, 0, "Z").expect("short name");

    let projects = workbook.add_worksheet();
    projects.set_name("PROJETS_INTERNE").expect("sheet name");
    projects.write_string(0, 0, "Commercial").expect("header");
    projects.write_string(1, 0, " Paul ").expect("commercial");
    projects.write_string(1, 1, "Flyer salon").expect("task");
    projects.write_string(1, 3, "CAROLE").expect("designer");
    projects.write_string(2, 0, "Paul").expect("commercial");

    workbook.save(path).expect("source workbook written");
}

fn read_sheet(path: &Path, name: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("output opened");
    let range = workbook
        .worksheet_range(name)
        .expect("sheet present")
        .expect("sheet readable");
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    DataType::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

fn options() -> NormalizeOptions {
    NormalizeOptions {
        dates: DateParser::with_reference_year(2024),
        ..NormalizeOptions::default()
    }
}

#[test]
fn tracking_workbook_is_split_into_four_tables() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("SUIVI_GRAPHISTES.xlsx");
    let output = temp_dir.path().join("out.xlsx");
    build_source(&input);

    let report = pipeline::normalize_file(&input, &output, &options()).expect("normalised");

    let mut workbook: Xlsx<_> = open_workbook(&output).expect("output opened");
    assert_eq!(
        workbook.sheet_names().to_vec(),
        ["DOSSIERS_ACTIFS", "ARCHIVES", "FRANCHISES", "PROJETS"]
    );

    let active = read_sheet(&output, "DOSSIERS_ACTIFS");
    assert_eq!(
        active,
        vec![
            vec!["Graphiste", "Nom", "Date création", "Statut", "Commentaires"],
            vec!["JORDAN", "Boulangerie Martin", "2023-03-15", "En cours", "à relire"],
            vec!["CAROLE", "Fleuriste Rose", "2023-03-15", "standby", "à relire"],
            vec!["CAROLE", "Pharmacie", "2023-02-07", "", ""],
        ]
    );

    let archives = read_sheet(&output, "ARCHIVES");
    let archive_rows: Vec<(&str, &str)> = archives
        .iter()
        .skip(1)
        .map(|row| (row[0].as_str(), row[1].as_str()))
        .collect();
    assert_eq!(
        archive_rows,
        [
            ("JORDAN", "Garage Dupont"),
            ("JULIETTE", "Cave à vins"),
            ("INCONNU", "Cordonnerie"),
        ]
    );

    let franchises = read_sheet(&output, "FRANCHISES");
    assert_eq!(
        franchises,
        vec![
            vec!["Nom", "JORDAN", "CAROLE", "JULIETTE", "QUENTIN"],
            vec!["Carrefour", "x", "", "", "x"],
        ]
    );

    let projects = read_sheet(&output, "PROJETS");
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1][0], "Paul");
    assert_eq!(projects[1][1], "Flyer salon");
    assert_eq!(projects[1][3], "CAROLE");

    assert_eq!(report.active_rows, 3);
    assert_eq!(report.archive_rows, 3);
    assert_eq!(report.franchise_rows, 1);
    assert_eq!(report.project_rows, 1);
    for sheet in &report.sheets {
        assert_eq!(sheet.scanned, sheet.kept() + sheet.skipped, "{}", sheet.sheet);
    }
    assert_eq!(report.skipped_rows(), 2 + 1 + 1 + 1);
    assert!(report.missing_sheets.contains(&"HUGO".to_string()));
}

#[test]
fn empty_tables_keep_their_headers() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("only_projects.xlsx");
    let output = temp_dir.path().join("out.xlsx");

    let mut workbook = Workbook::new();
    let projects = workbook.add_worksheet();
    projects.set_name("PROJETS_INTERNE").expect("sheet name");
    projects.write_string(0, 1, "Tâche").expect("header");
    projects.write_string(1, 1, "Refonte site").expect("task");
    workbook.save(&input).expect("source written");

    pipeline::normalize_file(&input, &output, &options()).expect("normalised");

    let archives = read_sheet(&output, "ARCHIVES");
    assert_eq!(
        archives,
        vec![vec!["Graphiste", "Nom", "Date création", "Statut", "Commentaires"]]
    );
    let projects = read_sheet(&output, "PROJETS");
    assert_eq!(projects[1], ["", "Refonte site", "", "", ""]);
}

#[test]
fn date_formatted_request_cells_are_copied_as_displayed() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("suivi.xlsx");
    let output = temp_dir.path().join("out.xlsx");

    let mut workbook = Workbook::new();
    let projects = workbook.add_worksheet();
    projects.set_name("PROJETS_INTERNE").expect("sheet name");
    projects.write_string(0, 1, "Tâche").expect("header");
    projects.write_string(1, 1, "Flyer salon").expect("task");
    let requested = ExcelDateTime::from_ymd(2024, 3, 12).expect("date");
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    projects
        .write_datetime_with_format(1, 2, &requested, &date_format)
        .expect("date cell");
    projects.write_number(1, 4, 0.1 + 0.2).expect("number cell");
    workbook.save(&input).expect("source written");

    pipeline::normalize_file(&input, &output, &options()).expect("normalised");

    let projects = read_sheet(&output, "PROJETS");
    assert_eq!(projects[1], ["", "Flyer salon", "12/03/2024", "", "0.3"]);
}

#[test]
fn custom_roster_drives_sheets_and_franchise_columns() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("suivi.xlsx");
    let output = temp_dir.path().join("out.xlsx");

    let mut workbook = Workbook::new();
    let alice = workbook.add_worksheet();
    alice.set_name("ALICE").expect("sheet name");
    write_headers(alice);
    write_dossier(alice, 2, "", "Salon de thé", "", false);
    let archive = workbook.add_worksheet();
    archive.set_name("ARCHIVE").expect("sheet name");
    write_headers(archive);
    write_dossier(archive, 2, "AL", "Quincaillerie", "", false);
    write_dossier(archive, 3, "J", "Poissonnerie", "", false);
    workbook.save(&input).expect("source written");

    let roster = Roster::from_json_str(
        r#"{"designers": [{"name": "ALICE", "active": true, "initials": ["AL"]}],
            "unknown_label": "?"}"#,
    )
    .expect("roster");
    let options = NormalizeOptions {
        roster,
        ..options()
    };

    pipeline::normalize_file(&input, &output, &options).expect("normalised");

    let archives = read_sheet(&output, "ARCHIVES");
    assert_eq!(archives[1][0], "ALICE");
    assert_eq!(archives[2][0], "?");
    assert_eq!(read_sheet(&output, "FRANCHISES"), vec![vec!["Nom", "ALICE"]]);
}

#[test]
fn report_is_written_as_json() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("suivi.xlsx");
    let output = temp_dir.path().join("out.xlsx");
    let report_path = temp_dir.path().join("report.json");
    build_source(&input);

    let report = pipeline::normalize_file(&input, &output, &options()).expect("normalised");
    pipeline::write_report(&report_path, &report).expect("report written");

    let written = fs::read_to_string(&report_path).expect("report read");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("JSON parsed");
    assert_eq!(parsed["active_rows"], 3);
    assert_eq!(parsed["sheets"][0]["sheet"], "JORDAN");
}

#[test]
fn normalised_output_is_recognised_and_refused() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("suivi.xlsx");
    let output = temp_dir.path().join("suivi_NORMALISE.xlsx");
    build_source(&input);
    pipeline::normalize_file(&input, &output, &options()).expect("normalised");

    let summary = pipeline::inspect_file(&output, &Roster::default()).expect("inspected");
    assert!(summary.normalized);
    let kinds: Vec<SheetKind> = summary.sheets.iter().map(|sheet| sheet.kind).collect();
    assert_eq!(
        kinds,
        [
            SheetKind::Designer,
            SheetKind::Archive,
            SheetKind::Franchises,
            SheetKind::Projects
        ]
    );

    let again = temp_dir.path().join("again.xlsx");
    let result = pipeline::normalize_file(&output, &again, &options());
    assert!(matches!(result, Err(ToolError::AlreadyNormalized(_))));
}

#[test]
fn missing_input_and_overwrite_are_rejected() {
    let temp_dir = tempdir().expect("temporary directory");
    let missing = temp_dir.path().join("absent.xlsx");
    let result = pipeline::normalize_file(&missing, &temp_dir.path().join("out.xlsx"), &options());
    assert!(matches!(result, Err(ToolError::MissingInput(_))));

    let input = temp_dir.path().join("suivi.xlsx");
    build_source(&input);
    let result = pipeline::normalize_file(&input, &input, &options());
    assert!(matches!(result, Err(ToolError::OutputOverwritesInput(_))));
}

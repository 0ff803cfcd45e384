use sirme_core::export::{detailed_table, summary_table, CellValue, SheetTable};
use sirme_core::ReportBundle;
use tabled::builder::Builder;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(text) => text.clone(),
        CellValue::Hours(h) if *h == 0.0 => "-".to_string(),
        CellValue::Hours(h) => format!("{:.2}", h),
    }
}

fn render(sheet: &SheetTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(sheet.headers.clone());
    for row in &sheet.rows {
        builder.push_record(row.iter().map(cell_text).collect::<Vec<_>>());
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn show_report(bundle: &ReportBundle, detailed: bool) {
    println!(
        "\x1b[1;36m{} {} .. {}\x1b[0m",
        bundle.report_type.as_str(),
        bundle.start,
        bundle.end
    );

    if bundle.summary.is_empty() {
        println!("No hours recorded in this period.");
        return;
    }

    let sheet = if detailed {
        detailed_table(&bundle.detailed, &bundle.day_columns)
    } else {
        summary_table(&bundle.summary)
    };
    println!("{}", render(&sheet));

    let total: f64 = bundle.summary.iter().map(|r| r.total).sum();
    println!("Total: {:.2}h", total);
}

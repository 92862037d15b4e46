//! PDF tax statements

use chrono::{Local, NaiveDate};
use energycoop_common::{DATE_FORMAT, Site};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use super::member::EnergySaving;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const LINE_HEIGHT: i64 = 16;
const ROWS_PER_PAGE: usize = 40;

/// Everything printed on a statement
pub struct TaxStatement<'a> {
    pub user_id: &'a str,
    pub site: Site,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub currency: &'a str,
    pub savings: &'a [EnergySaving],
}

impl TaxStatement<'_> {
    fn header(&self) -> Vec<(i64, String)> {
        vec![
            (16, format!("{} energy savings statement", self.site.display_name())),
            (11, format!("Member: {}", self.user_id)),
            (
                11,
                format!(
                    "Period: {} to {}",
                    self.from.format(DATE_FORMAT),
                    self.to.format(DATE_FORMAT)
                ),
            ),
            (
                11,
                format!("Generated: {}", Local::now().format("%Y-%m-%d %H:%M")),
            ),
            (11, String::new()),
            (
                11,
                format!(
                    "{:<12}{:>16}{:>16}",
                    "Date",
                    "Energy (kWh)",
                    format!("Saving ({})", self.currency)
                ),
            ),
        ]
    }

    fn rows(&self) -> Vec<String> {
        self.savings
            .iter()
            .map(|saving| {
                format!(
                    "{:<12}{:>16.3}{:>16.2}",
                    saving.from.date().format(DATE_FORMAT),
                    saving.energy_kwh,
                    saving.amount
                )
            })
            .collect()
    }

    fn totals(&self) -> Vec<String> {
        let energy: f64 = self.savings.iter().map(|s| s.energy_kwh).sum();
        let amount: f64 = self.savings.iter().map(|s| s.amount).sum();

        vec![
            String::new(),
            format!("{:<12}{:>16.3}{:>16.2}", "Total", energy, amount),
            format!("Days recorded: {}", self.savings.len()),
        ]
    }
}

/// Render `statement` as a PDF with a fixed-width table, one page per
/// `ROWS_PER_PAGE` days.
pub fn render_tax_document(statement: &TaxStatement<'_>) -> anyhow::Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let rows = statement.rows();
    let mut chunks: Vec<&[String]> = rows.chunks(ROWS_PER_PAGE).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }
    let last = chunks.len() - 1;

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.into_iter().enumerate() {
        let mut lines: Vec<(i64, String)> = statement.header();
        lines.extend(chunk.iter().map(|row| (10, row.clone())));
        if index == last {
            lines.extend(statement.totals().into_iter().map(|line| (10, line)));
        }
        lines.push((8, format!("Page {} of {}", index + 1, last + 1)));

        let content = Content {
            operations: text_operations(&lines),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let count = page_ids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.into_iter().map(Object::from).collect::<Vec<Object>>(),
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn text_operations(lines: &[(i64, String)]) -> Vec<Operation> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
        Operation::new("TL", vec![LINE_HEIGHT.into()]),
    ];

    for (size, text) in lines {
        operations.push(Operation::new("Tf", vec!["F1".into(), (*size).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
        operations.push(Operation::new("T*", vec![]));
    }

    operations.push(Operation::new("ET", vec![]));
    operations
}

/// Single-byte WinAnsi text for the standard Courier font. Latin-1 letters
/// keep their code point; anything else the font cannot show becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

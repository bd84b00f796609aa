use domain_helpdesk::{
    model::vo::{ReportBlock, ReportDocument, REPORT_TIMESTAMP_FORMAT},
    service::ReportRenderer,
};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const FOOTER_HEIGHT: f32 = 15.0;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 11.0;
const TITLE_SIZE: f32 = 14.0;
const LINE_HEIGHT: f32 = 5.0;
/// Characters per body line at `BODY_SIZE` across the printable width.
const WRAP_COLUMNS: usize = 95;

/// Renders ticket reports as A4 PDF documents with the built-in Helvetica faces.
#[derive(Default)]
pub struct PdfReportRenderer;

impl ReportRenderer for PdfReportRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn render(&self, document: &ReportDocument) -> anyhow::Result<Vec<u8>> {
        let title = format!("Ticket {}", document.ticket_number);
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Content");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        let mut writer = PageWriter { doc: &doc, document, regular, bold, layer, y: 0.0, page: 1 };
        writer.start_page();
        for block in &document.blocks {
            writer.block(block);
        }
        doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(e: printpdf::Error) -> anyhow::Error {
    anyhow::anyhow!("PDF rendering failed: {e}")
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    document: &'a ReportDocument,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
    page: usize,
}

impl PageWriter<'_> {
    /// Header with the organisation lines, footer with dates and page number.
    fn start_page(&mut self) {
        self.y = PAGE_HEIGHT - MARGIN;
        let header = &self.document.header;
        self.layer.use_text(header.organisation.as_str(), TITLE_SIZE, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT + 2.0;
        for line in &header.area_lines {
            self.layer.use_text(line.as_str(), BODY_SIZE, Mm(MARGIN), Mm(self.y), &self.regular);
            self.y -= LINE_HEIGHT;
        }
        self.layer.use_text(
            format!("Ticket {}", self.document.ticket_number),
            HEADING_SIZE,
            Mm(MARGIN),
            Mm(self.y),
            &self.bold,
        );
        self.y -= 2.0;
        self.rule(self.y);
        self.y -= LINE_HEIGHT + 2.0;

        let footer = format!(
            "Ticket date: {}    Generated: {}    Page {}",
            self.document.ticket_created_at.format(REPORT_TIMESTAMP_FORMAT),
            self.document.generated_at.format(REPORT_TIMESTAMP_FORMAT),
            self.page
        );
        self.rule(MARGIN + LINE_HEIGHT);
        self.layer.use_text(footer, 8.0, Mm(MARGIN), Mm(MARGIN), &self.regular);
    }

    fn rule(&self, y: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    /// Moves to a fresh page unless `height` millimetres still fit above the footer.
    fn reserve(&mut self, height: f32) {
        if self.y - height >= MARGIN + FOOTER_HEIGHT {
            return;
        }
        self.page += 1;
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.start_page();
    }

    fn heading(&mut self, text: &str) {
        self.reserve(LINE_HEIGHT * 3.0);
        self.y -= 2.0;
        self.layer.use_text(text, HEADING_SIZE, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT + 1.0;
    }

    fn paragraph(&mut self, text: &str, indent: f32) {
        for line in wrap(text, WRAP_COLUMNS) {
            self.reserve(LINE_HEIGHT);
            self.layer.use_text(line, BODY_SIZE, Mm(MARGIN + indent), Mm(self.y), &self.regular);
            self.y -= LINE_HEIGHT;
        }
    }

    fn field(&mut self, label: &str, value: &str) {
        self.reserve(LINE_HEIGHT);
        self.layer.use_text(format!("{label}:"), BODY_SIZE, Mm(MARGIN), Mm(self.y), &self.bold);
        let mut lines = wrap(value, WRAP_COLUMNS - 20).into_iter();
        if let Some(first) = lines.next() {
            self.layer.use_text(first, BODY_SIZE, Mm(MARGIN + 35.0), Mm(self.y), &self.regular);
        }
        self.y -= LINE_HEIGHT;
        for line in lines {
            self.reserve(LINE_HEIGHT);
            self.layer.use_text(line, BODY_SIZE, Mm(MARGIN + 35.0), Mm(self.y), &self.regular);
            self.y -= LINE_HEIGHT;
        }
    }

    fn block(&mut self, block: &ReportBlock) {
        self.heading(&block.heading());
        match block {
            ReportBlock::Requester { fields }
            | ReportBlock::Ticket { fields }
            | ReportBlock::Assignee { fields } => {
                for field in fields {
                    self.field(field.label, &field.value);
                }
            }
            ReportBlock::Description { title, text } => {
                self.field("Title", title);
                self.y -= 1.0;
                self.paragraph(text, 0.0);
            }
            ReportBlock::Comments { entries } => {
                for entry in entries {
                    self.reserve(LINE_HEIGHT * 2.0);
                    let byline = format!(
                        "{} - {}",
                        entry.author,
                        entry.created_at.format(REPORT_TIMESTAMP_FORMAT)
                    );
                    self.layer.use_text(byline, BODY_SIZE, Mm(MARGIN), Mm(self.y), &self.bold);
                    self.y -= LINE_HEIGHT;
                    self.paragraph(&entry.text, 5.0);
                    self.y -= 2.0;
                }
            }
            ReportBlock::Signatures { requester, assignee } => {
                self.reserve(LINE_HEIGHT * 6.0);
                self.y -= LINE_HEIGHT * 3.0;
                let column = (PAGE_WIDTH - MARGIN * 2.0) / 2.0;
                for (offset, caption, name) in
                    [(0.0, "Requester", requester), (column, "Assigned technician", assignee)]
                {
                    let x = MARGIN + offset;
                    self.layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(x), Mm(self.y)), false),
                            (Point::new(Mm(x + column - 10.0), Mm(self.y)), false),
                        ],
                        is_closed: false,
                    });
                    self.layer.use_text(
                        name.as_str(),
                        BODY_SIZE,
                        Mm(x),
                        Mm(self.y - LINE_HEIGHT),
                        &self.regular,
                    );
                    self.layer.use_text(caption, 8.0, Mm(x), Mm(self.y - LINE_HEIGHT * 2.0), &self.bold);
                }
                self.y -= LINE_HEIGHT * 3.0;
            }
        }
        self.y -= 2.0;
    }
}

/// Greedy word wrap; explicit line breaks are kept and overlong words split.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > columns {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..columns).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
            if needed > columns && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

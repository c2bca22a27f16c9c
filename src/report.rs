use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::RenderError;
use crate::format::{format_currency, format_date_time};
use crate::layout::{self, Block, PageGeometry};
use crate::pdf::PdfDocument;

const A4_PAGE_WIDTH: f32 = 210.0;
const A4_PAGE_HEIGHT: f32 = 297.0;

const BUDGET_HEADING: &str = "TechFix · Orçamento sem compromisso";
const TECHNICAL_REPORT_HEADING: &str = "TechFix · Laudo Técnico";
const INVENTORY_HEADING: &str = "TechFix · Relatório de Estoque";

/// A customer as registered by the shop. The engine only reads these records, they
/// are owned and populated by the calling service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    /// The customer's CPF.
    pub tax_id: String,
    pub phone: String,
    pub address: String,
}

/// A repair ticket. The entry date arrives pre-formatted from the owning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub id: String,
    pub customer_id: String,
    pub device: String,
    pub description: String,
    pub status: TicketStatus,
    pub entry_date: String,
}

/// The lifecycle stage of a ticket. Reports print the stage under its registry name,
/// which is also the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Triagem,
    EmAndamento,
    Finalizado,
}

impl TicketStatus {
    /// The registry name of the stage, as printed on the reports.
    pub fn name(&self) -> &'static str {
        match self {
            TicketStatus::Triagem => "TRIAGEM",
            TicketStatus::EmAndamento => "EM_ANDAMENTO",
            TicketStatus::Finalizado => "FINALIZADO",
        }
    }
}

/// One catalogued stock item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub brand: String,
    pub quantity: i64,
    pub price: f64,
}

/// The part recommended by a budget quote. An absent price stands for "not
/// applicable" and is formatted as zero, it is never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLineItem {
    pub name: String,
    pub specification: String,
    pub code: String,
    pub part_price: Option<f64>,
    pub labor_price: Option<f64>,
}

/// The service information attached to a budget quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborInfo {
    pub description: String,
    pub estimated_time: String,
    pub responsible: String,
}

/// The findings driving a budget quote document. The part and labor sub-records are
/// optional; when absent their sections are omitted from the document entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReportPayload {
    pub diagnosis: String,
    pub probable_cause: String,
    pub repairable: bool,
    pub power_supply_affected: bool,
    pub part: Option<BudgetLineItem>,
    pub labor: Option<LaborInfo>,
}

impl BudgetReportPayload {
    /// The estimated total of the quote: the part price plus the labor price, either
    /// counting as zero when absent.
    pub fn estimated_total(&self) -> f64 {
        let part = self.part.as_ref();
        let part_price = part.and_then(|part| part.part_price).unwrap_or(0.0);
        let labor_price = part.and_then(|part| part.labor_price).unwrap_or(0.0);

        part_price + labor_price
    }
}

/// The findings driving a technical report document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalReportPayload {
    pub equipment_condition: String,
    pub problem_description: String,
    pub diagnostic: String,
    pub actions_taken: String,
    pub recommendations: String,
    pub technician_name: String,
}

/// Renders a budget quote for the given ticket and customer, reading the emission
/// instant from the clock. Returns the PDF bytes, or a [`RenderError`] when the
/// document serialization fails.
pub fn render_budget(
    ticket: &TicketRecord,
    customer: &CustomerRecord,
    payload: &BudgetReportPayload,
) -> Result<Vec<u8>, RenderError> {
    render_budget_at(ticket, customer, payload, OffsetDateTime::now_utc())
}

/// Renders a budget quote with an explicit emission instant. The instant is the only
/// input the clock would otherwise contribute, so rendering with the same records and
/// the same instant is byte-reproducible.
pub fn render_budget_at(
    ticket: &TicketRecord,
    customer: &CustomerRecord,
    payload: &BudgetReportPayload,
    issued_at: OffsetDateTime,
) -> Result<Vec<u8>, RenderError> {
    let blocks = budget_blocks(ticket, customer, payload, &issued_at);
    render_blocks(
        format!("orcamento-{}", ticket.id),
        BUDGET_HEADING,
        &blocks,
    )
}

/// Renders a technical report for the given ticket and customer, reading the emission
/// instant from the clock.
pub fn render_technical_report(
    ticket: &TicketRecord,
    customer: &CustomerRecord,
    payload: &TechnicalReportPayload,
) -> Result<Vec<u8>, RenderError> {
    render_technical_report_at(ticket, customer, payload, OffsetDateTime::now_utc())
}

/// Renders a technical report with an explicit emission instant.
pub fn render_technical_report_at(
    ticket: &TicketRecord,
    customer: &CustomerRecord,
    payload: &TechnicalReportPayload,
    issued_at: OffsetDateTime,
) -> Result<Vec<u8>, RenderError> {
    let blocks = technical_report_blocks(ticket, customer, payload, &issued_at);
    render_blocks(
        format!("laudo-{}", ticket.id),
        TECHNICAL_REPORT_HEADING,
        &blocks,
    )
}

/// Renders the stock report over the given items, in the order received, reading the
/// emission instant from the clock.
pub fn render_inventory_report(items: &[InventoryItemRecord]) -> Result<Vec<u8>, RenderError> {
    render_inventory_report_at(items, OffsetDateTime::now_utc())
}

/// Renders the stock report with an explicit emission instant.
pub fn render_inventory_report_at(
    items: &[InventoryItemRecord],
    issued_at: OffsetDateTime,
) -> Result<Vec<u8>, RenderError> {
    let blocks = inventory_blocks(items, &issued_at);
    render_blocks("estoque-techfix".to_string(), INVENTORY_HEADING, &blocks)
}

/// The download filename the budget quote is served under.
pub fn budget_filename(ticket_id: &str) -> String {
    format!("orcamento-{}.pdf", ticket_id)
}

/// The download filename the technical report is served under.
pub fn technical_report_filename(ticket_id: &str) -> String {
    format!("laudo-{}.pdf", ticket_id)
}

/// The download filename the stock report is served under.
pub fn inventory_filename() -> String {
    "estoque-techfix.pdf".to_string()
}

/// Builds the ordered block list of the budget quote document.
pub fn budget_blocks(
    ticket: &TicketRecord,
    customer: &CustomerRecord,
    payload: &BudgetReportPayload,
    issued_at: &OffsetDateTime,
) -> Vec<Block> {
    let mut blocks = vec![
        Block::Heading(BUDGET_HEADING.to_string()),
        Block::Paragraph(format!("Emitido em: {}", format_date_time(issued_at))),
        Block::Blank,
        Block::SectionTitle("Dados do cliente".to_string()),
        Block::Paragraph(format!("Cliente: {}", customer.name)),
        Block::Paragraph(format!("CPF: {}", customer.tax_id)),
        Block::Paragraph(format!("Telefone: {}", customer.phone)),
        Block::Paragraph(format!("Endereço: {}", customer.address)),
        Block::Blank,
        Block::SectionTitle("Descrição do equipamento".to_string()),
        Block::Paragraph(format!("Chamado: {}", ticket.id)),
        Block::Paragraph(format!("Equipamento: {}", ticket.device)),
        Block::Paragraph(format!("Status atual: {}", ticket.status.name())),
        Block::Paragraph(format!("Queixa do cliente: {}", ticket.description)),
        Block::Blank,
        Block::SectionTitle("Diagnóstico preliminar".to_string()),
        Block::Paragraph(format!("Diagnóstico: {}", payload.diagnosis)),
        Block::Paragraph(format!("Causa provável: {}", payload.probable_cause)),
        Block::Paragraph(format!(
            "Equipamento tem conserto? {}",
            yes_no(payload.repairable)
        )),
        Block::Paragraph(format!(
            "Fonte de alimentação afetada? {}",
            yes_no(payload.power_supply_affected)
        )),
        Block::Blank,
    ];

    if let Some(part) = &payload.part {
        blocks.extend([
            Block::SectionTitle("Peças recomendadas".to_string()),
            Block::Paragraph(format!("Peça: {}", part.name)),
            Block::Paragraph(format!("Especificação: {}", part.specification)),
            Block::Paragraph(format!("Código: {}", part.code)),
            Block::Paragraph(format!(
                "Preço da peça: {}",
                format_currency(part.part_price)
            )),
            Block::Paragraph(format!(
                "Mão-de-obra sobre peça: {}",
                format_currency(part.labor_price)
            )),
            Block::Blank,
        ]);
    }

    if let Some(labor) = &payload.labor {
        blocks.extend([
            Block::SectionTitle("Serviços".to_string()),
            Block::Paragraph(format!("Serviço: {}", labor.description)),
            Block::Paragraph(format!("Tempo estimado: {}", labor.estimated_time)),
            Block::Paragraph(format!("Responsável: {}", labor.responsible)),
            Block::Blank,
        ]);
    }

    blocks.extend([
        Block::SectionTitle("Resumo financeiro".to_string()),
        Block::Paragraph(format!(
            "Valor estimado total: {}",
            format_currency(Some(payload.estimated_total()))
        )),
        Block::Blank,
        Block::Paragraph(
            "Observação: valores estimados sujeitos a confirmação após diagnóstico completo."
                .to_string(),
        ),
    ]);

    blocks
}

/// Builds the ordered block list of the technical report document.
pub fn technical_report_blocks(
    ticket: &TicketRecord,
    customer: &CustomerRecord,
    payload: &TechnicalReportPayload,
    issued_at: &OffsetDateTime,
) -> Vec<Block> {
    vec![
        Block::Heading(TECHNICAL_REPORT_HEADING.to_string()),
        Block::Paragraph(format!("Emitido em: {}", format_date_time(issued_at))),
        Block::Blank,
        Block::SectionTitle("Chamado".to_string()),
        Block::Paragraph(format!("Chamado: {}", ticket.id)),
        Block::Paragraph(format!("Entrada: {}", ticket.entry_date)),
        Block::Paragraph(format!("Equipamento: {}", ticket.device)),
        Block::Paragraph(format!("Status: {}", ticket.status.name())),
        Block::Blank,
        Block::SectionTitle("Cliente".to_string()),
        Block::Paragraph(format!("Nome: {}", customer.name)),
        Block::Paragraph(format!("Telefone: {}", customer.phone)),
        Block::Paragraph(format!("Endereço: {}", customer.address)),
        Block::Blank,
        Block::SectionTitle("Queixa registrada".to_string()),
        Block::Paragraph(ticket.description.clone()),
        Block::Blank,
        Block::SectionTitle("Análise técnica".to_string()),
        Block::Paragraph(format!(
            "Condições encontradas: {}",
            payload.equipment_condition
        )),
        Block::Paragraph(format!(
            "Problemas reportados: {}",
            payload.problem_description
        )),
        Block::Paragraph(format!("Diagnóstico técnico: {}", payload.diagnostic)),
        Block::Blank,
        Block::SectionTitle("Intervenções e recomendações".to_string()),
        Block::Paragraph(format!("Ações realizadas: {}", payload.actions_taken)),
        Block::Paragraph(format!("Recomendações: {}", payload.recommendations)),
        Block::Blank,
        Block::Paragraph(format!(
            "Responsável técnico: {}",
            payload.technician_name
        )),
    ]
}

/// Builds the ordered block list of the stock report document. The summary counts
/// are computed here, over the items as supplied.
pub fn inventory_blocks(items: &[InventoryItemRecord], issued_at: &OffsetDateTime) -> Vec<Block> {
    let missing = items.iter().filter(|item| item.quantity <= 0).count();

    let mut blocks = vec![
        Block::Heading(INVENTORY_HEADING.to_string()),
        Block::Paragraph(format!("Emitido em: {}", format_date_time(issued_at))),
        Block::Blank,
        Block::Paragraph(format!("Total de itens catalogados: {}", items.len())),
        Block::Paragraph(format!("Peças em falta: {}", missing)),
        Block::Blank,
    ];

    for item in items {
        blocks.extend([
            Block::SectionTitle(format!("{} · {}", item.id, item.item_type)),
            Block::Paragraph(format!("Marca: {}", item.brand)),
            Block::Paragraph(format!("Quantidade disponível: {}", item.quantity)),
            Block::Paragraph(format!(
                "Preço de referência: {}",
                format_currency(Some(item.price))
            )),
            Block::Blank,
        ]);
    }

    blocks
}

/// A report request bundling a document kind with its payload, as read from JSON by
/// the command line interface and the calling services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportRequest {
    /// A budget quote for a ticket.
    #[serde(rename_all = "camelCase")]
    Budget {
        ticket: TicketRecord,
        customer: CustomerRecord,
        budget: BudgetReportPayload,
    },
    /// A technical report for a ticket.
    #[serde(rename_all = "camelCase")]
    TechnicalReport {
        ticket: TicketRecord,
        customer: CustomerRecord,
        report: TechnicalReportPayload,
    },
    /// The stock report over the supplied items.
    #[serde(rename_all = "camelCase")]
    Inventory { items: Vec<InventoryItemRecord> },
}

impl ReportRequest {
    /// Renders the requested document, reading the emission instant from the clock.
    pub fn render(&self) -> Result<Vec<u8>, RenderError> {
        self.render_at(OffsetDateTime::now_utc())
    }

    /// Renders the requested document with an explicit emission instant.
    pub fn render_at(&self, issued_at: OffsetDateTime) -> Result<Vec<u8>, RenderError> {
        match self {
            ReportRequest::Budget {
                ticket,
                customer,
                budget,
            } => render_budget_at(ticket, customer, budget, issued_at),
            ReportRequest::TechnicalReport {
                ticket,
                customer,
                report,
            } => render_technical_report_at(ticket, customer, report, issued_at),
            ReportRequest::Inventory { items } => render_inventory_report_at(items, issued_at),
        }
    }

    /// The download filename the rendered document is served under.
    pub fn suggested_filename(&self) -> String {
        match self {
            ReportRequest::Budget { ticket, .. } => budget_filename(&ticket.id),
            ReportRequest::TechnicalReport { ticket, .. } => {
                technical_report_filename(&ticket.id)
            }
            ReportRequest::Inventory { .. } => inventory_filename(),
        }
    }
}

/// Renders one block list onto a fresh single-page A4 document and serializes it.
fn render_blocks(
    identifier: String,
    title: &str,
    blocks: &[Block],
) -> Result<Vec<u8>, RenderError> {
    let mut document = PdfDocument::new(identifier.clone(), title.to_string());
    let page_index = document.add_page(A4_PAGE_WIDTH, A4_PAGE_HEIGHT);
    layout::write_blocks(&mut document, page_index, blocks, &PageGeometry::A4)?;
    document.write_all(identifier)?;

    document.save_to_bytes()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Sim"
    } else {
        "Não"
    }
}

use time::OffsetDateTime;

use reportr::pdf::encode_win_ansi;
use reportr::report::{
    render_budget_at, render_inventory_report_at, render_technical_report_at, BudgetLineItem,
    BudgetReportPayload, CustomerRecord, InventoryItemRecord, LaborInfo, ReportRequest,
    TechnicalReportPayload, TicketRecord, TicketStatus,
};

fn issued_at() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

fn customer() -> CustomerRecord {
    CustomerRecord {
        id: "C-1".to_string(),
        name: "Joana Prado".to_string(),
        tax_id: "123.456.789-00".to_string(),
        phone: "(11) 99876-5432".to_string(),
        address: "Rua das Laranjeiras, 250".to_string(),
    }
}

fn ticket() -> TicketRecord {
    TicketRecord {
        id: "T-42".to_string(),
        customer_id: "C-1".to_string(),
        device: "Notebook Vostro 15".to_string(),
        description: "Não liga depois de uma queda de energia".to_string(),
        status: TicketStatus::EmAndamento,
        entry_date: "01/08/2026 09:12".to_string(),
    }
}

fn full_budget() -> BudgetReportPayload {
    BudgetReportPayload {
        diagnosis: "Fonte danificada".to_string(),
        probable_cause: "Sobretensão na rede elétrica".to_string(),
        repairable: true,
        power_supply_affected: true,
        part: Some(BudgetLineItem {
            name: "Fonte 65W".to_string(),
            specification: "19.5V 3.34A".to_string(),
            code: "FT-065".to_string(),
            part_price: Some(100.0),
            labor_price: Some(50.0),
        }),
        labor: Some(LaborInfo {
            description: "Troca da fonte".to_string(),
            estimated_time: "2 dias úteis".to_string(),
            responsible: "Marcos".to_string(),
        }),
    }
}

fn technical_report() -> TechnicalReportPayload {
    TechnicalReportPayload {
        equipment_condition: "Gabinete riscado, sem outros danos externos".to_string(),
        problem_description: "Equipamento não liga".to_string(),
        diagnostic: "Fonte em curto, placa-mãe preservada".to_string(),
        actions_taken: "Substituição da fonte e limpeza interna".to_string(),
        recommendations: "Utilizar estabilizador de tensão".to_string(),
        technician_name: "Marcos Vieira".to_string(),
    }
}

/// Reloads the rendered document and collects the byte strings of the text-showing
/// operations of its single page, in emission order.
fn shown_text(pdf_bytes: &[u8]) -> Vec<Vec<u8>> {
    let document = lopdf::Document::load_mem(pdf_bytes).unwrap();
    let pages = document.get_pages();
    assert_eq!(pages.len(), 1, "every report fits on exactly one page");

    let page_id = *pages.values().next().unwrap();
    let content = document.get_page_content(page_id).unwrap();
    let content = lopdf::content::Content::decode(&content).unwrap();

    content
        .operations
        .into_iter()
        .filter(|operation| operation.operator == "Tj")
        .map(|operation| match &operation.operands[0] {
            lopdf::Object::String(bytes, _) => bytes.clone(),
            other => panic!("unexpected Tj operand {:?}", other),
        })
        .collect()
}

fn encode_lines(lines: &[&str]) -> Vec<Vec<u8>> {
    lines.iter().map(|line| encode_win_ansi(line)).collect()
}

#[test]
fn the_budget_quote_reproduces_every_section_in_order() {
    let pdf_bytes = render_budget_at(&ticket(), &customer(), &full_budget(), issued_at()).unwrap();

    assert!(!pdf_bytes.is_empty());
    assert!(pdf_bytes.starts_with(b"%PDF"));

    let expected = [
        "TechFix · Orçamento sem compromisso",
        "Emitido em: 14/11/2023 22:13",
        "Dados do cliente",
        "Cliente: Joana Prado",
        "CPF: 123.456.789-00",
        "Telefone: (11) 99876-5432",
        "Endereço: Rua das Laranjeiras, 250",
        "Descrição do equipamento",
        "Chamado: T-42",
        "Equipamento: Notebook Vostro 15",
        "Status atual: EM_ANDAMENTO",
        "Queixa do cliente: Não liga depois de uma queda de energia",
        "Diagnóstico preliminar",
        "Diagnóstico: Fonte danificada",
        "Causa provável: Sobretensão na rede elétrica",
        "Equipamento tem conserto? Sim",
        "Fonte de alimentação afetada? Sim",
        "Peças recomendadas",
        "Peça: Fonte 65W",
        "Especificação: 19.5V 3.34A",
        "Código: FT-065",
        "Preço da peça: R$ 100,00",
        "Mão-de-obra sobre peça: R$ 50,00",
        "Serviços",
        "Serviço: Troca da fonte",
        "Tempo estimado: 2 dias úteis",
        "Responsável: Marcos",
        "Resumo financeiro",
        "Valor estimado total: R$ 150,00",
        "Observação: valores estimados sujeitos a confirmação após diagnóstico completo.",
    ];
    similar_asserts::assert_eq!(shown_text(&pdf_bytes), encode_lines(&expected));
}

#[test]
fn the_technical_report_reproduces_every_section_in_order() {
    let pdf_bytes =
        render_technical_report_at(&ticket(), &customer(), &technical_report(), issued_at())
            .unwrap();

    assert!(!pdf_bytes.is_empty());
    assert!(pdf_bytes.starts_with(b"%PDF"));

    let expected = [
        "TechFix · Laudo Técnico",
        "Emitido em: 14/11/2023 22:13",
        "Chamado",
        "Chamado: T-42",
        "Entrada: 01/08/2026 09:12",
        "Equipamento: Notebook Vostro 15",
        "Status: EM_ANDAMENTO",
        "Cliente",
        "Nome: Joana Prado",
        "Telefone: (11) 99876-5432",
        "Endereço: Rua das Laranjeiras, 250",
        "Queixa registrada",
        "Não liga depois de uma queda de energia",
        "Análise técnica",
        "Condições encontradas: Gabinete riscado, sem outros danos externos",
        "Problemas reportados: Equipamento não liga",
        "Diagnóstico técnico: Fonte em curto, placa-mãe preservada",
        "Intervenções e recomendações",
        "Ações realizadas: Substituição da fonte e limpeza interna",
        "Recomendações: Utilizar estabilizador de tensão",
        "Responsável técnico: Marcos Vieira",
    ];
    similar_asserts::assert_eq!(shown_text(&pdf_bytes), encode_lines(&expected));
}

#[test]
fn the_stock_report_lists_summary_and_items_in_order() {
    let items = vec![
        InventoryItemRecord {
            id: "I-7".to_string(),
            item_type: "SSD".to_string(),
            brand: "Kingston".to_string(),
            quantity: 5,
            price: 250.0,
        },
        InventoryItemRecord {
            id: "I-9".to_string(),
            item_type: "Fonte".to_string(),
            brand: "Corsair".to_string(),
            quantity: 0,
            price: 1250.0,
        },
    ];
    let pdf_bytes = render_inventory_report_at(&items, issued_at()).unwrap();

    assert!(!pdf_bytes.is_empty());
    assert!(pdf_bytes.starts_with(b"%PDF"));

    let expected = [
        "TechFix · Relatório de Estoque",
        "Emitido em: 14/11/2023 22:13",
        "Total de itens catalogados: 2",
        "Peças em falta: 1",
        "I-7 · SSD",
        "Marca: Kingston",
        "Quantidade disponível: 5",
        "Preço de referência: R$ 250,00",
        "I-9 · Fonte",
        "Marca: Corsair",
        "Quantidade disponível: 0",
        "Preço de referência: R$ 1.250,00",
    ];
    similar_asserts::assert_eq!(shown_text(&pdf_bytes), encode_lines(&expected));
}

#[test]
fn rendering_the_same_payload_twice_yields_identical_bytes() {
    let first = render_budget_at(&ticket(), &customer(), &full_budget(), issued_at()).unwrap();
    let second = render_budget_at(&ticket(), &customer(), &full_budget(), issued_at()).unwrap();
    similar_asserts::assert_eq!(first, second);

    let items = vec![InventoryItemRecord {
        id: "I-7".to_string(),
        item_type: "SSD".to_string(),
        brand: "Kingston".to_string(),
        quantity: 5,
        price: 250.0,
    }];
    let first = render_inventory_report_at(&items, issued_at()).unwrap();
    let second = render_inventory_report_at(&items, issued_at()).unwrap();
    similar_asserts::assert_eq!(first, second);
}

#[test]
fn absent_optional_sections_leave_no_trace_in_the_output() {
    let mut budget = full_budget();
    budget.part = None;
    budget.labor = None;

    let pdf_bytes = render_budget_at(&ticket(), &customer(), &budget, issued_at()).unwrap();
    let shown = shown_text(&pdf_bytes);

    assert!(!shown.contains(&encode_win_ansi("Peças recomendadas")));
    assert!(!shown.contains(&encode_win_ansi("Serviços")));
    // With both prices absent the total still renders, as zero
    assert!(shown.contains(&encode_win_ansi("Valor estimado total: R$ 0,00")));
}

#[test]
fn empty_free_text_renders_as_the_placeholder_line() {
    let mut ticket = ticket();
    ticket.description = "".to_string();

    let pdf_bytes =
        render_technical_report_at(&ticket, &customer(), &technical_report(), issued_at())
            .unwrap();
    let shown = shown_text(&pdf_bytes);

    // The verbatim complaint paragraph falls back to the placeholder
    let queixa_index = shown
        .iter()
        .position(|line| line == &encode_win_ansi("Queixa registrada"))
        .unwrap();
    assert_eq!(shown[queixa_index + 1], encode_win_ansi("-"));
}

#[test]
fn long_free_text_wraps_into_multiple_lines_in_emission_order() {
    let mut budget = full_budget();
    budget.part = None;
    budget.labor = None;
    budget.diagnosis = "Fonte de alimentação em curto-circuito após sobretensão, com danos \
                        visíveis nos capacitores de entrada e trilhas carbonizadas próximas \
                        ao conector, exigindo substituição completa do módulo"
        .to_string();

    let pdf_bytes = render_budget_at(&ticket(), &customer(), &budget, issued_at()).unwrap();
    let shown = shown_text(&pdf_bytes);

    let expected_lines =
        reportr::layout::wrap(&format!("Diagnóstico: {}", budget.diagnosis), 90);
    assert!(expected_lines.len() > 1);

    let first_index = shown
        .iter()
        .position(|line| line == &encode_win_ansi(&expected_lines[0]))
        .unwrap();
    for (offset, line) in expected_lines.iter().enumerate() {
        assert_eq!(shown[first_index + offset], encode_win_ansi(line));
    }
}

#[test]
fn a_report_request_parses_from_json_and_renders_like_the_direct_call() {
    let request: ReportRequest = serde_json::from_str(
        r#"{
            "kind": "budget",
            "ticket": {
                "id": "T-42",
                "customerId": "C-1",
                "device": "Notebook Vostro 15",
                "description": "Não liga depois de uma queda de energia",
                "status": "EM_ANDAMENTO",
                "entryDate": "01/08/2026 09:12"
            },
            "customer": {
                "id": "C-1",
                "name": "Joana Prado",
                "taxId": "123.456.789-00",
                "phone": "(11) 99876-5432",
                "address": "Rua das Laranjeiras, 250"
            },
            "budget": {
                "diagnosis": "Fonte danificada",
                "probableCause": "Sobretensão na rede elétrica",
                "repairable": true,
                "powerSupplyAffected": true,
                "part": {
                    "name": "Fonte 65W",
                    "specification": "19.5V 3.34A",
                    "code": "FT-065",
                    "partPrice": 100.0,
                    "laborPrice": 50.0
                },
                "labor": {
                    "description": "Troca da fonte",
                    "estimatedTime": "2 dias úteis",
                    "responsible": "Marcos"
                }
            }
        }"#,
    )
    .unwrap();

    assert_eq!(request.suggested_filename(), "orcamento-T-42.pdf");

    let from_request = request.render_at(issued_at()).unwrap();
    let direct = render_budget_at(&ticket(), &customer(), &full_budget(), issued_at()).unwrap();
    similar_asserts::assert_eq!(from_request, direct);
}

#[test]
fn suggested_filenames_follow_the_download_headers_of_the_shop() {
    assert_eq!(reportr::report::budget_filename("T-42"), "orcamento-T-42.pdf");
    assert_eq!(
        reportr::report::technical_report_filename("T-42"),
        "laudo-T-42.pdf"
    );
    assert_eq!(reportr::report::inventory_filename(), "estoque-techfix.pdf");
}

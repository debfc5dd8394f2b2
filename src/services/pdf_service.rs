// src/services/pdf_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;

use crate::{
    common::error::AppError,
    models::{admin::Settings, budgets::Budget, jobs::Job, jobs::ServiceItem},
};

/// Geração dos documentos em PDF (orçamento e ordem de serviço), renderizados
/// em memória e transmitidos direto como corpo da resposta.
#[derive(Clone)]
pub struct PdfService;

impl PdfService {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_budget_pdf(&self, budget: &Budget, settings: &Settings) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document(settings, &format!("Orçamento #{}", budget.display_id))?;

        doc.push(
            elements::Paragraph::new(format!("ORÇAMENTO #{}", budget.display_id))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Data: {}",
            budget.created_at.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!("Cliente: {}", budget.client_name)));
        if let Some(valid_until) = budget.valid_until {
            doc.push(elements::Paragraph::new(format!(
                "Válido até: {}",
                valid_until.format("%d/%m/%Y")
            )));
        }
        doc.push(elements::Break::new(2));

        self.push_items_table(&mut doc, &budget.items.0)?;

        if let Some(travel_price) = budget.travel_price {
            let label = if budget.travel_round_trip {
                "Deslocamento (ida e volta)"
            } else {
                "Deslocamento"
            };
            doc.push(elements::Paragraph::new(format!("{}: R$ {:.2}", label, travel_price)));
        }

        doc.push(elements::Break::new(1));
        self.push_total(&mut doc, format!("TOTAL GERAL: R$ {:.2}", budget.total));

        // --- ÁREA DE PAGAMENTO (QR CODE PIX) ---
        if let Some(key) = &settings.pix_key {
            doc.push(elements::Break::new(2));
            doc.push(
                elements::Paragraph::new("PAGAMENTO VIA PIX")
                    .styled(style::Style::new().bold().with_font_size(12)),
            );
            doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
            doc.push(elements::Break::new(1));

            let code = QrCode::new(key.as_bytes())
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);
            let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));
            doc.push(pdf_image);
        }

        self.push_footer(&mut doc, settings);
        self.render(doc)
    }

    pub fn generate_job_pdf(&self, job: &Job, settings: &Settings) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document(settings, &format!("OS #{}", job.display_id))?;

        doc.push(
            elements::Paragraph::new(format!("ORDEM DE SERVIÇO #{}", job.display_id))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Data: {}",
            job.created_at.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!("Cliente: {}", job.client_name)));
        if let Some(team_name) = &job.team_name {
            doc.push(elements::Paragraph::new(format!("Equipe: {}", team_name)));
        }
        if let Some(scheduled) = job.scheduled_start {
            doc.push(elements::Paragraph::new(format!(
                "Agendada para: {}",
                scheduled.format("%d/%m/%Y %H:%M")
            )));
        }
        doc.push(elements::Break::new(2));

        self.push_items_table(&mut doc, &job.items.0)?;

        if let Some(travel_price) = job.travel_price {
            let label = if job.travel_round_trip {
                "Deslocamento (ida e volta)"
            } else {
                "Deslocamento"
            };
            doc.push(elements::Paragraph::new(format!("{}: R$ {:.2}", label, travel_price)));
        }

        doc.push(elements::Break::new(1));
        self.push_total(&mut doc, format!("TOTAL GERAL: R$ {:.2}", job.total));

        if let Some(notes) = &job.notes {
            doc.push(elements::Break::new(1));
            doc.push(elements::Paragraph::new(format!("Observações: {}", notes)));
        }

        self.push_footer(&mut doc, settings);
        self.render(doc)
    }

    fn new_document(&self, settings: &Settings, title: &str) -> Result<genpdf::Document, AppError> {
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(title);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        let title_text = settings
            .company_name
            .clone()
            .unwrap_or_else(|| "PERFUSOLO FUNDAÇÕES".to_string());
        doc.push(
            elements::Paragraph::new(title_text).styled(style::Style::new().bold().with_font_size(18)),
        );
        if let Some(doc_num) = &settings.document_number {
            doc.push(
                elements::Paragraph::new(format!("CNPJ/CPF: {}", doc_num))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }
        if let Some(phone) = &settings.phone {
            doc.push(
                elements::Paragraph::new(format!("Telefone: {}", phone))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }
        doc.push(elements::Break::new(1.5));

        Ok(doc)
    }

    /// Tabela de itens: serviço, metros perfurados e valores.
    fn push_items_table(&self, doc: &mut genpdf::Document, items: &[ServiceItem]) -> Result<(), AppError> {
        // Pesos das colunas: Serviço (4), Qtd (1), Prof. (1), Unitário (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Serviço").styled(style_bold))
            .element(elements::Paragraph::new("Qtd").styled(style_bold))
            .element(elements::Paragraph::new("Prof. (m)").styled(style_bold))
            .element(elements::Paragraph::new("R$/m").styled(style_bold))
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        for item in items {
            let description = format!("{} (Ø{}mm, {})", item.description, item.diameter_mm, item.soil_type);
            table
                .row()
                .element(elements::Paragraph::new(description))
                .element(elements::Paragraph::new(format!("{:.0}", item.quantity)))
                .element(elements::Paragraph::new(format!("{:.2}", item.depth_meters)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.unit_price)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.final_value)))
                .push()
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1));
        Ok(())
    }

    fn push_total(&self, doc: &mut genpdf::Document, text: String) {
        let mut total_paragraph = elements::Paragraph::new(text);
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));
    }

    fn push_footer(&self, doc: &mut genpdf::Document, settings: &Settings) {
        if let Some(addr) = &settings.address {
            doc.push(elements::Break::new(2));
            doc.push(
                elements::Paragraph::new(addr.clone())
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }
    }

    fn render(&self, doc: genpdf::Document) -> Result<Vec<u8>, AppError> {
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        Ok(buffer)
    }
}

impl Default for PdfService {
    fn default() -> Self {
        Self::new()
    }
}
